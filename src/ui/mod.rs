pub mod console;
pub mod panel;
