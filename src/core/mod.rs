pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod message;
pub mod mode;
pub mod session;
