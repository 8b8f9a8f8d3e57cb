//! modechat is a line-oriented terminal chat client for OpenAI-compatible
//! completion APIs.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, persona modes, configuration, credentials,
//!   the request/retry executor and the session controller that drives them.
//! - [`ui`] writes styled console output and renders replies as framed
//!   Markdown panels.
//! - [`api`] defines the chat completion payloads sent over the wire.
//! - [`utils`] holds input cleaning, the Markdown transcript log and
//!   diagnostic tracing setup.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`], which
//! resolves configuration and credentials, then hands control to
//! [`core::session::SessionController`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
