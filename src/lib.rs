//! A small interactive prompt that collects claims and produces an unsigned JWT.
//!
//! The user types key names and values one line at a time. Values for known keys
//! are checked against a rule table (currently only `email`). Once both `user_key`
//! and `email` are present the prompt offers to finish; answering `n` encodes the
//! collected claims as a JWT with `alg: none` and copies it to the clipboard.
//!
//! The main entry point is [`Session`], which drives a [`Collector`] state machine
//! with pluggable line sources, token encoders and clipboard sinks. The tokens
//! produced here carry no signature and must never be trusted for authentication.

pub mod clipboard;
pub mod collector;
pub mod config;
pub mod env;
pub mod io_adapters;
pub mod payload;
pub mod rules;
mod session;
pub mod token;

pub use collector::{Collector, Reply, State, Step};
pub use payload::Payload;
pub use session::{Outcome, Session};
