//! jokesmith-bedrock
//!
//! Bedrock model invocation behind the [`backend::ChatBackend`] seam.

pub mod backend;
pub mod chat;
pub mod client;
pub mod error;
