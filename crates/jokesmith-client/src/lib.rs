//! jokesmith-client
//!
//! Terminal front end: owns one session, talks to the gateway, renders the
//! stream as it arrives.

pub mod api;
pub mod decode;
pub mod driver;
pub mod form;
pub mod interactive;
pub mod render;
