//! jokesmith-core
//!
//! Pure domain types, prompt construction, and the client session reducer.
//! No AWS SDK or HTTP dependency. This is the shared vocabulary of the
//! gateway and its clients.

pub mod error;
pub mod models;
pub mod prompt;
pub mod session;
