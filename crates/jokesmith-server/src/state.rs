use std::sync::Arc;

use jokesmith_bedrock::backend::ChatBackend;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Holds no per-session data; conversation state lives with the client.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ChatBackend>,
    pub evaluation_temperature: f32,
}
