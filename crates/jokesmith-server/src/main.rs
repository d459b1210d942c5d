use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use jokesmith_bedrock::backend::BedrockBackend;
use jokesmith_server::config::ServerConfig;
use jokesmith_server::router;
use jokesmith_server::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    let client = jokesmith_bedrock::client::build_client_with_region(&config.region).await;
    let backend = BedrockBackend::new(client, config.model_id.clone());

    let state = AppState {
        backend: Arc::new(backend),
        evaluation_temperature: config.evaluation_temperature,
    };
    let app = router(state);

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        tracing::info!(model = %config.model_id, "starting under lambda runtime");
        return lambda_http::run_with_streaming_response(app)
            .await
            .map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %config.bind,
        model = %config.model_id,
        region = %config.region,
        "jokesmith gateway listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
