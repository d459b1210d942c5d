use std::net::SocketAddr;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_EVALUATION_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub model_id: String,
    pub region: String,
    /// Evaluations run cooler than generation so ratings stay consistent.
    pub evaluation_temperature: f32,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or empty variables take
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("JOKESMITH_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse()
            .map_err(|e| eyre::eyre!("invalid JOKESMITH_BIND {bind_raw:?}: {e}"))?;

        let evaluation_temperature = match get("JOKESMITH_EVAL_TEMPERATURE") {
            None => DEFAULT_EVALUATION_TEMPERATURE,
            Some(raw) => {
                let t: f32 = raw
                    .parse()
                    .map_err(|e| eyre::eyre!("invalid JOKESMITH_EVAL_TEMPERATURE {raw:?}: {e}"))?;
                if !(0.0..=1.0).contains(&t) {
                    return Err(eyre::eyre!(
                        "JOKESMITH_EVAL_TEMPERATURE must be between 0 and 1, got {t}"
                    ));
                }
                t
            }
        };

        Ok(Self {
            bind,
            model_id: get("JOKESMITH_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            region: get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            evaluation_temperature,
        })
    }
}
