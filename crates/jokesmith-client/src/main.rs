use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;
use jokesmith_client::api::GatewayClient;
use jokesmith_client::driver::Driver;
use jokesmith_client::form::{Field, ParameterForm};
use jokesmith_client::interactive;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut form = ParameterForm {
        temperature: cli.temperature,
        ..ParameterForm::default()
    };
    for (field, value) in [
        (Field::Topic, &cli.topic),
        (Field::Tone, &cli.tone),
        (Field::Type, &cli.kind),
    ] {
        if let Some(value) = value {
            form.set(field, value);
        }
    }

    let mut driver = Driver::new(GatewayClient::new(&cli.server));

    if cli.once {
        if !form.is_complete() {
            return Err(eyre::eyre!("--once needs --topic, --tone and --type"));
        }
        interactive::generate(&mut driver, &form).await?;
        if driver.session().current_joke().is_none() {
            return Err(eyre::eyre!("no joke was generated"));
        }
        interactive::evaluate(&mut driver).await?;
        return Ok(());
    }

    interactive::run(&mut driver, form).await
}
