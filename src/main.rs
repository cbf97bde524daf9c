mod api;
mod cli;
mod config;
mod identity;
mod payload;

use crate::api::{ApiClient, ApiError, HttpMethod};
use crate::cli::Cli;
use crate::config::{Config, ConfigError};
use crate::identity::AuthError;
use crate::payload::PayloadError;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use thiserror::Error;

/// Anything that stops a run before the API has answered.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("unable to write output: {0}")]
    Output(#[from] io::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env goes first so it can also carry RUST_LOG.
    let dotenv = config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = dotenv {
        log::warn!("Unable to load .env file: {}", err);
    }

    let cli = Cli::parse();
    let outcome = match Config::from_env() {
        Ok(config) => run(&cli, &config, &reqwest::Client::new(), &mut io::stdout()).await,
        Err(err) => Err(err.into()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

/// Acquires a token, then forwards one request with it.
///
/// Local input (method, endpoint, payload) is checked before the token
/// request so a typo never costs a round trip to the identity provider.
async fn run<W: Write>(
    cli: &Cli,
    config: &Config,
    http: &reqwest::Client,
    out: &mut W,
) -> Result<(), Error> {
    // The client checks the method again; this just gets in before the token request.
    let _method: HttpMethod = cli.method.parse()?;
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref())?;
    let payload = payload::resolve_payload(cli.payload.as_deref(), cli.payload_file.as_deref())?;

    let token = identity::acquire_token(http, config).await?;
    if let Some(claims) = &token.claims {
        writeln!(out, "Decoded Token Claims:")?;
        writeln!(out, "{}", claims)?;
    }

    let client = ApiClient::new(
        http.clone(),
        token.access_token,
        config.subscription_key.clone(),
    );
    let response = client
        .call(&endpoint, &cli.method, payload.as_ref())
        .await?;

    writeln!(out, "Response Status: {}", response.status)?;
    writeln!(out, "Response Body: {}", response.body)?;
    Ok(())
}
