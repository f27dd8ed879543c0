use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use snafu::{ResultExt, Snafu};
use stackable_issuer::{
    CaIdentity, IssuanceError, Issuer,
    config::{self, DEFAULT_CONFIG_SEARCH_PATHS},
    material::PrivateKeyPem,
    options::KeyRequest,
    provider::rsa::{self, RsaProvider},
};
use tokio::task::{JoinError, spawn_blocking};
use tracing::{debug, info};

use crate::{
    cli::{Cli, Command},
    output::{CertificateOutput, CheckOutput, KeyOutput},
};

mod cli;
mod output;
mod telemetry;

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to initialize tracing"))]
    InitTracing { source: telemetry::Error },

    #[snafu(display("failed to load settings"))]
    LoadConfig { source: config::Error },

    #[snafu(display("failed to read client key file {path:?}"))]
    ReadClientKey {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("issuer task failed to complete"))]
    JoinIssuerTask { source: JoinError },

    #[snafu(display("failed to create private key"))]
    CreatePrivateKey {
        source: IssuanceError<rsa::Error>,
    },

    #[snafu(display("failed to create certificate"))]
    CreateCertificate {
        source: IssuanceError<rsa::Error>,
    },

    #[snafu(display("failed to serialize output"))]
    SerializeOutput { source: serde_json::Error },
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), Error> {
    let Cli { command, common } = Cli::parse();
    telemetry::init(&common.telemetry).context(InitTracingSnafu)?;

    let config = common
        .config
        .load(DEFAULT_CONFIG_SEARCH_PATHS)
        .context(LoadConfigSnafu)?;

    let passphrase = common.ca_passphrase().or_else(|| config.passphrase());
    let identity =
        CaIdentity::load(&config.certificate_authority, passphrase, config.common_name()).await;

    let defaults = config.issuance_defaults();
    let issuer = spawn_blocking(move || Issuer::new(RsaProvider, identity, defaults))
        .await
        .context(JoinIssuerTaskSnafu)?;

    match command {
        Command::Check => {
            info!(ready = issuer.is_ready(), "checked CA readiness");
            print_json(&CheckOutput {
                ready: issuer.is_ready(),
            })
        }
        Command::CreateKey(arguments) => {
            let request = KeyRequest::from(arguments);
            let key = spawn_blocking(move || issuer.create_private_key(&request))
                .await
                .context(JoinIssuerTaskSnafu)?
                .context(CreatePrivateKeySnafu)?;

            print_json(&KeyOutput::from(&key))
        }
        Command::CreateCertificate(arguments) => {
            let client_key = match &arguments.client_key_file {
                Some(path) => Some(read_client_key(path).await?),
                None => None,
            };

            let request = arguments.into_request(client_key);
            let issued = spawn_blocking(move || issuer.create_certificate(&request))
                .await
                .context(JoinIssuerTaskSnafu)?
                .context(CreateCertificateSnafu)?;

            print_json(&CertificateOutput::from(&issued))
        }
    }
}

async fn read_client_key(path: &Path) -> Result<PrivateKeyPem, Error> {
    let pem = tokio::fs::read_to_string(path)
        .await
        .context(ReadClientKeySnafu { path })?;

    debug!(path = %path.display(), "read client key");
    Ok(PrivateKeyPem::new(pem))
}

fn print_json(output: &impl Serialize) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(output).context(SerializeOutputSnafu)?;
    println!("{json}");
    Ok(())
}
