use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stackable_issuer::{
    config::ConfigPath,
    material::{Passphrase, PrivateKeyPem},
    options::{CertificateRequest, HashAlgorithm, KeyCipher, KeyRequest},
};

use crate::telemetry::TelemetryOptions;

#[derive(Debug, Parser)]
#[command(
    name = "stackable-issuer",
    author,
    version,
    about = "Issues client certificates signed by a configured certificate authority"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    // IMPORTANT: All (flattened) sub structs should be placed at the end to ensure the help
    // headings are correct.
    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a standalone private key.
    CreateKey(CreateKeyArguments),

    /// Issue a client certificate signed by the CA.
    CreateCertificate(CreateCertificateArguments),

    /// Report whether the CA is able to issue certificates.
    Check,
}

#[derive(Debug, Args)]
pub struct CommonOptions {
    /// Provides the path to the settings file
    #[arg(
        long,
        short = 'c',
        value_name = "FILE",
        default_value = "",
        env = "ISSUER_CONFIG",
        global = true
    )]
    pub config: ConfigPath,

    /// Passphrase of the CA key, takes precedence over the settings file
    #[arg(long, env = "CA_PASSPHRASE", hide_env_values = true, global = true)]
    pub ca_passphrase: Option<String>,

    #[command(flatten)]
    pub telemetry: TelemetryOptions,
}

impl CommonOptions {
    /// The CA passphrase passed on the command line, if any and not empty.
    pub fn ca_passphrase(&self) -> Option<Passphrase> {
        self.ca_passphrase
            .as_deref()
            .filter(|passphrase| !passphrase.is_empty())
            .map(Passphrase::from)
    }
}

#[derive(Debug, PartialEq, Eq, Args)]
pub struct CreateKeyArguments {
    /// Size of the RSA key in bits
    #[arg(long, value_name = "BITS")]
    pub bit_size: Option<u32>,

    /// Cipher used to encrypt the key, only effective together with a password
    #[arg(long, value_enum)]
    pub cipher: Option<KeyCipher>,

    /// Encrypts the generated key with this password
    #[arg(long, env = "KEY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl From<CreateKeyArguments> for KeyRequest {
    fn from(arguments: CreateKeyArguments) -> Self {
        Self {
            bit_size: arguments.bit_size,
            cipher: arguments.cipher,
            password: arguments.password.map(Passphrase::from),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Args)]
pub struct CreateCertificateArguments {
    /// PEM file containing an existing client key, no key is generated if set
    #[arg(long, value_name = "FILE")]
    pub client_key_file: Option<PathBuf>,

    /// Password of the client key, or of the generated key
    #[arg(long, env = "CLIENT_KEY_PASSWORD", hide_env_values = true)]
    pub client_key_password: Option<String>,

    /// Size of the generated RSA key in bits
    #[arg(long, value_name = "BITS")]
    pub bit_size: Option<u32>,

    /// Cipher used to encrypt the generated key
    #[arg(long, value_enum)]
    pub cipher: Option<KeyCipher>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub locality: Option<String>,

    #[arg(long)]
    pub organization: Option<String>,

    #[arg(long)]
    pub organizational_unit: Option<String>,

    #[arg(long)]
    pub common_name: Option<String>,

    #[arg(long)]
    pub email_address: Option<String>,

    /// Digest used to sign the CSR and the certificate
    #[arg(long, value_enum)]
    pub hash: Option<HashAlgorithm>,

    /// Validity of the certificate in days
    #[arg(long)]
    pub days: Option<u32>,

    /// Serial number of the certificate, a random one is used if not set
    #[arg(long)]
    pub serial_number: Option<u64>,
}

impl CreateCertificateArguments {
    /// Builds the request, using `client_key` read from
    /// [`Self::client_key_file`].
    pub fn into_request(self, client_key: Option<PrivateKeyPem>) -> CertificateRequest {
        CertificateRequest {
            client_key,
            client_key_password: self.client_key_password.map(Passphrase::from),
            bit_size: self.bit_size,
            cipher: self.cipher,
            country: self.country,
            state: self.state,
            locality: self.locality,
            organization: self.organization,
            organizational_unit: self.organizational_unit,
            common_name: self.common_name,
            email_address: self.email_address,
            hash: self.hash,
            days: self.days,
            serial_number: self.serial_number,
            ..Default::default()
        }
    }
}
