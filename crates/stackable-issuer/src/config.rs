//! The YAML settings file of the issuer.
//!
//! ```yaml
//! certificateAuthority:
//!   directory: /etc/stackable/issuer/ca
//!   keyFileName: ca.key
//!   certificateFileName: ca.crt
//! securityOptions:
//!   passphrase: secret
//!   privateKey:
//!     keyBitsize: 2048
//!     cipher: aes128
//!   certificate:
//!     country: DE
//!     commonName: example-ca
//!     hash: sha256
//!     days: 365
//! ```
use std::{
    ffi::OsStr,
    fs::File,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, instrument};

use crate::{
    material::Passphrase,
    options::{CertificateDefaults, IssuanceDefaults, KeyDefaults},
};

/// Locations searched for the settings file if no path is provided.
pub const DEFAULT_CONFIG_SEARCH_PATHS: &[&str] =
    &["issuer.yaml", "/etc/stackable/issuer/config.yaml"];

pub const DEFAULT_CA_DIRECTORY: &str = "/etc/stackable/issuer/ca";
pub const DEFAULT_CA_KEY_FILE_NAME: &str = "ca.key";
pub const DEFAULT_CA_CERTIFICATE_FILE_NAME: &str = "ca.crt";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to open settings file {path:?}"))]
    OpenFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse settings file {path:?}"))]
    ParseYaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },

    #[snafu(display(
        "failed to locate a required file in any of the following locations: {search_path:?}"
    ))]
    RequiredFileMissing { search_path: Vec<PathBuf> },
}

/// The complete settings of the issuer.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssuerConfig {
    #[serde(default)]
    pub certificate_authority: CertificateAuthorityConfig,

    #[serde(default)]
    pub security_options: SecurityOptions,
}

impl IssuerConfig {
    #[instrument]
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let file = File::open(path).context(OpenFileSnafu { path })?;
        let config = serde_yaml::from_reader(file).context(ParseYamlSnafu { path })?;

        debug!("loaded settings file");
        Ok(config)
    }

    /// The defaults used to resolve key and certificate requests.
    pub fn issuance_defaults(&self) -> IssuanceDefaults {
        IssuanceDefaults {
            key: self.security_options.private_key.clone(),
            certificate: self.security_options.certificate.clone(),
        }
    }

    /// The configured CA passphrase, if any.
    pub fn passphrase(&self) -> Option<Passphrase> {
        self.security_options
            .passphrase
            .as_deref()
            .map(Passphrase::from)
    }

    /// The configured common name, which names the CA and is also the default
    /// subject common name.
    pub fn common_name(&self) -> Option<String> {
        self.security_options
            .certificate
            .subject
            .common_name
            .clone()
    }
}

/// Where the CA key and certificate are stored.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificateAuthorityConfig {
    pub directory: PathBuf,
    pub key_file_name: String,
    pub certificate_file_name: String,
}

impl CertificateAuthorityConfig {
    pub fn key_path(&self) -> PathBuf {
        self.directory.join(&self.key_file_name)
    }

    pub fn certificate_path(&self) -> PathBuf {
        self.directory.join(&self.certificate_file_name)
    }
}

impl Default for CertificateAuthorityConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_CA_DIRECTORY),
            key_file_name: DEFAULT_CA_KEY_FILE_NAME.to_owned(),
            certificate_file_name: DEFAULT_CA_CERTIFICATE_FILE_NAME.to_owned(),
        }
    }
}

/// The CA passphrase and the key and certificate defaults.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityOptions {
    pub passphrase: Option<String>,

    #[serde(default)]
    pub private_key: KeyDefaults,

    #[serde(default)]
    pub certificate: CertificateDefaults,
}

/// A path to the settings file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigPath {
    path: Option<PathBuf>,
}

impl From<&OsStr> for ConfigPath {
    fn from(s: &OsStr) -> Self {
        Self {
            // An empty value is used as the sentinel for "search the default
            // locations", because clap hands us the raw argument value.
            path: if s.is_empty() { None } else { Some(s.into()) },
        }
    }
}

impl ConfigPath {
    /// Loads the [`IssuerConfig`] from the given path, falling back to the
    /// first path that exists from `default_search_paths` if none is given
    /// by the user.
    pub fn load(&self, default_search_paths: &[impl AsRef<Path>]) -> Result<IssuerConfig> {
        let resolved_path = Self::resolve_path(self.path.as_deref(), default_search_paths)?;
        IssuerConfig::from_yaml_file(resolved_path)
    }

    /// Check if the path can be found anywhere
    ///
    /// 1. User provides path `user_provided_path` to file. Return [`Error`] if not existing.
    /// 2. User does not provide path to file -> search in `default_paths` and
    ///    take the first existing file.
    /// 3. Return [`Error`] if nothing was found.
    fn resolve_path<'a>(
        user_provided_path: Option<&'a Path>,
        default_paths: &'a [impl AsRef<Path> + 'a],
    ) -> Result<&'a Path> {
        let search_paths = if let Some(path) = user_provided_path {
            vec![path]
        } else {
            default_paths.iter().map(|path| path.as_ref()).collect()
        };
        for path in &search_paths {
            if path.exists() {
                return Ok(path);
            }
        }
        RequiredFileMissingSnafu {
            search_path: search_paths
                .into_iter()
                .map(PathBuf::from)
                .collect::<Vec<_>>(),
        }
        .fail()
    }
}
