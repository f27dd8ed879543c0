//! The certificate authority (CA) material used to sign client certificates.
use std::{io::ErrorKind, path::Path};

use tracing::{debug, instrument, warn};

use crate::{
    config::CertificateAuthorityConfig,
    material::{CertificatePem, Passphrase, PrivateKeyPem},
};

/// The CA material as loaded at startup.
///
/// Every part may be missing, in which case the
/// [`ReadinessGate`](crate::ReadinessGate) stays closed. The identity is never
/// mutated after loading.
#[derive(Clone, Debug, Default)]
pub struct CaIdentity {
    pub key: Option<PrivateKeyPem>,
    pub certificate: Option<CertificatePem>,
    pub passphrase: Option<Passphrase>,
    pub common_name: Option<String>,
}

impl CaIdentity {
    /// Loads the CA key and certificate from the files described by `config`.
    ///
    /// A missing file results in missing material. Any other read error is
    /// logged and treated the same way, so that a broken CA setup closes the
    /// readiness gate instead of failing the whole process.
    #[instrument(skip(config, passphrase), fields(ca.directory = %config.directory.display()))]
    pub async fn load(
        config: &CertificateAuthorityConfig,
        passphrase: Option<Passphrase>,
        common_name: Option<String>,
    ) -> Self {
        let key = read_optional_pem(&config.key_path())
            .await
            .map(PrivateKeyPem::new);
        let certificate = read_optional_pem(&config.certificate_path())
            .await
            .map(CertificatePem::new);

        Self {
            key,
            certificate,
            passphrase: passphrase.filter(|passphrase| !passphrase.is_empty()),
            common_name: common_name.filter(|common_name| !common_name.is_empty()),
        }
    }

    /// Returns the complete [`SigningAuthority`] if every part of the identity
    /// is present.
    pub fn to_authority(&self) -> Option<SigningAuthority> {
        Some(SigningAuthority {
            key: self.key.clone()?,
            certificate: self.certificate.clone()?,
            passphrase: self.passphrase.clone()?,
            common_name: self.common_name.clone()?,
        })
    }
}

async fn read_optional_pem(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            debug!(path = %path.display(), "read CA material");
            Some(contents)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "CA material does not exist");
            None
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = &err as &dyn std::error::Error,
                "failed to read CA material"
            );
            None
        }
    }
}

/// A fully populated CA identity.
///
/// This can only be obtained from a [`CaIdentity`] which has every part
/// present, usually via an open [`ReadinessGate`](crate::ReadinessGate).
#[derive(Clone, Debug)]
pub struct SigningAuthority {
    key: PrivateKeyPem,
    certificate: CertificatePem,
    passphrase: Passphrase,
    common_name: String,
}

impl SigningAuthority {
    pub fn key(&self) -> &PrivateKeyPem {
        &self.key
    }

    pub fn certificate(&self) -> &CertificatePem {
        &self.certificate
    }

    pub fn passphrase(&self) -> &Passphrase {
        &self.passphrase
    }

    pub fn common_name(&self) -> &str {
        &self.common_name
    }
}
