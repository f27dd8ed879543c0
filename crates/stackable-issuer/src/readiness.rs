//! Decides whether the CA is usable at all.
//!
//! The gate is evaluated exactly once, when the issuer is constructed. It is
//! never refreshed, replacing the CA files on disk has no effect on a running
//! issuer. Construct a new issuer to re-evaluate the gate.
use tracing::{info, instrument, warn};

use crate::{
    identity::{CaIdentity, SigningAuthority},
    options::{KeyCipher, PackagingOptions},
    provider::CryptoProvider,
};

/// The startup computed readiness of the CA.
///
/// The gate is open (ready) only if the CA key, certificate, passphrase and
/// common name are all present and the provider is able to package the key
/// and certificate into a passphrase protected bundle.
#[derive(Clone, Debug)]
pub struct ReadinessGate {
    authority: Option<SigningAuthority>,
}

impl ReadinessGate {
    /// Evaluates the gate for `identity`.
    ///
    /// Failures never surface to the caller, they are logged and close the
    /// gate.
    #[instrument(name = "evaluate_readiness_gate", skip_all)]
    pub fn evaluate<P>(provider: &P, identity: &CaIdentity) -> Self
    where
        P: CryptoProvider,
    {
        let (Some(key), Some(certificate)) = (&identity.key, &identity.certificate) else {
            warn!(
                ca.key.present = identity.key.is_some(),
                ca.certificate.present = identity.certificate.is_some(),
                "CA key or certificate is missing, refusing to issue certificates"
            );
            return Self::closed();
        };

        let Some(authority) = identity.to_authority() else {
            warn!(
                ca.passphrase.present = identity.passphrase.is_some(),
                ca.common_name.present = identity.common_name.is_some(),
                "CA passphrase or common name is not configured, refusing to issue certificates"
            );
            return Self::closed();
        };

        let packaging_options = PackagingOptions {
            cipher: KeyCipher::Aes128,
            key_password: authority.passphrase().clone(),
        };

        match provider.package_identity(key, certificate, authority.passphrase(), &packaging_options)
        {
            Ok(_) => {
                info!(
                    ca.common_name = authority.common_name(),
                    "CA material is valid, ready to issue certificates"
                );
                Self {
                    authority: Some(authority),
                }
            }
            Err(err) => {
                warn!(
                    error = &err as &dyn std::error::Error,
                    "failed to package CA material, refusing to issue certificates"
                );
                Self::closed()
            }
        }
    }

    /// A gate which refuses every request.
    pub fn closed() -> Self {
        Self { authority: None }
    }

    pub fn is_ready(&self) -> bool {
        self.authority.is_some()
    }

    /// The signing authority, if the gate is open.
    pub fn authority(&self) -> Option<&SigningAuthority> {
        self.authority.as_ref()
    }
}
