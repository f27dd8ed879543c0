//! The seam between the issuer and the actual cryptography.
//!
//! The [`Issuer`](crate::Issuer) never performs cryptographic operations
//! itself. Every key generation, CSR construction, signing and packaging
//! step goes through a [`CryptoProvider`]. This keeps the pipeline testable
//! with test doubles and allows swapping the backing implementation.
//!
//! Every operation is potentially long running and blocking (RSA key
//! generation with large key sizes can take multiple seconds). Async callers
//! should run the issuer on a blocking thread, for example with
//! [`tokio::task::spawn_blocking`].
use crate::{
    material::{CertificatePem, CsrPem, Passphrase, PrivateKeyPem},
    options::{CertificateOptions, KeyOptions, PackagingOptions},
};

pub mod rsa;

pub trait CryptoProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generates a new private key of `bit_size` bits.
    ///
    /// If `options` carries a password, the key is returned encrypted with
    /// the cipher in `options`.
    fn generate_private_key(
        &self,
        bit_size: u32,
        options: &KeyOptions,
    ) -> Result<PrivateKeyPem, Self::Error>;

    /// Generates a CSR for the client key in `options`, using the subject
    /// and hash algorithm in `options`.
    fn generate_csr(&self, options: &CertificateOptions) -> Result<CsrPem, Self::Error>;

    /// Signs `csr` with the CA key and certificate carried by `options`.
    fn sign_certificate(
        &self,
        options: &CertificateOptions,
        csr: &CsrPem,
    ) -> Result<CertificatePem, Self::Error>;

    /// Packages `key` and `certificate` into a passphrase protected bundle.
    ///
    /// The issuer only uses this as a structural self test of the CA material.
    fn package_identity(
        &self,
        key: &PrivateKeyPem,
        certificate: &CertificatePem,
        passphrase: &Passphrase,
        options: &PackagingOptions,
    ) -> Result<IdentityBundle, Self::Error>;
}

/// A certificate together with its private key, which is encrypted with the
/// packaging password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityBundle {
    pub certificate: CertificatePem,
    pub key: PrivateKeyPem,
}
