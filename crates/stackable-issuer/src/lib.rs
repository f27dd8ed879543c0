//! This crate issues X.509 client certificates signed by a configured
//! certificate authority (CA) and generates standalone private keys on
//! behalf of callers.
//!
//! The crate is split into three parts:
//!
//! - The [readiness gate](crate::readiness), which decides once at startup
//!   whether the CA material is complete and structurally usable. Every
//!   operation is refused while the gate is closed.
//! - The [parameter resolver](crate::options), which merges caller supplied
//!   options with the configured defaults.
//! - The [issuer](crate::issuer), which sequences key generation, CSR
//!   generation and signing with fail-fast error handling.
//!
//! All cryptographic work is delegated to a [`CryptoProvider`]. The crate
//! ships with [`RsaProvider`](crate::provider::rsa::RsaProvider), which is
//! built on top of the [`rsa`] and [`x509_cert`] crates.
//!
//! ```no_run
//! use stackable_issuer::{
//!     CaIdentity, Issuer,
//!     options::{CertificateRequest, IssuanceDefaults},
//!     provider::rsa::RsaProvider,
//! };
//!
//! # fn run(identity: CaIdentity, defaults: IssuanceDefaults) {
//! let issuer = Issuer::new(RsaProvider, identity, defaults);
//!
//! let request = CertificateRequest {
//!     common_name: Some("client1".to_owned()),
//!     ..Default::default()
//! };
//! let issued = issuer
//!     .create_certificate(&request)
//!     .expect("failed to issue certificate");
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `clap`: Derives [`clap::ValueEnum`] for the cipher and hash enums, so
//!   that they can be used as command line arguments directly.
//!
//! ## References
//!
//! - <https://datatracker.ietf.org/doc/html/rfc5280>
//! - <https://datatracker.ietf.org/doc/html/rfc2986>
//! - <https://datatracker.ietf.org/doc/html/rfc8018>
pub mod config;
pub mod identity;
pub mod issuer;
pub mod material;
pub mod options;
pub mod provider;
pub mod readiness;

#[cfg(test)]
pub(crate) mod test_utils;

pub use identity::CaIdentity;
pub use issuer::{IssuanceError, IssuedCertificate, Issuer};
pub use provider::CryptoProvider;
pub use readiness::ReadinessGate;
