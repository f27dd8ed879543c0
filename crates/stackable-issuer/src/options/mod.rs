//! Request types, resolved option types and the rules used to merge the two.
//!
//! Callers describe what they want with a [`KeyRequest`] or a
//! [`CertificateRequest`], in which every field is optional. The
//! [`IssuanceDefaults`] turn these into fully populated [`KeyOptions`] and
//! [`CertificateOptions`]:
//!
//! - A field set by the caller wins, unless it is empty (an empty string or a
//!   zero number).
//! - Otherwise the configured default is used.
//! - The CA key, certificate and passphrase are always taken from the
//!   [`SigningAuthority`], callers can never choose which CA signs their
//!   certificate.
//!
//! Resolution never fails.
use serde::Deserialize;

use crate::{
    identity::SigningAuthority,
    material::{CertificatePem, Passphrase, PrivateKeyPem},
};

mod subject;
pub use subject::*;

/// The default RSA key size in bits.
pub const DEFAULT_KEY_BIT_SIZE: u32 = 2048;

/// The default validity of issued certificates in days.
pub const DEFAULT_VALIDITY_DAYS: u32 = 365;

/// Symmetric cipher used to protect encrypted private keys.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(
    Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum KeyCipher {
    /// AES-128 in CBC mode.
    #[default]
    Aes128,

    /// AES-256 in CBC mode.
    Aes256,
}

/// Digest used for CSR and certificate signatures (RSA PKCS#1 v1.5).
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(
    Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

/// A request for a standalone private key.
#[derive(Clone, Debug, Default)]
pub struct KeyRequest {
    pub bit_size: Option<u32>,
    pub cipher: Option<KeyCipher>,

    /// Encrypts the generated key with the resolved cipher if set.
    pub password: Option<Passphrase>,
}

/// A request for a CA signed client certificate.
#[derive(Clone, Debug, Default)]
pub struct CertificateRequest {
    /// An existing client key. If set, no key is generated and the CSR is
    /// created for this key.
    pub client_key: Option<PrivateKeyPem>,

    /// Password of an encrypted `client_key`, or the password used to
    /// encrypt the key generated for this request.
    pub client_key_password: Option<Passphrase>,

    pub bit_size: Option<u32>,
    pub cipher: Option<KeyCipher>,

    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub common_name: Option<String>,
    pub email_address: Option<String>,

    pub hash: Option<HashAlgorithm>,
    pub days: Option<u32>,
    pub serial_number: Option<u64>,

    /// Ignored. The CA key is always taken from the configured authority.
    pub service_key: Option<PrivateKeyPem>,

    /// Ignored. The CA certificate is always taken from the configured
    /// authority.
    pub service_certificate: Option<CertificatePem>,

    /// Ignored. The CA passphrase is always taken from the configured
    /// authority.
    pub service_key_password: Option<Passphrase>,
}

impl CertificateRequest {
    /// The key generation part of this request, used when the pipeline has
    /// to generate the client key itself.
    pub fn key_request(&self) -> KeyRequest {
        KeyRequest {
            bit_size: self.bit_size,
            cipher: self.cipher,
            password: self.client_key_password.clone(),
        }
    }
}

/// Fully resolved parameters for private key generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyOptions {
    pub bit_size: u32,
    pub cipher: KeyCipher,
    pub password: Option<Passphrase>,
}

/// Fully resolved parameters for CSR generation and signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertificateOptions {
    pub service_key: PrivateKeyPem,
    pub service_certificate: CertificatePem,
    pub service_key_password: Passphrase,

    pub client_key: Option<PrivateKeyPem>,
    pub client_key_password: Option<Passphrase>,

    pub bit_size: u32,
    pub subject: Subject,
    pub hash: HashAlgorithm,
    pub days: u32,
    pub serial_number: Option<u64>,
}

/// Options used when packaging the CA key and certificate into a protected
/// bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackagingOptions {
    pub cipher: KeyCipher,
    pub key_password: Passphrase,
}

/// Configured defaults for private keys.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyDefaults {
    #[serde(rename = "keyBitsize", default = "KeyDefaults::default_bit_size")]
    pub bit_size: u32,

    #[serde(default)]
    pub cipher: KeyCipher,
}

impl KeyDefaults {
    const fn default_bit_size() -> u32 {
        DEFAULT_KEY_BIT_SIZE
    }
}

impl Default for KeyDefaults {
    fn default() -> Self {
        Self {
            bit_size: DEFAULT_KEY_BIT_SIZE,
            cipher: KeyCipher::default(),
        }
    }
}

/// Configured defaults for certificates.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateDefaults {
    #[serde(flatten)]
    pub subject: Subject,

    #[serde(default)]
    pub hash: HashAlgorithm,

    #[serde(default = "CertificateDefaults::default_days")]
    pub days: u32,
}

impl CertificateDefaults {
    const fn default_days() -> u32 {
        DEFAULT_VALIDITY_DAYS
    }
}

impl Default for CertificateDefaults {
    fn default() -> Self {
        Self {
            subject: Subject::default(),
            hash: HashAlgorithm::default(),
            days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

/// The complete set of configured defaults, used to resolve requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssuanceDefaults {
    pub key: KeyDefaults,
    pub certificate: CertificateDefaults,
}

impl IssuanceDefaults {
    pub fn resolve_key_options(&self, request: &KeyRequest) -> KeyOptions {
        KeyOptions {
            bit_size: number_or(request.bit_size, self.key.bit_size),
            cipher: request.cipher.unwrap_or(self.key.cipher),
            password: request.password.clone().filter(|p| !p.is_empty()),
        }
    }

    pub fn resolve_certificate_options(
        &self,
        request: &CertificateRequest,
        authority: &SigningAuthority,
    ) -> CertificateOptions {
        let defaults = &self.certificate.subject;

        CertificateOptions {
            service_key: authority.key().clone(),
            service_certificate: authority.certificate().clone(),
            service_key_password: authority.passphrase().clone(),
            client_key: request.client_key.clone(),
            client_key_password: request.client_key_password.clone(),
            bit_size: number_or(request.bit_size, self.key.bit_size),
            subject: Subject {
                country: text_or(&request.country, &defaults.country),
                state: text_or(&request.state, &defaults.state),
                locality: text_or(&request.locality, &defaults.locality),
                organization: text_or(&request.organization, &defaults.organization),
                organizational_unit: text_or(
                    &request.organizational_unit,
                    &defaults.organizational_unit,
                ),
                common_name: text_or(&request.common_name, &defaults.common_name),
                email_address: text_or(&request.email_address, &defaults.email_address),
            },
            hash: request.hash.unwrap_or(self.certificate.hash),
            days: number_or(request.days, self.certificate.days),
            serial_number: request.serial_number,
        }
    }
}

fn text_or(requested: &Option<String>, default: &Option<String>) -> Option<String> {
    requested
        .as_ref()
        .filter(|value| !value.is_empty())
        .or(default.as_ref())
        .cloned()
}

fn number_or(requested: Option<u32>, default: u32) -> u32 {
    requested.filter(|value| *value != 0).unwrap_or(default)
}
