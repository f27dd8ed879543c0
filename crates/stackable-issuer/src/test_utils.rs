//! Shared fixtures for unit tests.
use std::{sync::Mutex, time::Duration};

use rand_core::OsRng;
use rsa::{
    RsaPrivateKey,
    pkcs1v15::{Signature, SigningKey},
    pkcs8::EncodePublicKey,
};
use sha2::Sha256;
use signature::Keypair;
use snafu::Snafu;
use x509_cert::{
    builder::{Builder, CertificateBuilder, Profile},
    der::{DecodePem, EncodePem},
    name::Name,
    serial_number::SerialNumber,
    spki::SubjectPublicKeyInfoOwned,
    time::Validity,
};

use crate::{
    identity::{CaIdentity, SigningAuthority},
    material::{CertificatePem, CsrPem, PEM_LINE_ENDING, Passphrase, PrivateKeyPem},
    options::{CertificateOptions, KeyCipher, KeyOptions, PackagingOptions, Subject},
    provider::{CryptoProvider, IdentityBundle, rsa::encrypt_private_key},
};

/// Key size used by tests. Small keys keep the tests fast, while still being
/// large enough for SHA-512 PKCS#1 v1.5 signatures.
pub(crate) const TEST_KEY_BIT_SIZE: u32 = 1024;

/// Creates a self-signed CA, returning the passphrase protected key and the
/// certificate.
pub(crate) fn self_signed_ca(common_name: &str, passphrase: &str) -> (PrivateKeyPem, CertificatePem) {
    let private_key = RsaPrivateKey::new(&mut OsRng, TEST_KEY_BIT_SIZE as usize)
        .expect("failed to create CA key");
    let signing_key = SigningKey::<Sha256>::new(private_key.clone());

    let spki_pem = signing_key
        .verifying_key()
        .to_public_key_pem(PEM_LINE_ENDING)
        .expect("failed to serialize CA public key");
    let spki = SubjectPublicKeyInfoOwned::from_pem(spki_pem.as_bytes())
        .expect("failed to decode CA SPKI");

    let subject: Name = format!("CN={common_name}")
        .parse()
        .expect("invalid CA subject");
    let validity = Validity::from_now(Duration::from_secs(365 * 24 * 60 * 60))
        .expect("invalid CA validity");

    let certificate = CertificateBuilder::new(
        Profile::Root,
        SerialNumber::from(rand::random::<u64>()),
        validity,
        subject,
        spki,
        &signing_key,
    )
    .expect("failed to create CA certificate builder")
    .build::<Signature>()
    .expect("failed to build CA certificate");

    let key = encrypt_private_key(&private_key, KeyCipher::Aes128, &Passphrase::from(passphrase))
        .expect("failed to encrypt CA key");
    let certificate = certificate
        .to_pem(PEM_LINE_ENDING)
        .expect("failed to encode CA certificate");

    (key, CertificatePem::new(certificate))
}

/// A [`SigningAuthority`] made of placeholder material, for tests which never
/// touch real cryptography.
pub(crate) fn synthetic_authority() -> SigningAuthority {
    synthetic_identity()
        .to_authority()
        .expect("synthetic identity is complete")
}

pub(crate) fn synthetic_identity() -> CaIdentity {
    CaIdentity {
        key: Some(PrivateKeyPem::new("ca-key")),
        certificate: Some(CertificatePem::new("ca-certificate")),
        passphrase: Some(Passphrase::from("secret")),
        common_name: Some("example-ca".to_owned()),
    }
}

/// The provider operations, used to make a [`RecordingProvider`] fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    GeneratePrivateKey,
    GenerateCsr,
    SignCertificate,
    PackageIdentity,
}

/// A provider call as recorded by the [`RecordingProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    GeneratePrivateKey {
        bit_size: u32,
        options: KeyOptions,
    },
    GenerateCsr {
        client_key: Option<PrivateKeyPem>,
        subject: Subject,
    },
    SignCertificate {
        csr: CsrPem,
        service_key: PrivateKeyPem,
        service_key_password: Passphrase,
    },
    PackageIdentity {
        cipher: KeyCipher,
        key_password: Passphrase,
    },
}

#[derive(Debug, PartialEq, Eq, Snafu)]
#[snafu(display("{step:?} failed"))]
pub(crate) struct StepFailed {
    pub(crate) step: Step,
}

/// A [`CryptoProvider`] which records every call and returns placeholder
/// material, optionally failing at a given [`Step`].
#[derive(Debug, Default)]
pub(crate) struct RecordingProvider {
    fail_at: Option<Step>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingProvider {
    pub(crate) fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Default::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock is poisoned").clone()
    }

    fn record(&self, step: Step, call: Call) -> Result<(), StepFailed> {
        self.calls.lock().expect("calls lock is poisoned").push(call);

        if self.fail_at == Some(step) {
            return Err(StepFailed { step });
        }
        Ok(())
    }
}

impl CryptoProvider for RecordingProvider {
    type Error = StepFailed;

    fn generate_private_key(
        &self,
        bit_size: u32,
        options: &KeyOptions,
    ) -> Result<PrivateKeyPem, Self::Error> {
        self.record(Step::GeneratePrivateKey, Call::GeneratePrivateKey {
            bit_size,
            options: options.clone(),
        })?;
        Ok(PrivateKeyPem::new(format!("generated-key-{bit_size}")))
    }

    fn generate_csr(&self, options: &CertificateOptions) -> Result<CsrPem, Self::Error> {
        self.record(Step::GenerateCsr, Call::GenerateCsr {
            client_key: options.client_key.clone(),
            subject: options.subject.clone(),
        })?;
        Ok(CsrPem::new("csr"))
    }

    fn sign_certificate(
        &self,
        options: &CertificateOptions,
        csr: &CsrPem,
    ) -> Result<CertificatePem, Self::Error> {
        self.record(Step::SignCertificate, Call::SignCertificate {
            csr: csr.clone(),
            service_key: options.service_key.clone(),
            service_key_password: options.service_key_password.clone(),
        })?;
        Ok(CertificatePem::new("certificate"))
    }

    fn package_identity(
        &self,
        key: &PrivateKeyPem,
        certificate: &CertificatePem,
        _passphrase: &Passphrase,
        options: &PackagingOptions,
    ) -> Result<IdentityBundle, Self::Error> {
        self.record(Step::PackageIdentity, Call::PackageIdentity {
            cipher: options.cipher,
            key_password: options.key_password.clone(),
        })?;
        Ok(IdentityBundle {
            certificate: certificate.clone(),
            key: key.clone(),
        })
    }
}
