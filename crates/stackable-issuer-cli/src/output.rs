//! The JSON documents printed to stdout.
use serde::Serialize;
use stackable_issuer::{IssuedCertificate, material::PrivateKeyPem};

#[derive(Debug, Serialize)]
pub struct KeyOutput<'a> {
    pub key: &'a str,
}

impl<'a> From<&'a PrivateKeyPem> for KeyOutput<'a> {
    fn from(key: &'a PrivateKeyPem) -> Self {
        Self { key: key.as_str() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateOutput<'a> {
    pub certificate: &'a str,
    pub csr: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<&'a str>,
}

impl<'a> From<&'a IssuedCertificate> for CertificateOutput<'a> {
    fn from(issued: &'a IssuedCertificate) -> Self {
        Self {
            certificate: issued.certificate.as_str(),
            csr: issued.csr.as_str(),
            client_key: issued.client_key.as_ref().map(PrivateKeyPem::as_str),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub ready: bool,
}
