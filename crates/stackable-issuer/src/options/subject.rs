use serde::Deserialize;

/// OID of the PKCS#9 `emailAddress` attribute. It is spelled out as a dotted
/// OID, because the short name is not part of the RFC 4514 attribute keys.
const EMAIL_ADDRESS_OID: &str = "1.2.840.113549.1.9.1";

/// Subject fields of a certificate signing request.
///
/// Every field is optional, absent fields are left out of the distinguished
/// name.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    #[serde(rename = "organizationUnit")]
    pub organizational_unit: Option<String>,
    pub common_name: Option<String>,
    pub email_address: Option<String>,
}

impl Subject {
    /// Renders the subject as an RFC 4514 distinguished name string.
    ///
    /// RFC 4514 strings list the most specific RDN first, so the resulting
    /// RDN sequence is `C, ST, L, O, OU, CN, emailAddress` once parsed.
    pub fn to_rfc4514_string(&self) -> String {
        let attributes = [
            (EMAIL_ADDRESS_OID, &self.email_address),
            ("CN", &self.common_name),
            ("OU", &self.organizational_unit),
            ("O", &self.organization),
            ("L", &self.locality),
            ("ST", &self.state),
            ("C", &self.country),
        ];

        attributes
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .map(|value| format!("{key}={}", escape_attribute_value(value)))
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Escapes an attribute value according to RFC 4514, section 2.4.
fn escape_attribute_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);

    for (index, c) in value.chars().enumerate() {
        let needs_escape = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=')
            || (index == 0 && matches!(c, '#' | ' '))
            || (index == last && c == ' ');

        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}
