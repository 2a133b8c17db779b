//! Distinguished name rendering
//!
//! Names render in OpenSSL one-line form, one `/<attr>=<value>` segment per
//! attribute in encoded order, so `/CN=Test CA` for a bare common name.

use der::asn1::{Ia5StringRef, PrintableStringRef, Utf8StringRef};
use x509_cert::name::Name;

use crate::types::DistinguishedName;

/// Render an x509-cert `Name` as a one-line distinguished name
pub fn extract_distinguished_name(name: &Name) -> DistinguishedName {
    let mut rendered = String::new();

    for rdn in &name.0 {
        for atv in rdn.0.iter() {
            let oid = atv.oid.to_string();
            let label = short_name(&oid).unwrap_or(oid.as_str());

            // Try the ASN.1 string types certificates actually use
            let value = if let Ok(ps) = PrintableStringRef::try_from(&atv.value) {
                ps.to_string()
            } else if let Ok(utf8s) = Utf8StringRef::try_from(&atv.value) {
                utf8s.to_string()
            } else if let Ok(ia5s) = Ia5StringRef::try_from(&atv.value) {
                ia5s.to_string()
            } else {
                format!("#{}", hex::encode(atv.value.value()))
            };

            rendered.push('/');
            rendered.push_str(label);
            rendered.push('=');
            rendered.push_str(&value);
        }
    }

    DistinguishedName::new(rendered)
}

fn short_name(oid: &str) -> Option<&'static str> {
    let name = match oid {
        "2.5.4.3" => "CN",
        "2.5.4.5" => "serialNumber",
        "2.5.4.6" => "C",
        "2.5.4.7" => "L",
        "2.5.4.8" => "ST",
        "2.5.4.10" => "O",
        "2.5.4.11" => "OU",
        "0.9.2342.19200300.100.1.25" => "DC",
        "0.9.2342.19200300.100.1.1" => "UID",
        "1.2.840.113549.1.9.1" => "emailAddress",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names() {
        assert_eq!(short_name("2.5.4.3"), Some("CN"));
        assert_eq!(short_name("2.5.4.10"), Some("O"));
        assert_eq!(short_name("1.2.3.4"), None);
    }
}
