//! Distinguished name identity strings

use std::borrow::Borrow;
use std::fmt;

/// Subject or issuer identity in OpenSSL one-line form, e.g. `/CN=Test CA`.
///
/// Issuer discovery and CRL matching compare names by this string, so two
/// names are the same identity exactly when their one-line forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DistinguishedName(String);

impl DistinguishedName {
    /// Wrap an already rendered one-line name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name built from a single common name, `/CN=<cn>`.
    pub fn from_common_name(cn: &str) -> Self {
        Self(format!("/CN={cn}"))
    }

    /// The rendered one-line form.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the last `CN` attribute, if any.
    pub fn common_name(&self) -> Option<&str> {
        self.0
            .split('/')
            .filter_map(|rdn| rdn.strip_prefix("CN="))
            .next_back()
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DistinguishedName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DistinguishedName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for DistinguishedName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for DistinguishedName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DistinguishedName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_name_is_last_cn() {
        let name = DistinguishedName::new("/O=Example/CN=first/CN=second");
        assert_eq!(name.common_name(), Some("second"));
    }

    #[test]
    fn test_common_name_absent() {
        let name = DistinguishedName::new("/O=Example");
        assert_eq!(name.common_name(), None);
    }

    #[test]
    fn test_from_common_name_renders_one_line() {
        let name = DistinguishedName::from_common_name("Test CA");
        assert_eq!(name, "/CN=Test CA");
        assert_eq!(name.to_string(), "/CN=Test CA");
    }
}
