//! Key type whitelist

use std::collections::BTreeSet;

/// Algorithm identifiers accepted when no extra types are configured
pub const DEFAULT_KEY_TYPES: &[&str] = &[
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
    "ssh-dss",
    "ssh-rsa",
];

/// Set of key-type tokens that anchor a key line
///
/// A token is only treated as a key type when it matches an entry exactly.
/// The set can be extended from configuration without touching the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTypeSet {
    types: BTreeSet<String>,
}

impl KeyTypeSet {
    /// Create a set containing exactly the given types
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Add extra types on top of the current set
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(extra.into_iter().map(Into::into));
        self
    }

    /// Check whether a token is a recognized key type
    pub fn contains(&self, token: &str) -> bool {
        self.types.contains(token)
    }

    /// Iterate over the recognized types in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for KeyTypeSet {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_TYPES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_whitelist() {
        let types = KeyTypeSet::default();
        assert_eq!(types.len(), 5);
        assert!(types.contains("ssh-rsa"));
        assert!(types.contains("ssh-dss"));
        assert!(types.contains("ecdsa-sha2-nistp521"));
        assert!(!types.contains("ssh-ed25519"));
    }

    #[test]
    fn test_exact_match_only() {
        let types = KeyTypeSet::default();
        assert!(!types.contains("SSH-RSA"));
        assert!(!types.contains("ssh-rsa-cert-v01@openssh.com"));
        assert!(!types.contains("ecdsa-sha2-"));
    }

    #[test]
    fn test_with_extra() {
        let types = KeyTypeSet::default().with_extra(["ssh-ed25519"]);
        assert_eq!(types.len(), 6);
        assert!(types.contains("ssh-ed25519"));
        assert!(types.contains("ssh-rsa"));
    }

    #[test]
    fn test_iter_sorted() {
        let types = KeyTypeSet::new(["ssh-rsa", "ecdsa-sha2-nistp256"]);
        let listed: Vec<&str> = types.iter().collect();
        assert_eq!(listed, vec!["ecdsa-sha2-nistp256", "ssh-rsa"]);
    }
}
