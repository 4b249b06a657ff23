//! Key line parsing (authorized_keys format)
//!
//! A key line has the shape `[options ]keytype keymaterial[ comment]`.

use crate::error::Result;
use crate::keys::{KeyOptions, KeyTypeSet};
use std::fmt;

/// A single parsed key entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    /// Connection options preceding the key type
    pub options: KeyOptions,
    /// Algorithm identifier, one of the recognized key types
    pub key_type: String,
    /// Base64 key material, the identity of the entry
    pub key_material: String,
    /// Trailing free-form text, possibly empty
    pub comment: String,
}

impl KeyEntry {
    /// Parse a raw line into a key entry
    ///
    /// Returns `Ok(None)` when the line is not a key: blank or commented
    /// lines, lines without a recognized key type, lines where the type is
    /// not followed by key material, and lines with an unterminated quote.
    /// A leading options token that does not parse is an error.
    pub fn parse(raw: &str, types: &KeyTypeSet) -> Result<Option<Self>> {
        let unescaped = raw.replace(r"\#", "#");

        let Some(tokens) = tokenize(&unescaped) else {
            return Ok(None);
        };
        if tokens.first().is_none_or(|t| t.starts_with('#')) {
            return Ok(None);
        }

        let Some(type_index) = tokens.iter().position(|t| types.contains(t)) else {
            return Ok(None);
        };
        let Some(key_material) = tokens.get(type_index + 1) else {
            return Ok(None);
        };

        // Only a single leading token is read as options
        let options = if type_index == 1 {
            KeyOptions::parse(&tokens[0])?
        } else {
            KeyOptions::new()
        };

        Ok(Some(Self {
            options,
            key_type: tokens[type_index].clone(),
            key_material: key_material.clone(),
            comment: tokens[type_index + 2..].join(" "),
        }))
    }
}

impl fmt::Display for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.options.is_empty() {
            write!(f, "{} ", self.options)?;
        }
        write!(f, "{} {}", self.key_type, self.key_material)?;
        if !self.comment.is_empty() {
            write!(f, " {}", self.comment)?;
        }
        Ok(())
    }
}

/// Split a line on whitespace, honouring single and double quotes
///
/// Quote characters stay in the tokens, so `from="a b"` is one token and
/// renders back unchanged. Inside double quotes and outside any quote a
/// backslash escapes the next character. `#` has no special meaning.
/// Returns `None` if a quote is left open.
pub fn tokenize(line: &str) -> Option<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                } else if c == '\\' && q == '"' {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                in_token = true;
                current.push(c);
                match c {
                    '"' | '\'' => quote = Some(c),
                    '\\' => {
                        if let Some(next) = chars.next() {
                            current.push(next);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_token {
        tokens.push(current);
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn parse(raw: &str) -> Option<KeyEntry> {
        KeyEntry::parse(raw, &KeyTypeSet::default()).unwrap()
    }

    #[test]
    fn test_tokenize_whitespace() {
        assert_eq!(
            tokenize("  ssh-rsa\tAAAA   a b ").unwrap(),
            vec!["ssh-rsa", "AAAA", "a", "b"]
        );
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_quotes_kept() {
        assert_eq!(
            tokenize(r#"from="a b",no-pty ssh-rsa K"#).unwrap(),
            vec![r#"from="a b",no-pty"#, "ssh-rsa", "K"]
        );
        assert_eq!(tokenize("'x y' z").unwrap(), vec!["'x y'", "z"]);
    }

    #[test]
    fn test_tokenize_escaped_quote() {
        assert_eq!(
            tokenize(r#"command="say \"a b\"" rest"#).unwrap(),
            vec![r#"command="say \"a b\"""#, "rest"]
        );
    }

    #[test]
    fn test_tokenize_hash_is_plain() {
        assert_eq!(tokenize("a #b c").unwrap(), vec!["a", "#b", "c"]);
    }

    #[test]
    fn test_tokenize_unterminated() {
        assert!(tokenize(r#"from="open ssh-rsa K"#).is_none());
        assert!(tokenize("'open").is_none());
    }

    #[test]
    fn test_parse_plain_key() {
        let entry = parse("ssh-rsa AAAAB3NzaC1yc2EA alice@host").unwrap();
        assert_eq!(entry.key_type, "ssh-rsa");
        assert_eq!(entry.key_material, "AAAAB3NzaC1yc2EA");
        assert_eq!(entry.comment, "alice@host");
        assert!(entry.options.is_empty());
    }

    #[test]
    fn test_parse_without_comment() {
        let entry = parse("ecdsa-sha2-nistp256 AAAAE2VjZHNh").unwrap();
        assert_eq!(entry.comment, "");
        assert_eq!(entry.to_string(), "ecdsa-sha2-nistp256 AAAAE2VjZHNh");
    }

    #[test]
    fn test_parse_multi_word_comment() {
        let entry = parse("ssh-dss AAAAB3NzaC1kc3M  my   laptop key").unwrap();
        assert_eq!(entry.comment, "my laptop key");
    }

    #[test]
    fn test_parse_with_options() {
        let entry = parse(r#"no-port-forwarding,from="10.0.0.1" ssh-rsa AAAAKEY2 c"#).unwrap();
        assert_eq!(entry.options.len(), 2);
        assert_eq!(entry.options.get("from"), Some(Some("10.0.0.1")));
        assert_eq!(
            entry.to_string(),
            r#"from="10.0.0.1",no-port-forwarding ssh-rsa AAAAKEY2 c"#
        );
    }

    #[test]
    fn test_parse_options_with_spaces_in_value() {
        let entry = parse(r#"command="/usr/bin/rrsync -ro /srv" ssh-rsa AAAAKEY3"#).unwrap();
        assert_eq!(
            entry.options.get("command"),
            Some(Some("/usr/bin/rrsync -ro /srv"))
        );
    }

    #[test]
    fn test_parse_invalid_options_is_error() {
        let result = KeyEntry::parse("from=nope ssh-rsa AAAAKEY4", &KeyTypeSet::default());
        assert!(matches!(result, Err(Error::InvalidOptionString(_))));
    }

    #[test]
    fn test_parse_options_ignored_past_first_token() {
        let entry = parse("no-pty no-X11-forwarding ssh-rsa AAAAKEY5 c").unwrap();
        assert!(entry.options.is_empty());
        assert_eq!(entry.key_material, "AAAAKEY5");
    }

    #[test]
    fn test_parse_escaped_hash_in_comment() {
        let entry = parse(r"ssh-rsa AAAAKEY6 build \#42").unwrap();
        assert_eq!(entry.comment, "build #42");
    }

    #[test]
    fn test_parse_not_a_key() {
        assert!(parse("").is_none());
        assert!(parse("   ").is_none());
        assert!(parse("# ssh-rsa AAAAKEY7 disabled").is_none());
        assert!(parse(r"\# ssh-rsa AAAAKEY7 disabled").is_none());
        assert!(parse("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5 unsupported").is_none());
        assert!(parse("ssh-rsa").is_none());
        assert!(parse("no-pty ssh-rsa").is_none());
        assert!(parse(r#"from="open ssh-rsa AAAAKEY8"#).is_none());
    }

    #[test]
    fn test_parse_configured_type() {
        let types = KeyTypeSet::default().with_extra(["ssh-ed25519"]);
        let entry = KeyEntry::parse("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5 me", &types)
            .unwrap()
            .unwrap();
        assert_eq!(entry.key_type, "ssh-ed25519");
    }

    #[test]
    fn test_round_trip() {
        let raw = r#"no-agent-forwarding,command="echo \"x\"",from="a,b" ssh-rsa AAAAKEY9 who@where"#;
        let entry = parse(raw).unwrap();
        let reparsed = parse(&entry.to_string()).unwrap();
        assert_eq!(entry, reparsed);
    }
}
