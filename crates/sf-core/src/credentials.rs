//! Secrets for the two remote services.
//!
//! Both keys are read once at start-up into [`Credentials`], which is then
//! handed to each client by reference. Nothing else in the workspace reads
//! the environment for secrets.

use std::fmt;

use crate::error::{Error, Result};

pub const VISION_KEY_VAR: &str = "GEMINI_API_KEY";
pub const GENERATION_KEY_VAR: &str = "NVIDIA_NIM_API_KEY";

/// An opaque secret whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    /// Passed to the vision API as the `key` query parameter
    pub vision_key: Secret,
    /// Sent to the generation API as a bearer token
    pub generation_key: Secret,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from an arbitrary lookup. A value that is absent
    /// or blank counts as missing. The vision key is checked first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| -> Result<Secret> {
            match lookup(name) {
                Some(v) if !v.trim().is_empty() => Ok(Secret::new(v.trim())),
                _ => Err(Error::MissingCredential(name)),
            }
        };

        let vision_key = read(VISION_KEY_VAR)?;
        let generation_key = read(GENERATION_KEY_VAR)?;

        Ok(Self {
            vision_key,
            generation_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_loads_both_keys() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (VISION_KEY_VAR, "g-key"),
            (GENERATION_KEY_VAR, " nvapi-key \n"),
        ]))
        .unwrap();

        assert_eq!(creds.vision_key.expose(), "g-key");
        assert_eq!(creds.generation_key.expose(), "nvapi-key");
    }

    #[test]
    fn test_every_missing_combination_fails() {
        let cases: [(&[(&str, &str)], &str); 5] = [
            (&[], VISION_KEY_VAR),
            (&[(GENERATION_KEY_VAR, "n")], VISION_KEY_VAR),
            (&[(VISION_KEY_VAR, "g")], GENERATION_KEY_VAR),
            (&[(VISION_KEY_VAR, ""), (GENERATION_KEY_VAR, "n")], VISION_KEY_VAR),
            (&[(VISION_KEY_VAR, "g"), (GENERATION_KEY_VAR, "   ")], GENERATION_KEY_VAR),
        ];

        for (pairs, expected) in cases {
            match Credentials::from_lookup(lookup_from(pairs)) {
                Err(Error::MissingCredential(name)) => assert_eq!(name, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (VISION_KEY_VAR, "super-secret-vision"),
            (GENERATION_KEY_VAR, "super-secret-nim"),
        ]))
        .unwrap();

        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("Secret(***)"));
    }
}
