//! Trusty-URI minting for RDF quad-sets.
//!
//! A quad-set is canonicalized relative to a placeholder namespace, hashed
//! with SHA-256 and rewritten so that every self-reference points at the
//! resulting content-addressed URI `<prefix><artifact-code>`.

/// Canonical byte serialization
pub mod canonical;
/// Statement ordering
pub mod compare;
/// SHA-256 artifact codes
pub mod hash;
/// Term rewriting relative to a namespace
pub mod rewrite;
/// Placeholder to trusty URI transformation
pub mod transform;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use canonical::{canonicalize, Canonical};
pub use compare::StatementComparator;
pub use hash::{artifact_code, hash};
pub use rewrite::{rewrite_term, BlankNodeMap};
pub use transform::{make_trusty, Minted};

use crate::{
    error::{NanopubError, Result},
    vocab,
};

/// Token standing in for the artifact code while hashing and signing.
pub const CANONICAL_TOKEN: &str = " ";

/// Module identifier of RDF artifacts hashed with SHA-256.
pub const MODULE_ID: &str = "RA";

/// Length of an artifact code: `RA` plus 43 unpadded base64 characters.
pub const ARTIFACT_CODE_LEN: usize = 45;

/// Placeholder prefix handling.
///
/// A placeholder base under `temp_prefix` is minted into `published_prefix`;
/// any other base keeps its own stem as prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustyConfig {
    pub temp_prefix: String,
    pub published_prefix: String,
}

impl Default for TrustyConfig {
    fn default() -> Self {
        TrustyConfig {
            temp_prefix: vocab::TEMP_PREFIX.to_owned(),
            published_prefix: vocab::PUBLISHED_PREFIX.to_owned(),
        }
    }
}

/// The `RA…` suffix of a trusty URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactCode(String);

impl ArtifactCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the artifact code ending `uri`, if there is one.
    pub fn from_uri(uri: &str) -> Option<ArtifactCode> {
        let start = uri.len().checked_sub(ARTIFACT_CODE_LEN)?;
        uri.get(start..)?.parse().ok()
    }

    pub(crate) fn from_digest_b64(b64: &str) -> ArtifactCode {
        ArtifactCode(format!("{MODULE_ID}{b64}"))
    }
}

impl FromStr for ArtifactCode {
    type Err = NanopubError;

    fn from_str(s: &str) -> Result<Self> {
        let valid = s.len() == ARTIFACT_CODE_LEN
            && s.starts_with(MODULE_ID)
            && s[MODULE_ID.len()..]
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if valid {
            Ok(ArtifactCode(s.to_owned()))
        } else {
            Err(NanopubError::malformed(format!("'{s}' is not an artifact code")))
        }
    }
}

impl fmt::Display for ArtifactCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns true if `uri` ends with an artifact code.
pub fn is_trusty_uri(uri: &str) -> bool {
    ArtifactCode::from_uri(uri).is_some()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NamespaceKind {
    /// Self-references are relative to a placeholder base.
    Placeholder,
    /// Self-references already carry this artifact code.
    Minted(ArtifactCode),
}

/// The namespace self-references are expressed in.
///
/// `base` always ends in `#` or `/`; `stem` is `base` without that separator
/// and names the head-subject; `prefix` is what the artifact code (or token)
/// is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustyNamespace {
    kind: NamespaceKind,
    base: String,
    stem: String,
    prefix: String,
}

impl TrustyNamespace {
    /// Namespace of an unsigned nanopublication whose base is `base`.
    pub fn placeholder(base: &str, config: &TrustyConfig) -> Result<Self> {
        let stem = base
            .strip_suffix('#')
            .or_else(|| base.strip_suffix('/'))
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                NanopubError::malformed(format!(
                    "placeholder base '{base}' must end with '#' or '/'"
                ))
            })?;

        let prefix = if stem.starts_with(&config.temp_prefix) {
            config.published_prefix.clone()
        } else {
            stem.to_owned()
        };

        Ok(TrustyNamespace {
            kind: NamespaceKind::Placeholder,
            base: base.to_owned(),
            stem: stem.to_owned(),
            prefix,
        })
    }

    /// Namespace of a minted nanopublication whose head-subject is `uri`.
    pub fn minted(uri: &str) -> Result<Self> {
        let code = ArtifactCode::from_uri(uri)
            .ok_or_else(|| NanopubError::malformed(format!("'{uri}' is not a trusty URI")))?;
        let prefix = uri[..uri.len() - ARTIFACT_CODE_LEN].to_owned();

        Ok(TrustyNamespace {
            kind: NamespaceKind::Minted(code),
            base: format!("{uri}#"),
            stem: uri.to_owned(),
            prefix,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// The head-subject IRI in this namespace.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Artifact code already carried by a minted namespace.
    pub fn artifact_code(&self) -> Option<&ArtifactCode> {
        match &self.kind {
            NamespaceKind::Minted(code) => Some(code),
            NamespaceKind::Placeholder => None,
        }
    }

    /// The URI the head-subject takes once `token` is substituted.
    pub fn uri_for(&self, token: &str) -> String {
        format!("{}{token}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "RAoXkQkJe_lpMhYW61Y9mqWDHa5MAj1o4pWIiYLmAzY50";

    #[test]
    fn artifact_code_grammar() {
        assert!(CODE.parse::<ArtifactCode>().is_ok());
        assert!("RBoXkQkJe_lpMhYW61Y9mqWDHa5MAj1o4pWIiYLmAzY50"
            .parse::<ArtifactCode>()
            .is_err());
        assert!("RAoXkQkJe_lpMhYW61Y9mqWDHa5MAj1o4pWIiYLmAzY5"
            .parse::<ArtifactCode>()
            .is_err());
        assert!("RAoXkQkJe+lpMhYW61Y9mqWDHa5MAj1o4pWIiYLmAzY50"
            .parse::<ArtifactCode>()
            .is_err());
    }

    #[test]
    fn artifact_code_from_uri() {
        let uri = format!("http://purl.org/np/{CODE}");
        assert_eq!(ArtifactCode::from_uri(&uri).unwrap().as_str(), CODE);
        assert!(is_trusty_uri(&uri));
        assert!(!is_trusty_uri(vocab::PLACEHOLDER_URI));
        assert!(!is_trusty_uri("short"));
    }

    #[test]
    fn placeholder_under_temp_prefix_uses_published_prefix() {
        let base = format!("{}#", vocab::PLACEHOLDER_URI);
        let ns = TrustyNamespace::placeholder(&base, &TrustyConfig::default()).unwrap();
        assert_eq!(ns.stem(), vocab::PLACEHOLDER_URI);
        assert_eq!(ns.prefix(), vocab::PUBLISHED_PREFIX);
        assert_eq!(ns.uri_for(CODE), format!("http://purl.org/np/{CODE}"));
    }

    #[test]
    fn neutral_placeholder_keeps_its_stem() {
        let ns = TrustyNamespace::placeholder("http://example.org/np1/", &TrustyConfig::default())
            .unwrap();
        assert_eq!(ns.prefix(), "http://example.org/np1");
        assert!(TrustyNamespace::placeholder("http://example.org/np1", &TrustyConfig::default())
            .is_err());
    }

    #[test]
    fn minted_namespace_splits_prefix_and_code() {
        let ns = TrustyNamespace::minted(&format!("http://purl.org/np/{CODE}")).unwrap();
        assert_eq!(ns.prefix(), "http://purl.org/np/");
        assert_eq!(ns.artifact_code().unwrap().as_str(), CODE);
        assert_eq!(ns.base(), format!("http://purl.org/np/{CODE}#"));
        assert!(TrustyNamespace::minted(vocab::PLACEHOLDER_URI).is_err());
    }
}
