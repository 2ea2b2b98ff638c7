use serde::{Deserialize, Serialize};

use crate::{profile::Profile, trusty::TrustyConfig, vocab};

/// Assembler configuration.
///
/// Attribution to the profile and to an explicit IRI are mutually exclusive
/// for the assertion and for the publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NanopubConfig {
    /// Identity used for attribution and signing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// Publish to the test server instead of the production server
    pub use_test_server: bool,
    /// Add `prov:generatedAtTime` for the assertion to the provenance graph
    pub add_prov_generated_time: bool,
    /// Add `prov:generatedAtTime` for the nanopublication to the pubinfo graph
    pub add_pubinfo_generated_time: bool,
    /// Attribute the assertion to the profile's ORCID
    pub attribute_assertion_to_profile: bool,
    /// Attribute the nanopublication to the profile's ORCID
    pub attribute_publication_to_profile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion_attributed_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_attributed_to: Option<String>,
    /// Sources the assertion was derived from
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub derived_from: Vec<String>,
    /// Concept introduced by this nanopublication; `_:name` is local to it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduces_concept: Option<String>,
    /// Placeholder head-subject
    pub placeholder: String,
    pub trusty: TrustyConfig,
}

impl Default for NanopubConfig {
    fn default() -> Self {
        NanopubConfig {
            profile: None,
            use_test_server: false,
            add_prov_generated_time: false,
            add_pubinfo_generated_time: true,
            attribute_assertion_to_profile: false,
            attribute_publication_to_profile: false,
            assertion_attributed_to: None,
            publication_attributed_to: None,
            derived_from: Vec::new(),
            introduces_concept: None,
            placeholder: vocab::PLACEHOLDER_URI.to_owned(),
            trusty: TrustyConfig::default(),
        }
    }
}

impl NanopubConfig {
    /// Configuration attributing both assertion and publication to `profile`.
    pub fn with_profile(profile: Profile) -> Self {
        NanopubConfig {
            profile: Some(profile),
            attribute_assertion_to_profile: true,
            attribute_publication_to_profile: true,
            ..Default::default()
        }
    }
}
