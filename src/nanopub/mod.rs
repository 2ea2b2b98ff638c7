//! The nanopublication value type.
//!
//! A [`Nanopub`] is a quad-set that has passed structure detection. It is
//! either unsigned, with a placeholder head-subject, or signed and minted.

/// Quad assembly from caller graphs
pub mod assemble;
/// Assembler configuration
pub mod config;
/// Four-graph structure detection
pub mod structure;

pub use assemble::assemble;
pub use config::NanopubConfig;
pub use structure::NanopubStructure;

use crate::{
    error::Result,
    io::{self, RdfFormat},
    rdf::{Quad, Triple},
    signature::{self, Verified},
    signer::Signer,
    trusty::{ArtifactCode, TrustyConfig},
    vocab::npx,
};

/// A structurally valid nanopublication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nanopub {
    quads: Vec<Quad>,
    structure: NanopubStructure,
}

impl Nanopub {
    /// Assembles an unsigned nanopublication from its three content graphs.
    ///
    /// See [`assemble`] for what is added and when it fails.
    pub fn new(
        config: &NanopubConfig,
        assertion: Vec<Triple>,
        provenance: Vec<Triple>,
        pubinfo: Vec<Triple>,
    ) -> Result<Self> {
        Self::from_quads(assemble(config, assertion, provenance, pubinfo)?)
    }

    /// Wraps quads that already form a nanopublication.
    pub fn from_quads(quads: Vec<Quad>) -> Result<Self> {
        let structure = NanopubStructure::from_quads(&quads)?;
        Ok(Nanopub { quads, structure })
    }

    /// Parses a single nanopublication.
    pub fn parse(text: &str, format: RdfFormat) -> Result<Self> {
        Self::from_quads(io::parse(text, format)?)
    }

    /// Signs with `signer` and mints the trusty URI under the default
    /// [`TrustyConfig`].
    pub fn sign(&self, signer: &dyn Signer) -> Result<Nanopub> {
        self.sign_with(signer, &TrustyConfig::default())
    }

    pub fn sign_with(&self, signer: &dyn Signer, config: &TrustyConfig) -> Result<Nanopub> {
        let minted = signature::sign(&self.quads, signer, config)?;
        log::info!("signed nanopublication {}", minted.uri);
        Self::from_quads(minted.quads)
    }

    /// Checks the signature and the trusty URI.
    pub fn verify(&self) -> Result<Verified> {
        signature::verify(&self.quads)
    }

    /// The head-subject: a placeholder until signed, the trusty URI after.
    pub fn uri(&self) -> &str {
        &self.structure.uri
    }

    pub fn artifact_code(&self) -> Option<ArtifactCode> {
        self.structure.artifact_code()
    }

    /// True once the nanopublication carries a trusty URI and a signature.
    pub fn is_signed(&self) -> bool {
        self.structure.is_trusty()
            && self.quads.iter().any(|q| {
                q.in_graph(&self.structure.pubinfo) && q.predicate.is_iri(npx::HAS_SIGNATURE)
            })
    }

    pub fn structure(&self) -> &NanopubStructure {
        &self.structure
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }

    pub fn head(&self) -> impl Iterator<Item = &Quad> + '_ {
        self.graph(&self.structure.head)
    }

    pub fn assertion(&self) -> impl Iterator<Item = &Quad> + '_ {
        self.graph(&self.structure.assertion)
    }

    pub fn provenance(&self) -> impl Iterator<Item = &Quad> + '_ {
        self.graph(&self.structure.provenance)
    }

    pub fn pubinfo(&self) -> impl Iterator<Item = &Quad> + '_ {
        self.graph(&self.structure.pubinfo)
    }

    fn graph<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Quad> + 'a {
        self.quads.iter().filter(move |q| q.in_graph(name))
    }

    /// Serializes in `format`, graphs in head, assertion, provenance,
    /// pubinfo order.
    pub fn serialize(&self, format: RdfFormat) -> String {
        io::serialize(&self.quads, Some(&self.structure), format)
    }

    pub fn to_trig(&self) -> String {
        self.serialize(RdfFormat::TriG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        rdf::Term,
        signer::RsaSigner,
        vocab::{PLACEHOLDER_URI, PUBLISHED_PREFIX},
    };

    fn signer() -> RsaSigner {
        RsaSigner::from_private_key_str(include_str!("../../fixtures/id_rsa.pem")).unwrap()
    }

    fn config() -> NanopubConfig {
        NanopubConfig {
            assertion_attributed_to: Some("https://orcid.org/0000-0000-0000-0000".to_owned()),
            ..Default::default()
        }
    }

    fn claims(subjects: &[Term]) -> Vec<Triple> {
        subjects
            .iter()
            .enumerate()
            .map(|(i, subject)| {
                Triple::new(
                    subject.clone(),
                    Term::iri("http://purl.org/petapico/o/hycl#claims"),
                    Term::literal(format!("This is a test of nanopub-python {i}")),
                )
            })
            .collect()
    }

    #[test]
    fn new_sign_verify() {
        let _ = env_logger::builder().is_test(true).try_init();
        let np = Nanopub::new(&config(), claims(&[Term::iri("http://test")]), vec![], vec![])
            .unwrap();
        assert_eq!(np.uri(), PLACEHOLDER_URI);
        assert!(!np.is_signed());

        let signed = np.sign(&signer()).unwrap();
        assert!(signed.is_signed());
        assert!(signed.uri().starts_with(PUBLISHED_PREFIX));
        assert_eq!(signed.assertion().count(), 1);
        assert_eq!(signed.head().count(), 4);
        assert_eq!(signed.pubinfo().count(), np.pubinfo().count() + 4);
        assert_eq!(signed.verify().unwrap().uri, signed.uri());
    }

    #[test]
    fn two_blank_nodes_keep_distinct_identities() {
        let np = Nanopub::new(
            &config(),
            claims(&[Term::blank("test"), Term::blank("test2")]),
            vec![],
            vec![],
        )
        .unwrap();
        let signed = np.sign(&signer()).unwrap();
        let subjects: Vec<&Term> = signed.assertion().map(|q| &q.subject).collect();
        assert_eq!(subjects.len(), 2);
        assert_ne!(subjects[0], subjects[1]);
        assert!(signed.verify().is_ok());
    }

    #[test]
    fn trig_round_trip_keeps_the_signature_valid() {
        let np = Nanopub::new(&config(), claims(&[Term::iri("http://test")]), vec![], vec![])
            .unwrap();
        let signed = np.sign(&signer()).unwrap();

        for format in [RdfFormat::TriG, RdfFormat::NQuads, RdfFormat::TriX] {
            let reparsed = Nanopub::parse(&signed.serialize(format), format).unwrap();
            assert_eq!(reparsed.uri(), signed.uri());
            assert!(reparsed.verify().is_ok(), "{format}");
        }
    }

    #[test]
    fn missing_pubinfo_does_not_parse() {
        let err = Nanopub::parse(include_str!("../../fixtures/missing-pubinfo.trig"), RdfFormat::TriG)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
