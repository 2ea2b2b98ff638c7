use crate::{
    rdf::Quad,
    trusty::{
        artifact_code, canonicalize, rewrite::rewrite_quad, ArtifactCode, TrustyNamespace,
        CANONICAL_TOKEN,
    },
};

/// A quad-set whose self-references point at its trusty URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Minted {
    /// Rewritten quads, in the order they were supplied
    pub quads: Vec<Quad>,
    /// `<prefix><code>`
    pub uri: String,
    pub code: ArtifactCode,
}

/// Mints a trusty URI for `quads` and rewrites every self-reference to it.
///
/// Blank nodes receive the numbers they were given while hashing, so the
/// minted quads canonicalize back to the hashed bytes.
pub fn make_trusty(quads: &[Quad], namespace: &TrustyNamespace) -> Minted {
    let canonical = canonicalize(quads, namespace, CANONICAL_TOKEN);
    let code = artifact_code(&canonical.bytes);
    let uri = namespace.uri_for(code.as_str());

    let mut blank_nodes = canonical.blank_nodes;
    let quads = quads
        .iter()
        .map(|quad| rewrite_quad(quad, namespace, code.as_str(), &mut blank_nodes))
        .collect();

    log::debug!("minted {uri}");

    Minted { quads, uri, code }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rdf::{Term, Triple},
        trusty::{hash, TrustyConfig},
        vocab::PLACEHOLDER_URI,
    };

    fn sample() -> Vec<Quad> {
        let graph = format!("{PLACEHOLDER_URI}#assertion");
        vec![
            Triple::new(Term::blank("b"), Term::iri("http://ex/p"), Term::literal("v"))
                .in_graph(&graph),
            Triple::new(
                Term::iri(format!("{PLACEHOLDER_URI}#_thing")),
                Term::iri("http://ex/p"),
                Term::iri(PLACEHOLDER_URI),
            )
            .in_graph(&graph),
        ]
    }

    fn placeholder() -> TrustyNamespace {
        TrustyNamespace::placeholder(&format!("{PLACEHOLDER_URI}#"), &TrustyConfig::default())
            .unwrap()
    }

    #[test]
    fn minted_uri_uses_published_prefix() {
        let minted = make_trusty(&sample(), &placeholder());
        assert_eq!(minted.uri, format!("http://purl.org/np/{}", minted.code));
        assert_eq!(minted.code, hash(&sample(), &placeholder()));
        assert_eq!(minted.quads.len(), 2);
        assert_eq!(minted.quads[1].object, Term::iri(minted.uri.clone()));
        assert_eq!(
            minted.quads[1].subject,
            Term::iri(format!("{}#__thing", minted.uri))
        );
        assert_eq!(
            minted.quads[0].subject,
            Term::iri(format!("{}#_1", minted.uri))
        );
    }

    #[test]
    fn minted_quads_hash_back_to_their_code() {
        let minted = make_trusty(&sample(), &placeholder());
        let namespace = TrustyNamespace::minted(&minted.uri).unwrap();
        assert_eq!(hash(&minted.quads, &namespace), minted.code);
    }
}
