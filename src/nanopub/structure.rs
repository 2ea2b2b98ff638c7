use std::collections::BTreeSet;

use crate::{
    error::{NanopubError, Result},
    rdf::{Quad, Term},
    trusty::ArtifactCode,
    vocab::{np, rdf},
};

/// The head-subject and the four graph names of a nanopublication.
///
/// Graph names are taken from the head-graph links, never guessed from
/// their spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NanopubStructure {
    /// Head-subject IRI
    pub uri: String,
    pub head: String,
    pub assertion: String,
    pub provenance: String,
    pub pubinfo: String,
    /// Namespace shared by the head-subject and the graph names, ending in
    /// `#` or `/`
    pub base: String,
}

impl NanopubStructure {
    /// Detects the four-graph structure of `quads`.
    ///
    /// # Errors
    ///
    /// [`NanopubError::Malformed`] when there is no head or more than one,
    /// when a head link is missing or repeated, when the head graph holds
    /// anything but the type and the three links, when a quad lies outside
    /// the four graphs, or when one of the content graphs is empty.
    pub fn from_quads(quads: &[Quad]) -> Result<Self> {
        let heads: BTreeSet<(&str, &str)> = quads
            .iter()
            .filter(|q| q.predicate.is_iri(rdf::TYPE) && q.object.is_iri(np::NANOPUBLICATION))
            .filter_map(|q| Some((q.subject.as_iri()?, q.graph_iri()?)))
            .collect();

        let mut heads = heads.into_iter();
        let (uri, head) = match (heads.next(), heads.next()) {
            (Some(found), None) => found,
            (None, _) => {
                return Err(NanopubError::malformed(
                    "no np:Nanopublication head-subject in a named graph",
                ))
            }
            (Some(_), Some(_)) => {
                return Err(NanopubError::malformed(
                    "multiple candidate nanopublications in one input",
                ))
            }
        };

        let head_quads: Vec<&Quad> = quads.iter().filter(|q| q.in_graph(head)).collect();
        let link = |predicate: &str, name: &str| -> Result<String> {
            let targets: BTreeSet<&Term> = head_quads
                .iter()
                .filter(|q| q.subject.is_iri(uri) && q.predicate.is_iri(predicate))
                .map(|q| &q.object)
                .collect();
            let mut targets = targets.into_iter();
            match (targets.next(), targets.next()) {
                (Some(Term::Iri(target)), None) => Ok(target.clone()),
                (Some(_), None) => Err(NanopubError::malformed(format!(
                    "{name} graph of {uri} is not named by an IRI"
                ))),
                (None, _) => Err(NanopubError::malformed(format!(
                    "{uri} has no {name} graph"
                ))),
                (Some(_), Some(_)) => Err(NanopubError::malformed(format!(
                    "{uri} has more than one {name} graph"
                ))),
            }
        };
        let assertion = link(np::HAS_ASSERTION, "assertion")?;
        let provenance = link(np::HAS_PROVENANCE, "provenance")?;
        let pubinfo = link(np::HAS_PUBLICATION_INFO, "publication info")?;

        for quad in &head_quads {
            let expected = quad.subject.is_iri(uri)
                && (quad.predicate.is_iri(np::HAS_ASSERTION)
                    || quad.predicate.is_iri(np::HAS_PROVENANCE)
                    || quad.predicate.is_iri(np::HAS_PUBLICATION_INFO)
                    || (quad.predicate.is_iri(rdf::TYPE)
                        && quad.object.is_iri(np::NANOPUBLICATION)));
            if !expected {
                return Err(NanopubError::malformed(format!(
                    "unexpected statement in head graph: {} {} {}",
                    quad.subject, quad.predicate, quad.object
                )));
            }
        }

        let graphs = [head, assertion.as_str(), provenance.as_str(), pubinfo.as_str()];
        if graphs.iter().collect::<BTreeSet<_>>().len() != graphs.len() {
            return Err(NanopubError::malformed(
                "head, assertion, provenance and publication info graphs must be distinct",
            ));
        }

        if let Some(stray) = quads
            .iter()
            .find(|q| !q.graph_iri().is_some_and(|g| graphs.contains(&g)))
        {
            let graph = stray
                .graph
                .as_ref()
                .map_or_else(|| "the default graph".to_owned(), ToString::to_string);
            return Err(NanopubError::malformed(format!(
                "statement in {graph} is outside the nanopublication"
            )));
        }

        for (graph, name) in [
            (&assertion, "assertion"),
            (&provenance, "provenance"),
            (&pubinfo, "publication info"),
        ] {
            if !quads.iter().any(|q| q.in_graph(graph)) {
                return Err(NanopubError::malformed(format!("{name} graph is empty")));
            }
        }

        let base = base_namespace(uri, &graphs);
        log::trace!("detected nanopublication {uri} with base {base}");

        Ok(NanopubStructure {
            uri: uri.to_owned(),
            head: head.to_owned(),
            assertion,
            provenance,
            pubinfo,
            base,
        })
    }

    /// Graph names in head, assertion, provenance, pubinfo order.
    pub fn graphs(&self) -> [&str; 4] {
        [&self.head, &self.assertion, &self.provenance, &self.pubinfo]
    }

    /// Artifact code carried by the head-subject, once minted.
    pub fn artifact_code(&self) -> Option<ArtifactCode> {
        ArtifactCode::from_uri(&self.uri)
    }

    pub fn is_trusty(&self) -> bool {
        self.artifact_code().is_some()
    }
}

fn base_namespace(uri: &str, graphs: &[&str]) -> String {
    if uri.ends_with('#') || uri.ends_with('/') {
        return uri.to_owned();
    }
    let slash = format!("{uri}/");
    if graphs.iter().all(|g| g.starts_with(&slash)) {
        slash
    } else {
        format!("{uri}#")
    }
}
