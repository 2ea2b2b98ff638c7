use crate::{
    rdf::{Quad, Term},
    trusty::{
        compare::{escape_lexical, StatementComparator},
        rewrite::{rewrite_quad, BlankNodeMap},
        TrustyNamespace,
    },
    vocab::xsd,
};

/// Output of [`canonicalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    /// The canonical byte stream that is hashed or signed
    pub bytes: Vec<u8>,
    /// Blank-node numbering assigned during the traversal
    pub blank_nodes: BlankNodeMap,
}

/// Canonicalizes a quad-set relative to `namespace`.
///
/// Quads are put in raw `(graph, subject, predicate, object)` order, which
/// fixes the blank-node numbering, then rewritten with `token` standing in for
/// the artifact code, sorted with the [`StatementComparator`] and rendered
/// one term per line. A quad whose rendering equals the previous one is
/// emitted once.
///
/// # Arguments
/// * `quads` - The quad-set, in any order
/// * `namespace` - Namespace self-references are expressed in
/// * `token` - Usually [`CANONICAL_TOKEN`](crate::trusty::CANONICAL_TOKEN)
///
/// # Returns
/// The canonical bytes and the blank-node numbering that produced them
pub fn canonicalize(quads: &[Quad], namespace: &TrustyNamespace, token: &str) -> Canonical {
    let mut ordered: Vec<&Quad> = quads.iter().collect();
    ordered.sort();

    let mut blank_nodes = BlankNodeMap::default();
    let mut rewritten: Vec<Quad> = ordered
        .into_iter()
        .map(|quad| rewrite_quad(quad, namespace, token, &mut blank_nodes))
        .collect();

    let comparator = StatementComparator::new(token);
    rewritten.sort_by(|a, b| comparator.compare(a, b));

    let mut bytes = Vec::new();
    let mut previous = String::new();
    for quad in &rewritten {
        let rendered = render_quad(quad);
        if rendered == previous {
            continue;
        }
        bytes.extend_from_slice(rendered.as_bytes());
        previous = rendered;
    }

    log::trace!(
        "canonicalized {} quads into {} bytes ({} blank nodes)",
        quads.len(),
        bytes.len(),
        blank_nodes.len()
    );

    Canonical { bytes, blank_nodes }
}

fn render_quad(quad: &Quad) -> String {
    let mut out = String::new();
    if let Some(graph) = &quad.graph {
        render_term(graph, &mut out);
    }
    out.push('\n');
    for term in [&quad.subject, &quad.predicate, &quad.object] {
        render_term(term, &mut out);
        out.push('\n');
    }
    out
}

fn render_term(term: &Term, out: &mut String) {
    match term {
        Term::Iri(iri) => out.push_str(iri),
        Term::Blank(label) => {
            out.push_str("_:");
            out.push_str(label);
        }
        Term::Literal(literal) => {
            match literal.language() {
                Some(language) => {
                    out.push('@');
                    out.push_str(&language.to_ascii_lowercase());
                }
                None => {
                    out.push('^');
                    out.push_str(literal.datatype().unwrap_or(xsd::STRING));
                }
            }
            out.push(' ');
            out.push_str(&escape_lexical(literal.lexical()));
        }
    }
}
