use std::collections::HashMap;

use crate::{
    rdf::{Quad, Term},
    trusty::{NamespaceKind, TrustyNamespace},
};

/// Sequential numbering of blank-node labels, starting at 1 in the order
/// labels are first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankNodeMap(HashMap<String, usize>);

impl BlankNodeMap {
    /// Returns the number assigned to `label`, assigning the next one if new.
    pub fn number(&mut self, label: &str) -> usize {
        let next = self.0.len() + 1;
        *self.0.entry(label.to_owned()).or_insert(next)
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rewrites a single term relative to `namespace`, substituting `token` for
/// the artifact code.
///
/// * literals are returned unchanged;
/// * blank nodes become `<prefix><token>#_<n>`;
/// * the head-subject becomes `<prefix><token>`;
/// * `<base><suffix>` becomes `<prefix><token>#<suffix>`, with an extra
///   underscore when `suffix` starts with `_` so it cannot collide with a
///   rewritten blank node;
/// * any other IRI is returned unchanged.
///
/// In a minted namespace the artifact code is already in place, so rewriting
/// only substitutes `token` for it.
pub fn rewrite_term(
    term: &Term,
    namespace: &TrustyNamespace,
    token: &str,
    blank_nodes: &mut BlankNodeMap,
) -> Term {
    match term {
        Term::Literal(_) => term.clone(),
        Term::Blank(label) => {
            let n = blank_nodes.number(label);
            Term::Iri(format!("{}{token}#_{n}", namespace.prefix))
        }
        Term::Iri(iri) => match &namespace.kind {
            NamespaceKind::Placeholder => rewrite_placeholder_iri(iri, namespace, token),
            NamespaceKind::Minted(code) => {
                let minted = format!("{}{}", namespace.prefix, code.as_str());
                match iri.strip_prefix(&minted) {
                    Some(rest) => Term::Iri(format!("{}{token}{rest}", namespace.prefix)),
                    None => term.clone(),
                }
            }
        },
    }
}

fn rewrite_placeholder_iri(iri: &str, namespace: &TrustyNamespace, token: &str) -> Term {
    if iri == namespace.base || iri == namespace.stem {
        return Term::Iri(format!("{}{token}", namespace.prefix));
    }

    match iri.strip_prefix(namespace.base.as_str()) {
        Some(suffix) if suffix.starts_with('_') => {
            Term::Iri(format!("{}{token}#_{suffix}", namespace.prefix))
        }
        Some(suffix) => Term::Iri(format!("{}{token}#{suffix}", namespace.prefix)),
        None => Term::Iri(iri.to_owned()),
    }
}

/// Rewrites all four terms of `quad`, graph name first.
pub fn rewrite_quad(
    quad: &Quad,
    namespace: &TrustyNamespace,
    token: &str,
    blank_nodes: &mut BlankNodeMap,
) -> Quad {
    quad.map_terms(|term| rewrite_term(term, namespace, token, blank_nodes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rdf::Literal,
        trusty::{TrustyConfig, CANONICAL_TOKEN},
        vocab::PLACEHOLDER_URI,
    };

    const CODE: &str = "RAoXkQkJe_lpMhYW61Y9mqWDHa5MAj1o4pWIiYLmAzY50";

    fn temp_ns() -> TrustyNamespace {
        TrustyNamespace::placeholder(&format!("{PLACEHOLDER_URI}#"), &TrustyConfig::default())
            .unwrap()
    }

    fn rewrite(term: Term, token: &str) -> Term {
        rewrite_term(&term, &temp_ns(), token, &mut BlankNodeMap::default())
    }

    macro_rules! tests {
        ($($name:ident: $input:expr => $expected:literal),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(rewrite(Term::iri($input), CANONICAL_TOKEN), Term::iri($expected));
                }
            )*
        };
    }

    tests! {
        head_without_separator: PLACEHOLDER_URI => "http://purl.org/np/ ",
        head_with_separator: format!("{PLACEHOLDER_URI}#") => "http://purl.org/np/ ",
        assertion_graph: format!("{PLACEHOLDER_URI}#assertion") => "http://purl.org/np/ #assertion",
        head_graph_keeps_case: format!("{PLACEHOLDER_URI}#Head") => "http://purl.org/np/ #Head",
        pubinfo_graph_keeps_case: format!("{PLACEHOLDER_URI}#pubInfo") => "http://purl.org/np/ #pubInfo",
        signature_subject: format!("{PLACEHOLDER_URI}#sig") => "http://purl.org/np/ #sig",
        underscore_suffix_doubled: format!("{PLACEHOLDER_URI}#_concept") => "http://purl.org/np/ #__concept",
        foreign_iri_untouched: "http://example.org/thing" => "http://example.org/thing",
        sibling_iri_untouched: format!("{PLACEHOLDER_URI}2#x") => "http://purl.org/nanopub/temp/mynanopub2#x",
    }

    #[test]
    fn literals_are_untouched() {
        let literal = Term::Literal(Literal::lang(PLACEHOLDER_URI, "en"));
        assert_eq!(rewrite(literal.clone(), CANONICAL_TOKEN), literal);
    }

    #[test]
    fn blank_nodes_are_numbered_in_first_seen_order() {
        let ns = temp_ns();
        let mut map = BlankNodeMap::default();
        let a = rewrite_term(&Term::blank("x"), &ns, CANONICAL_TOKEN, &mut map);
        let b = rewrite_term(&Term::blank("y"), &ns, CANONICAL_TOKEN, &mut map);
        let a_again = rewrite_term(&Term::blank("x"), &ns, CODE, &mut map);

        assert_eq!(a, Term::iri("http://purl.org/np/ #_1"));
        assert_eq!(b, Term::iri("http://purl.org/np/ #_2"));
        assert_eq!(a_again, Term::iri(format!("http://purl.org/np/{CODE}#_1")));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn artifact_token_mints_uri() {
        assert_eq!(
            rewrite(Term::iri(format!("{PLACEHOLDER_URI}#assertion")), CODE),
            Term::iri(format!("http://purl.org/np/{CODE}#assertion"))
        );
    }

    #[test]
    fn minted_namespace_substitutes_token_for_code() {
        let ns = TrustyNamespace::minted(&format!("http://purl.org/np/{CODE}")).unwrap();
        let mut map = BlankNodeMap::default();
        let head = rewrite_term(
            &Term::iri(format!("http://purl.org/np/{CODE}")),
            &ns,
            CANONICAL_TOKEN,
            &mut map,
        );
        let doubled = rewrite_term(
            &Term::iri(format!("http://purl.org/np/{CODE}#__concept")),
            &ns,
            CANONICAL_TOKEN,
            &mut map,
        );
        assert_eq!(head, Term::iri("http://purl.org/np/ "));
        assert_eq!(doubled, Term::iri("http://purl.org/np/ #__concept"));
    }

    #[test]
    fn rewriting_a_minted_term_in_its_own_namespace_is_identity() {
        let ns = temp_ns();
        let mut map = BlankNodeMap::default();
        for term in [
            Term::iri(PLACEHOLDER_URI),
            Term::iri(format!("{PLACEHOLDER_URI}#_x")),
            Term::blank("b"),
        ] {
            let once = rewrite_term(&term, &ns, CODE, &mut map);
            let minted = TrustyNamespace::minted(&ns.uri_for(CODE)).unwrap();
            let twice = rewrite_term(&once, &minted, CODE, &mut map);
            assert_eq!(once, twice);
        }
    }
}
