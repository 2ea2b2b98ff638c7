use std::{borrow::Cow, cmp::Ordering};

use crate::{
    rdf::{Literal, Quad, Term},
    trusty::CANONICAL_TOKEN,
};

/// Total order over quads used by canonicalization.
///
/// Quads compare by graph name, subject, predicate, then object. Absent
/// graph names sort first, literals sort after every other term, and IRIs
/// compare by their UTF-8 bytes once every occurrence of `token` has been
/// replaced by a single space.
#[derive(Debug, Clone, Copy)]
pub struct StatementComparator<'a> {
    token: &'a str,
}

impl<'a> StatementComparator<'a> {
    pub fn new(token: &'a str) -> Self {
        StatementComparator { token }
    }

    pub fn compare(&self, a: &Quad, b: &Quad) -> Ordering {
        self.compare_graph(a.graph.as_ref(), b.graph.as_ref())
            .then_with(|| self.compare_term(&a.subject, &b.subject))
            .then_with(|| self.compare_term(&a.predicate, &b.predicate))
            .then_with(|| self.compare_term(&a.object, &b.object))
    }

    fn compare_graph(&self, a: Option<&Term>, b: Option<&Term>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.compare_term(a, b),
        }
    }

    pub fn compare_term(&self, a: &Term, b: &Term) -> Ordering {
        match (a, b) {
            (Term::Literal(a), Term::Literal(b)) => compare_literal(a, b),
            (Term::Literal(_), _) => Ordering::Greater,
            (_, Term::Literal(_)) => Ordering::Less,
            _ => self
                .resource_str(a)
                .cmp(&self.resource_str(b))
                .then_with(|| kind_rank(a).cmp(&kind_rank(b))),
        }
    }

    fn resource_str<'t>(&self, term: &'t Term) -> Cow<'t, str> {
        match term {
            Term::Iri(iri) if self.token != CANONICAL_TOKEN && iri.contains(self.token) => {
                Cow::Owned(iri.replace(self.token, CANONICAL_TOKEN))
            }
            Term::Iri(iri) => Cow::Borrowed(iri),
            Term::Blank(label) => Cow::Owned(format!("_:{label}")),
            Term::Literal(literal) => Cow::Borrowed(literal.lexical()),
        }
    }
}

fn kind_rank(term: &Term) -> u8 {
    match term {
        Term::Iri(_) => 0,
        Term::Blank(_) => 1,
        Term::Literal(_) => 2,
    }
}

fn compare_literal(a: &Literal, b: &Literal) -> Ordering {
    escape_lexical(a.lexical())
        .cmp(&escape_lexical(b.lexical()))
        .then_with(|| a.effective_datatype().cmp(&b.effective_datatype()))
        .then_with(|| {
            let a = a.language().map(str::to_ascii_lowercase);
            let b = b.language().map(str::to_ascii_lowercase);
            a.cmp(&b)
        })
}

/// Escapes `\` as `\\` and newline as `\n`.
pub fn escape_lexical(lexical: &str) -> Cow<'_, str> {
    if lexical.contains(['\\', '\n']) {
        Cow::Owned(lexical.replace('\\', "\\\\").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(lexical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::xsd;

    const CODE: &str = "RAoXkQkJe_lpMhYW61Y9mqWDHa5MAj1o4pWIiYLmAzY50";

    fn quad(g: Option<&str>, s: &str, o: Term) -> Quad {
        Quad::new(g.map(Term::iri), Term::iri(s), Term::iri("http://p"), o)
    }

    #[test]
    fn default_graph_sorts_first() {
        let cmp = StatementComparator::new(CANONICAL_TOKEN);
        let a = quad(None, "http://z", Term::literal("x"));
        let b = quad(Some("http://a"), "http://a", Term::literal("x"));
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
        assert_eq!(cmp.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn literals_sort_after_iris() {
        let cmp = StatementComparator::new(CANONICAL_TOKEN);
        assert_eq!(
            cmp.compare_term(&Term::literal("a"), &Term::iri("http://z")),
            Ordering::Greater
        );
        assert_eq!(
            cmp.compare_term(&Term::iri("zzz"), &Term::literal("")),
            Ordering::Less
        );
    }

    #[test]
    fn token_is_compared_as_space() {
        let cmp = StatementComparator::new(CODE);
        let minted = Term::iri(format!("http://purl.org/np/{CODE}#assertion"));
        let canonical = Term::iri("http://purl.org/np/ #assertion");
        assert_eq!(cmp.compare_term(&minted, &canonical), Ordering::Equal);

        // a space sorts before '#' and every alphanumeric
        let other = Term::iri("http://purl.org/np/#x");
        assert_eq!(cmp.compare_term(&minted, &other), Ordering::Less);
    }

    #[test]
    fn literal_ordering_levels() {
        let cmp = StatementComparator::new(CANONICAL_TOKEN);
        let plain = Term::literal("a");
        let typed = Term::Literal(Literal::typed("a", xsd::DATE_TIME));
        let tagged = Term::Literal(Literal::lang("a", "en"));
        let tagged_de = Term::Literal(Literal::lang("a", "de"));

        // language-tagged literals have a null datatype and sort first
        assert_eq!(cmp.compare_term(&tagged, &plain), Ordering::Less);
        assert_eq!(cmp.compare_term(&typed, &plain), Ordering::Less);
        assert_eq!(cmp.compare_term(&tagged_de, &tagged), Ordering::Less);
        assert_eq!(
            cmp.compare_term(&tagged, &Term::Literal(Literal::lang("a", "EN"))),
            Ordering::Equal
        );
        assert_eq!(
            cmp.compare_term(&plain, &Term::Literal(Literal::typed("a", xsd::STRING))),
            Ordering::Equal
        );
    }

    #[test]
    fn literals_compare_by_escaped_form() {
        let cmp = StatementComparator::new(CANONICAL_TOKEN);
        // escaped newline is "\n" (0x5C 0x6E), which sorts after 'Z' (0x5A)
        let newline = Term::literal("\n");
        let upper = Term::literal("Z");
        assert_eq!(cmp.compare_term(&newline, &upper), Ordering::Greater);
        assert_eq!(escape_lexical("a\\b\nc"), "a\\\\b\\nc");
    }
}
