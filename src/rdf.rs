use std::fmt;

use crate::vocab::{rdf, xsd};

/// An RDF term.
///
/// The null graph-name is modelled as `Option::None` on [`Quad::graph`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Absolute IRI reference
    Iri(String),
    /// Blank node, identified by a document-local label
    Blank(String),
    /// Literal value
    Literal(Literal),
}

/// An RDF literal.
///
/// Literals are normalized on construction: a datatype of `xsd:string` is
/// stored as absent and a language-tagged literal never carries a datatype.
/// Language tags are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    lexical: String,
    datatype: Option<String>,
    language: Option<String>,
}

impl Literal {
    /// Creates a plain `xsd:string` literal.
    pub fn string(lexical: impl Into<String>) -> Self {
        Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// Creates a literal with an explicit datatype IRI.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        let datatype = if datatype == xsd::STRING {
            None
        } else {
            Some(datatype)
        };
        Literal {
            lexical: lexical.into(),
            datatype,
            language: None,
        }
    }

    /// Creates a language-tagged literal.
    pub fn lang(lexical: impl Into<String>, language: &str) -> Self {
        Literal {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.to_owned()),
        }
    }

    /// Creates a literal from parser output, where any component may be absent.
    pub fn new(lexical: impl Into<String>, datatype: Option<&str>, language: Option<&str>) -> Self {
        match (language, datatype) {
            (Some(language), _) => Literal::lang(lexical, language),
            (None, Some(datatype)) if datatype != rdf::LANG_STRING => {
                Literal::typed(lexical, datatype)
            }
            (None, _) => Literal::string(lexical),
        }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    /// Datatype IRI, `None` for `xsd:string` and language-tagged literals.
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// Datatype with the `xsd:string` default applied to untagged literals.
    pub fn effective_datatype(&self) -> Option<&str> {
        match (&self.language, &self.datatype) {
            (Some(_), _) => None,
            (None, Some(datatype)) => Some(datatype),
            (None, None) => Some(xsd::STRING),
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    /// Plain string literal.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal(Literal::string(lexical))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn is_iri(&self, iri: &str) -> bool {
        self.as_iri() == Some(iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal(literal) => {
                write!(f, "{:?}", literal.lexical)?;
                match (&literal.language, &literal.datatype) {
                    (Some(language), _) => write!(f, "@{language}"),
                    (None, Some(datatype)) => write!(f, "^^<{datatype}>"),
                    (None, None) => Ok(()),
                }
            }
        }
    }
}

/// A triple, the unit callers use to populate graphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    /// Places this triple in the named graph `graph`.
    pub fn in_graph(self, graph: &str) -> Quad {
        Quad {
            graph: Some(Term::iri(graph)),
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
        }
    }
}

/// An RDF quad.
///
/// The derived ordering is the raw lexicographic order on the
/// `(graph, subject, predicate, object)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quad {
    /// Graph name, `None` for the default graph
    pub graph: Option<Term>,
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Quad {
    pub fn new(graph: Option<Term>, subject: Term, predicate: Term, object: Term) -> Self {
        Quad {
            graph,
            subject,
            predicate,
            object,
        }
    }

    /// Graph name as an IRI string, if the graph is a named IRI graph.
    pub fn graph_iri(&self) -> Option<&str> {
        self.graph.as_ref().and_then(Term::as_iri)
    }

    pub fn in_graph(&self, graph: &str) -> bool {
        self.graph_iri() == Some(graph)
    }

    pub fn triple(&self) -> Triple {
        Triple::new(
            self.subject.clone(),
            self.predicate.clone(),
            self.object.clone(),
        )
    }

    /// Applies `f` to every term of the quad, graph name first.
    pub fn map_terms(&self, mut f: impl FnMut(&Term) -> Term) -> Quad {
        Quad {
            graph: self.graph.as_ref().map(&mut f),
            subject: f(&self.subject),
            predicate: f(&self.predicate),
            object: f(&self.object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_normalization() {
        assert_eq!(Literal::typed("a", xsd::STRING), Literal::string("a"));
        assert_eq!(
            Literal::new("a", Some(rdf::LANG_STRING), Some("EN")),
            Literal::lang("a", "EN")
        );
        assert_eq!(Literal::lang("a", "EN-gb").language(), Some("EN-gb"));
        assert_eq!(Literal::string("a").effective_datatype(), Some(xsd::STRING));
        assert_eq!(Literal::lang("a", "en").effective_datatype(), None);
        assert_eq!(
            Literal::typed("1", xsd::DATE_TIME).effective_datatype(),
            Some(xsd::DATE_TIME)
        );
    }

    #[test]
    fn map_terms_visits_graph_first() {
        let quad = Triple::new(Term::blank("a"), Term::iri("http://p"), Term::blank("b"))
            .in_graph("http://g");
        let mut seen = Vec::new();
        quad.map_terms(|t| {
            seen.push(t.clone());
            t.clone()
        });
        assert_eq!(seen[0], Term::iri("http://g"));
        assert_eq!(seen[1], Term::blank("a"));
        assert_eq!(seen[3], Term::blank("b"));
    }
}
