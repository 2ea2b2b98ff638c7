use std::fmt::Write as _;

use quick_xml::{
    escape::escape,
    events::{BytesStart, Event},
    Reader,
};

use crate::{
    error::{NanopubError, Result},
    io::writer::group_by_graph,
    nanopub::NanopubStructure,
    rdf::{Literal, Quad, Term},
};

/// TriX namespace
pub const TRIX_NS: &str = "http://www.w3.org/2004/03/trix/trix-1/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermElement {
    Uri,
    Id,
    PlainLiteral,
    TypedLiteral,
}

impl TermElement {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"uri" => Some(TermElement::Uri),
            b"id" => Some(TermElement::Id),
            b"plainLiteral" => Some(TermElement::PlainLiteral),
            b"typedLiteral" => Some(TermElement::TypedLiteral),
            _ => None,
        }
    }
}

/// A term element being read.
struct OpenTerm {
    element: TermElement,
    language: Option<String>,
    datatype: Option<String>,
    text: String,
}

impl OpenTerm {
    fn start(element: TermElement, start: &BytesStart<'_>) -> Result<Self> {
        Ok(OpenTerm {
            element,
            language: attribute(start, "xml:lang")?,
            datatype: attribute(start, "datatype")?,
            text: String::new(),
        })
    }

    fn finish(self) -> Result<Term> {
        match self.element {
            TermElement::Uri => Ok(Term::iri(self.text.trim())),
            TermElement::Id => Ok(Term::blank(self.text.trim())),
            TermElement::PlainLiteral => Ok(Term::Literal(Literal::new(
                self.text,
                None,
                self.language.as_deref(),
            ))),
            TermElement::TypedLiteral => {
                let datatype = self.datatype.ok_or_else(|| {
                    NanopubError::malformed("typedLiteral without a datatype attribute")
                })?;
                Ok(Term::Literal(Literal::typed(self.text, datatype)))
            }
        }
    }
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let attribute = start.try_get_attribute(name).map_err(xml_error)?;
    attribute
        .map(|a| a.unescape_value().map(|v| v.into_owned()).map_err(xml_error))
        .transpose()
}

fn xml_error(err: impl std::fmt::Display) -> NanopubError {
    NanopubError::malformed(format!("invalid TriX: {err}"))
}

/// Parses a TriX document.
///
/// A `<graph>` is named by a leading `<uri>` or `<id>`; without one its
/// triples belong to the default graph.
pub fn parse_trix(xml: &str) -> Result<Vec<Quad>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut quads = Vec::new();
    let mut graph: Option<Term> = None;
    let mut in_graph = false;
    let mut seen_triple = false;
    let mut triple: Option<Vec<Term>> = None;
    let mut open: Option<OpenTerm> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => {
                let name = start.local_name();
                match name.as_ref() {
                    b"graph" => {
                        in_graph = true;
                        seen_triple = false;
                        graph = None;
                    }
                    b"triple" => {
                        seen_triple = true;
                        triple = Some(Vec::with_capacity(3));
                    }
                    other => {
                        if let Some(element) = TermElement::from_name(other) {
                            open = Some(OpenTerm::start(element, &start)?);
                        }
                    }
                }
            }
            Event::Empty(start) => {
                let name = start.local_name();
                if let Some(element) = TermElement::from_name(name.as_ref()) {
                    let term = OpenTerm::start(element, &start)?.finish()?;
                    place_term(term, &mut triple, &mut graph, in_graph, seen_triple)?;
                }
            }
            Event::Text(text) => {
                if let Some(open) = open.as_mut() {
                    open.text.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(open) = open.as_mut() {
                    let bytes = data.into_inner();
                    open.text
                        .push_str(std::str::from_utf8(&bytes).map_err(xml_error)?);
                }
            }
            Event::End(end) => match end.local_name().as_ref() {
                b"graph" => in_graph = false,
                b"triple" => {
                    let terms = triple.take().unwrap_or_default();
                    let [subject, predicate, object]: [Term; 3] =
                        terms.try_into().map_err(|terms: Vec<Term>| {
                            NanopubError::malformed(format!(
                                "TriX triple has {} terms instead of 3",
                                terms.len()
                            ))
                        })?;
                    quads.push(Quad::new(graph.clone(), subject, predicate, object));
                }
                name if TermElement::from_name(name).is_some() => {
                    if let Some(term) = open.take() {
                        let term = term.finish()?;
                        place_term(term, &mut triple, &mut graph, in_graph, seen_triple)?;
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(quads)
}

fn place_term(
    term: Term,
    triple: &mut Option<Vec<Term>>,
    graph: &mut Option<Term>,
    in_graph: bool,
    seen_triple: bool,
) -> Result<()> {
    match triple {
        Some(terms) => terms.push(term),
        None if in_graph && !seen_triple && graph.is_none() => *graph = Some(term),
        None => {
            return Err(NanopubError::malformed(
                "TriX term outside of a triple or graph name",
            ))
        }
    }
    Ok(())
}

/// Writes a TriX document, one `<graph>` per graph name.
pub fn write_trix(quads: &[Quad], structure: Option<&NanopubStructure>) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<TriX xmlns=\"{TRIX_NS}\">");
    for (graph, members) in group_by_graph(quads, structure) {
        out.push_str("  <graph>\n");
        if let Some(graph) = graph {
            let _ = writeln!(out, "    {}", trix_term(graph));
        }
        for quad in members {
            out.push_str("    <triple>\n");
            for term in [&quad.subject, &quad.predicate, &quad.object] {
                let _ = writeln!(out, "      {}", trix_term(term));
            }
            out.push_str("    </triple>\n");
        }
        out.push_str("  </graph>\n");
    }
    out.push_str("</TriX>\n");
    out
}

fn trix_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<uri>{}</uri>", escape(iri.as_str())),
        Term::Blank(label) => format!("<id>{}</id>", escape(label.as_str())),
        Term::Literal(literal) => {
            let lexical = escape(literal.lexical());
            match (literal.language(), literal.datatype()) {
                (Some(language), _) => format!(
                    "<plainLiteral xml:lang=\"{}\">{lexical}</plainLiteral>",
                    escape(language)
                ),
                (None, Some(datatype)) => format!(
                    "<typedLiteral datatype=\"{}\">{lexical}</typedLiteral>",
                    escape(datatype)
                ),
                (None, None) => format!("<plainLiteral>{lexical}</plainLiteral>"),
            }
        }
    }
}
