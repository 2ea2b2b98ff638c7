use sophia_api::{
    quad::Quad as SophiaQuad,
    source::{QuadSource, StreamError},
    term::{Term as SophiaTerm, TermKind},
};
use sophia_turtle::parser::{nq, trig};

use crate::{
    error::{NanopubError, Result},
    rdf::{Literal, Quad, Term},
};

/// Parses a TriG document.
pub fn parse_trig(text: &str) -> Result<Vec<Quad>> {
    collect(trig::parse_str(text), "TriG")
}

/// Parses an N-Quads document.
pub fn parse_nquads(text: &str) -> Result<Vec<Quad>> {
    collect(nq::parse_str(text), "N-Quads")
}

fn collect<S: QuadSource>(mut source: S, syntax: &str) -> Result<Vec<Quad>> {
    let mut quads = Vec::new();
    source
        .try_for_each_quad(|quad| -> Result<()> {
            quads.push(convert_quad(&quad)?);
            Ok(())
        })
        .map_err(|e| match e {
            StreamError::SourceError(e) => NanopubError::malformed(format!("invalid {syntax}: {e}")),
            StreamError::SinkError(e) => e,
        })?;
    Ok(quads)
}

fn convert_quad<Q: SophiaQuad>(quad: &Q) -> Result<Quad> {
    let graph = quad.g().map(convert_term).transpose()?;
    Ok(Quad::new(
        graph,
        convert_term(quad.s())?,
        convert_term(quad.p())?,
        convert_term(quad.o())?,
    ))
}

fn convert_term<T: SophiaTerm>(term: T) -> Result<Term> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| Term::iri(iri.as_str()))
            .ok_or_else(|| NanopubError::malformed("IRI term without an IRI")),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Term::blank(id.as_str()))
            .ok_or_else(|| NanopubError::malformed("blank node without a label")),
        TermKind::Literal => {
            let lexical = term
                .lexical_form()
                .ok_or_else(|| NanopubError::malformed("literal without a lexical form"))?;
            let datatype = term.datatype();
            let language = term.language_tag();
            Ok(Term::Literal(Literal::new(
                &*lexical,
                datatype.as_ref().map(|dt| dt.as_str()),
                language.as_ref().map(|tag| tag.as_str()),
            )))
        }
        kind => Err(NanopubError::malformed(format!(
            "unsupported term kind {kind:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        vocab::{np, rdf, xsd},
    };

    #[test]
    fn parses_trig_graphs_and_literals() {
        let quads = parse_trig(include_str!("../../fixtures/unsigned.trig")).unwrap();
        assert_eq!(quads.len(), 7);

        let head = &quads[0];
        assert_eq!(
            head.graph_iri(),
            Some("http://purl.org/nanopub/temp/mynanopub#Head")
        );
        assert!(head.predicate.is_iri(rdf::TYPE));
        assert!(head.object.is_iri(np::NANOPUBLICATION));

        let time = quads
            .iter()
            .find_map(|q| q.object.as_literal().filter(|l| l.datatype().is_some()))
            .unwrap();
        assert_eq!(time.lexical(), "2024-01-01T00:00:00Z");
        assert_eq!(time.datatype(), Some(xsd::DATE_TIME));
    }

    #[test]
    fn language_tags_are_kept() {
        let quads = parse_trig(include_str!("../../fixtures/slash-base.trig")).unwrap();
        let tagged = quads
            .iter()
            .find_map(|q| q.object.as_literal().filter(|l| l.language().is_some()))
            .unwrap();
        assert_eq!(tagged.language(), Some("en"));
        assert_eq!(tagged.datatype(), None);
    }

    #[test]
    fn parses_nquads_with_default_graph() {
        let nq = concat!(
            "<http://ex/s> <http://ex/p> \"o\" .\n",
            "_:b <http://ex/p> \"x\\ny\"@EN <http://ex/g> .\n",
        );
        let quads = parse_nquads(nq).unwrap();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].graph, None);
        assert_eq!(quads[1].subject, Term::blank("b"));
        let literal = quads[1].object.as_literal().unwrap();
        assert_eq!(literal.lexical(), "x\ny");
        assert!(literal.language().unwrap().eq_ignore_ascii_case("en"));
    }

    #[test]
    fn syntax_errors_are_malformed() {
        let err = parse_trig("<http://ex/g> { <http://ex/s> ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
