use std::fmt::Write as _;

use crate::{
    nanopub::NanopubStructure,
    rdf::{Quad, Term},
    vocab::{rdf, WELL_KNOWN_PREFIXES},
};

/// Quads grouped by graph name, in writing order.
pub(crate) type GraphGroups<'a> = Vec<(Option<&'a Term>, Vec<&'a Quad>)>;

/// Groups `quads` by graph, nanopublication graphs first when `structure`
/// is known, everything else in order of first appearance.
pub(crate) fn group_by_graph<'a>(
    quads: &'a [Quad],
    structure: Option<&NanopubStructure>,
) -> GraphGroups<'a> {
    let mut groups: GraphGroups<'a> = Vec::new();
    for quad in quads {
        match groups.iter_mut().find(|(graph, _)| *graph == quad.graph.as_ref()) {
            Some((_, members)) => members.push(quad),
            None => groups.push((quad.graph.as_ref(), vec![quad])),
        }
    }

    if let Some(structure) = structure {
        let graphs = structure.graphs();
        groups.sort_by_key(|(graph, _)| {
            graph
                .and_then(|g| g.as_iri())
                .and_then(|g| graphs.iter().position(|name| *name == g))
                .unwrap_or(graphs.len())
        });
    }
    groups
}

/// Writes TriG with the well-known prefixes, plus `this:` and `sub:` for the
/// nanopublication's own namespace.
pub fn write_trig(quads: &[Quad], structure: Option<&NanopubStructure>) -> String {
    let mut prefixes: Vec<(&str, &str)> = Vec::new();
    if let Some(structure) = structure {
        prefixes.push(("this", structure.uri.as_str()));
        prefixes.push(("sub", structure.base.as_str()));
    }
    prefixes.extend_from_slice(WELL_KNOWN_PREFIXES);

    let mut out = String::new();
    for (prefix, namespace) in &prefixes {
        let _ = writeln!(out, "@prefix {prefix}: <{namespace}> .");
    }

    for (graph, members) in group_by_graph(quads, structure) {
        out.push('\n');
        let indent = match graph {
            Some(graph) => {
                let _ = writeln!(out, "{} {{", trig_term(graph, &prefixes));
                "  "
            }
            None => "",
        };

        let mut previous: Option<&Term> = None;
        for quad in members {
            let predicate = if quad.predicate.is_iri(rdf::TYPE) {
                "a".to_owned()
            } else {
                trig_term(&quad.predicate, &prefixes)
            };
            let object = trig_term(&quad.object, &prefixes);

            if previous == Some(&quad.subject) {
                let _ = write!(out, " ;\n{indent}    {predicate} {object}");
            } else {
                if previous.is_some() {
                    out.push_str(" .\n");
                }
                let subject = trig_term(&quad.subject, &prefixes);
                let _ = write!(out, "{indent}{subject} {predicate} {object}");
            }
            previous = Some(&quad.subject);
        }
        if previous.is_some() {
            out.push_str(" .\n");
        }
        if graph.is_some() {
            out.push_str("}\n");
        }
    }
    out
}

/// Writes N-Quads, one statement per line.
pub fn write_nquads(quads: &[Quad], structure: Option<&NanopubStructure>) -> String {
    let mut out = String::new();
    for (graph, members) in group_by_graph(quads, structure) {
        for quad in members {
            let _ = write!(
                out,
                "{} {} {}",
                nquads_term(&quad.subject),
                nquads_term(&quad.predicate),
                nquads_term(&quad.object)
            );
            if let Some(graph) = graph {
                let _ = write!(out, " {}", nquads_term(graph));
            }
            out.push_str(" .\n");
        }
    }
    out
}

fn nquads_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{iri}>"),
        Term::Blank(label) => format!("_:{label}"),
        Term::Literal(literal) => {
            let mut out = format!("\"{}\"", escape_string(literal.lexical()));
            match (literal.language(), literal.datatype()) {
                (Some(language), _) => {
                    let _ = write!(out, "@{language}");
                }
                (None, Some(datatype)) => {
                    let _ = write!(out, "^^<{datatype}>");
                }
                (None, None) => {}
            }
            out
        }
    }
}

fn trig_term(term: &Term, prefixes: &[(&str, &str)]) -> String {
    match term {
        Term::Iri(iri) => compact_iri(iri, prefixes),
        Term::Blank(label) => format!("_:{label}"),
        Term::Literal(literal) => {
            let mut out = format!("\"{}\"", escape_string(literal.lexical()));
            match (literal.language(), literal.datatype()) {
                (Some(language), _) => {
                    let _ = write!(out, "@{language}");
                }
                (None, Some(datatype)) => {
                    let _ = write!(out, "^^{}", compact_iri(datatype, prefixes));
                }
                (None, None) => {}
            }
            out
        }
    }
}

/// Shortens `iri` with the longest matching namespace whose remainder is a
/// safe local name.
fn compact_iri(iri: &str, prefixes: &[(&str, &str)]) -> String {
    prefixes
        .iter()
        .filter_map(|(prefix, namespace)| {
            let local = iri.strip_prefix(namespace)?;
            is_safe_local_name(local).then_some((namespace.len(), prefix, local))
        })
        .max_by_key(|(len, _, _)| *len)
        .map(|(_, prefix, local)| format!("{prefix}:{local}"))
        .unwrap_or_else(|| format!("<{iri}>"))
}

fn is_safe_local_name(local: &str) -> bool {
    !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Escapes a lexical form for a double-quoted TriG or N-Quads string.
pub fn escape_string(lexical: &str) -> String {
    let mut out = String::with_capacity(lexical.len());
    for c in lexical.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
