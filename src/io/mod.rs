//! Concrete RDF syntaxes.
//!
//! Parsers and writers translate syntax only: graph names are kept as they
//! are and no quad is added, dropped or merged.

/// TriG and N-Quads parsing
pub mod sophia_parser;
/// TriX parsing and writing
pub mod trix;
/// TriG and N-Quads writing
pub mod writer;

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{NanopubError, Result},
    nanopub::NanopubStructure,
    rdf::Quad,
};

/// Supported concrete syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfFormat {
    #[default]
    TriG,
    NQuads,
    TriX,
}

impl RdfFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "trig" => Some(RdfFormat::TriG),
            "nq" | "nquads" => Some(RdfFormat::NQuads),
            "trix" | "xml" => Some(RdfFormat::TriX),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RdfFormat::TriG => "trig",
            RdfFormat::NQuads => "nq",
            RdfFormat::TriX => "trix",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::TriG => "application/trig",
            RdfFormat::NQuads => "application/n-quads",
            RdfFormat::TriX => "application/trix",
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RdfFormat::TriG => "trig",
            RdfFormat::NQuads => "nquads",
            RdfFormat::TriX => "trix",
        })
    }
}

impl FromStr for RdfFormat {
    type Err = NanopubError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trig" => Ok(RdfFormat::TriG),
            "nq" | "nquads" | "n-quads" => Ok(RdfFormat::NQuads),
            "trix" => Ok(RdfFormat::TriX),
            _ => Err(NanopubError::malformed(format!("unknown RDF format '{s}'"))),
        }
    }
}

/// Parses `text` into quads.
pub fn parse(text: &str, format: RdfFormat) -> Result<Vec<Quad>> {
    let quads = match format {
        RdfFormat::TriG => sophia_parser::parse_trig(text)?,
        RdfFormat::NQuads => sophia_parser::parse_nquads(text)?,
        RdfFormat::TriX => trix::parse_trix(text)?,
    };
    log::trace!("parsed {} quads from {format}", quads.len());
    Ok(quads)
}

/// Serializes `quads`.
///
/// With a `structure`, graphs are written in head, assertion, provenance,
/// pubinfo order; otherwise in order of first appearance.
pub fn serialize(quads: &[Quad], structure: Option<&NanopubStructure>, format: RdfFormat) -> String {
    match format {
        RdfFormat::TriG => writer::write_trig(quads, structure),
        RdfFormat::NQuads => writer::write_nquads(quads, structure),
        RdfFormat::TriX => trix::write_trix(quads, structure),
    }
}
