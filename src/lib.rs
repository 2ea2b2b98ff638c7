//! Library for signing and verifying nanopublications.
//!
//! This crate assembles nanopublications from RDF graphs, signs them with
//! RSA and mints content-addressed trusty URIs for them, and verifies both
//! the signature and the trusty URI of published nanopublications.

/// Publish and fetch against nanopublication servers
#[cfg(feature = "http")]
pub mod client;

/// Error type shared by all operations
pub mod error;

/// Concrete RDF syntaxes (TriG, N-Quads, TriX)
pub mod io;

/// Nanopublication assembly and structure
pub mod nanopub;

/// Publishing identity stored as YAML
pub mod profile;

/// RDF terms and quads
pub mod rdf;

/// Signing and verification pipeline
pub mod signature;

/// Signing keys
pub mod signer;

/// Trusty-URI canonicalization, hashing and minting
pub mod trusty;

/// Reserved namespaces and IRIs
pub mod vocab;

#[cfg(feature = "http")]
pub use client::NanopubClient;
pub use error::{ErrorKind, NanopubError, Result};
pub use io::RdfFormat;
pub use nanopub::{Nanopub, NanopubConfig, NanopubStructure};
pub use profile::Profile;
pub use signature::{sign, verify, Verified};
pub use signer::{RsaSigner, Signer};
pub use trusty::{ArtifactCode, TrustyConfig};
