/// Nanopublication schema (`np:`)
pub mod np {
    /// Namespace IRI
    pub const NS: &str = "http://www.nanopub.org/nschema#";
    /// Class of the head-subject
    pub const NANOPUBLICATION: &str = "http://www.nanopub.org/nschema#Nanopublication";
    /// Head link to the assertion graph
    pub const HAS_ASSERTION: &str = "http://www.nanopub.org/nschema#hasAssertion";
    /// Head link to the provenance graph
    pub const HAS_PROVENANCE: &str = "http://www.nanopub.org/nschema#hasProvenance";
    /// Head link to the publication-info graph
    pub const HAS_PUBLICATION_INFO: &str = "http://www.nanopub.org/nschema#hasPublicationInfo";
}

/// Nanopublication extensions (`npx:`)
pub mod npx {
    /// Namespace IRI
    pub const NS: &str = "http://purl.org/nanopub/x/";
    pub const HAS_SIGNATURE_TARGET: &str = "http://purl.org/nanopub/x/hasSignatureTarget";
    pub const HAS_PUBLIC_KEY: &str = "http://purl.org/nanopub/x/hasPublicKey";
    pub const HAS_ALGORITHM: &str = "http://purl.org/nanopub/x/hasAlgorithm";
    pub const HAS_SIGNATURE: &str = "http://purl.org/nanopub/x/hasSignature";
    pub const INTRODUCES: &str = "http://purl.org/nanopub/x/introduces";
}

/// W3C PROV-O (`prov:`)
pub mod prov {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/ns/prov#";
    pub const WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";
    pub const WAS_DERIVED_FROM: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";
    pub const GENERATED_AT_TIME: &str = "http://www.w3.org/ns/prov#generatedAtTime";
}

/// RDF core vocabulary (`rdf:`)
pub mod rdf {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// XML Schema datatypes (`xsd:`)
pub mod xsd {
    /// Namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// Placeholder head IRI used while a nanopublication is under construction.
pub const PLACEHOLDER_URI: &str = "http://purl.org/nanopub/temp/mynanopub";

/// Placeholder bases under this prefix are minted into [`PUBLISHED_PREFIX`].
pub const TEMP_PREFIX: &str = "http://purl.org/nanopub/temp/";

/// Canonical prefix of published trusty nanopublication URIs.
pub const PUBLISHED_PREFIX: &str = "http://purl.org/np/";

/// Fragment suffixes of the four graphs and the signature subject.
pub mod fragment {
    pub const HEAD: &str = "Head";
    pub const ASSERTION: &str = "assertion";
    pub const PROVENANCE: &str = "provenance";
    pub const PUBINFO: &str = "pubInfo";
    pub const SIGNATURE: &str = "sig";
}

/// Prefixes emitted by the TriG writer.
pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", rdf::NS),
    ("xsd", xsd::NS),
    ("prov", prov::NS),
    ("np", np::NS),
    ("npx", npx::NS),
];
