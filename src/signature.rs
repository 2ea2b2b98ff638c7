//! Signing and verification of nanopublications.
//!
//! The signature covers the canonical bytes of the nanopublication with its
//! public key, algorithm and target already in place but without the
//! signature value itself. The trusty URI is minted afterwards, over the
//! quads including the signature.

use std::collections::BTreeSet;

use base64::engine::{general_purpose::STANDARD as BASE64, Engine};

use crate::{
    error::{NanopubError, Result},
    nanopub::NanopubStructure,
    rdf::{Quad, Term, Triple},
    signer::{verify_rsa, Signer, RSA_ALGORITHM},
    trusty::{
        canonicalize, hash, make_trusty, ArtifactCode, Minted, TrustyConfig, TrustyNamespace,
        CANONICAL_TOKEN,
    },
    vocab::{fragment, npx},
};

/// Statements about the signature subject that signing adds.
const SIGNATURE_PREDICATES: [&str; 4] = [
    npx::HAS_PUBLIC_KEY,
    npx::HAS_ALGORITHM,
    npx::HAS_SIGNATURE_TARGET,
    npx::HAS_SIGNATURE,
];

/// Outcome of a successful [`verify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    /// The trusty URI of the nanopublication
    pub uri: String,
    pub code: ArtifactCode,
    /// The signing key, base64 SubjectPublicKeyInfo DER
    pub public_key: String,
    /// Subject of the signature statements
    pub signature_subject: String,
}

/// Signs an unsigned nanopublication and mints its trusty URI.
///
/// # Arguments
/// * `quads` - A nanopublication whose head-subject is still a placeholder
/// * `signer` - The key to sign with
/// * `config` - Placeholder prefix handling
///
/// # Returns
/// The minted quads, with the signature statements in the publication-info
/// graph and every self-reference rewritten to the trusty URI.
///
/// # Errors
/// [`NanopubError::Malformed`] if the quads are not an unsigned
/// nanopublication or a graph lies outside its base,
/// [`NanopubError::ConflictingConfig`] if they already carry a signature or
/// any signature metadata.
pub fn sign(quads: &[Quad], signer: &dyn Signer, config: &TrustyConfig) -> Result<Minted> {
    let structure = NanopubStructure::from_quads(quads)?;
    if structure.is_trusty() {
        return Err(NanopubError::malformed(format!(
            "{} already has a trusty URI",
            structure.uri
        )));
    }
    if let Some(graph) = structure
        .graphs()
        .into_iter()
        .find(|g| !g.starts_with(structure.base.as_str()))
    {
        return Err(NanopubError::malformed(format!(
            "graph {graph} is outside the base {}",
            structure.base
        )));
    }
    if quads.iter().any(|q| q.predicate.is_iri(npx::HAS_SIGNATURE)) {
        return Err(NanopubError::conflict(
            "nanopublication already contains npx:hasSignature",
        ));
    }

    let namespace = TrustyNamespace::placeholder(&structure.base, config)?;
    let subject = Term::iri(format!("{}{}", structure.base, fragment::SIGNATURE));
    if let Some(existing) = quads.iter().find(|q| {
        q.subject == subject && SIGNATURE_PREDICATES.iter().any(|p| q.predicate.is_iri(p))
    }) {
        return Err(NanopubError::conflict(format!(
            "{subject} already has {}",
            existing.predicate
        )));
    }
    log::debug!("signing {} as {subject}", structure.uri);

    let mut quads = quads.to_vec();
    let metadata = [
        (npx::HAS_PUBLIC_KEY, Term::literal(signer.public_key_b64()?)),
        (npx::HAS_ALGORITHM, Term::literal(signer.algorithm())),
        (npx::HAS_SIGNATURE_TARGET, Term::iri(structure.uri.as_str())),
    ];
    for (predicate, object) in metadata {
        quads.push(
            Triple::new(subject.clone(), Term::iri(predicate), object).in_graph(&structure.pubinfo),
        );
    }

    let canonical = canonicalize(&quads, &namespace, CANONICAL_TOKEN);
    let signature = BASE64.encode(signer.sign(&canonical.bytes)?);
    quads.push(
        Triple::new(subject, Term::iri(npx::HAS_SIGNATURE), Term::literal(signature))
            .in_graph(&structure.pubinfo),
    );

    Ok(make_trusty(&quads, &namespace))
}

/// Verifies the signature and the trusty URI of a signed nanopublication.
///
/// Verification never mutates `quads`.
///
/// # Errors
/// * [`NanopubError::Malformed`] - not a minted nanopublication, or the
///   signature statements are missing or ambiguous
/// * [`NanopubError::UnsupportedAlgorithm`] - `npx:hasAlgorithm` is not `RSA`
/// * [`NanopubError::BadSignature`] - the signature does not match
/// * [`NanopubError::BadTrusty`] - the content does not hash to the URI
pub fn verify(quads: &[Quad]) -> Result<Verified> {
    let structure = NanopubStructure::from_quads(quads)?;
    let namespace = TrustyNamespace::minted(&structure.uri)?;
    let code = namespace
        .artifact_code()
        .cloned()
        .ok_or_else(|| NanopubError::malformed(format!("{} is not minted", structure.uri)))?;

    if let Some(graph) = structure
        .graphs()
        .into_iter()
        .find(|g| !g.starts_with(structure.uri.as_str()))
    {
        return Err(NanopubError::malformed(format!(
            "graph {graph} does not share the base of {}",
            structure.uri
        )));
    }

    let metadata = SignatureMetadata::find(quads, &structure)?;
    if metadata.algorithm != RSA_ALGORITHM {
        return Err(NanopubError::UnsupportedAlgorithm(metadata.algorithm));
    }

    let unsigned: Vec<Quad> = quads
        .iter()
        .filter(|q| !metadata.is_signature_quad(q, &structure))
        .cloned()
        .collect();
    let canonical = canonicalize(&unsigned, &namespace, CANONICAL_TOKEN);
    verify_rsa(&metadata.public_key, &canonical.bytes, &metadata.signature)?;

    let computed = hash(quads, &namespace);
    if computed != code {
        return Err(NanopubError::BadTrusty {
            expected: code.to_string(),
            computed: computed.to_string(),
        });
    }

    log::debug!("verified {}", structure.uri);
    Ok(Verified {
        uri: structure.uri,
        code,
        public_key: metadata.public_key,
        signature_subject: metadata.subject,
    })
}

struct SignatureMetadata {
    subject: String,
    public_key: String,
    algorithm: String,
    signature: String,
}

impl SignatureMetadata {
    fn find(quads: &[Quad], structure: &NanopubStructure) -> Result<Self> {
        let pubinfo: Vec<&Quad> = quads
            .iter()
            .filter(|q| q.in_graph(&structure.pubinfo))
            .collect();

        let subjects: BTreeSet<&str> = pubinfo
            .iter()
            .filter(|q| q.predicate.is_iri(npx::HAS_SIGNATURE))
            .filter_map(|q| q.subject.as_iri())
            .collect();
        let subject = match subjects.into_iter().collect::<Vec<_>>().as_slice() {
            [subject] => *subject,
            [] => return Err(NanopubError::malformed("no npx:hasSignature in pubinfo")),
            _ => {
                return Err(NanopubError::malformed(
                    "more than one signature subject in pubinfo",
                ))
            }
        };

        single_value(&pubinfo, subject, npx::HAS_SIGNATURE_TARGET)?;
        Ok(SignatureMetadata {
            subject: subject.to_owned(),
            public_key: single_literal(&pubinfo, subject, npx::HAS_PUBLIC_KEY)?,
            algorithm: single_literal(&pubinfo, subject, npx::HAS_ALGORITHM)?,
            signature: single_literal(&pubinfo, subject, npx::HAS_SIGNATURE)?,
        })
    }

    fn is_signature_quad(&self, quad: &Quad, structure: &NanopubStructure) -> bool {
        quad.in_graph(&structure.pubinfo)
            && quad.subject.is_iri(&self.subject)
            && quad.predicate.is_iri(npx::HAS_SIGNATURE)
    }
}

fn single_value<'q>(pubinfo: &[&'q Quad], subject: &str, predicate: &str) -> Result<&'q Term> {
    let mut values = pubinfo
        .iter()
        .copied()
        .filter(|q| q.subject.is_iri(subject) && q.predicate.is_iri(predicate))
        .map(|q| &q.object);
    match (values.next(), values.next()) {
        (Some(value), None) => Ok(value),
        (None, _) => Err(NanopubError::malformed(format!(
            "signature {subject} has no <{predicate}>"
        ))),
        (Some(_), Some(_)) => Err(NanopubError::malformed(format!(
            "signature {subject} has more than one <{predicate}>"
        ))),
    }
}

fn single_literal(pubinfo: &[&Quad], subject: &str, predicate: &str) -> Result<String> {
    single_value(pubinfo, subject, predicate)?
        .as_literal()
        .map(|literal| literal.lexical().to_owned())
        .ok_or_else(|| {
            NanopubError::malformed(format!("<{predicate}> of {subject} is not a literal"))
        })
}
