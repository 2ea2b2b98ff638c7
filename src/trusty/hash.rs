use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use crate::{
    rdf::Quad,
    trusty::{canonicalize, ArtifactCode, TrustyNamespace, CANONICAL_TOKEN},
};

/// Artifact code of a canonical byte stream: `RA` followed by the unpadded
/// URL-safe base64 SHA-256 digest.
pub fn artifact_code(bytes: &[u8]) -> ArtifactCode {
    let digest = Sha256::digest(bytes);
    ArtifactCode::from_digest_b64(&URL_SAFE_NO_PAD.encode(digest))
}

/// Hashes a quad-set relative to `namespace`.
pub fn hash(quads: &[Quad], namespace: &TrustyNamespace) -> ArtifactCode {
    let canonical = canonicalize(quads, namespace, CANONICAL_TOKEN);
    artifact_code(&canonical.bytes)
}
