/// RSA signer backed by local key files
pub mod rsa_signer;

pub use rsa_signer::*;

use crate::error::Result;

/// Trait for the signing half of a nanopublication key pair.
///
/// Implementations sign the canonical byte stream of a nanopublication and
/// expose the public key that verifiers will read back out of the
/// publication-info graph.
pub trait Signer {
    /// Value written to `npx:hasAlgorithm`.
    fn algorithm(&self) -> &str;

    /// Public key as base64-encoded SubjectPublicKeyInfo DER, no line breaks.
    fn public_key_b64(&self) -> Result<String>;

    /// Signs the provided data.
    ///
    /// # Arguments
    ///
    /// * `data` - Canonical bytes; implementations hash them themselves.
    ///
    /// # Returns
    ///
    /// The raw signature bytes.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>>;
}
