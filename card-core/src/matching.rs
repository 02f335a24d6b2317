//! Credential match engine
//!
//! Verifies a presented card against stored credentials without ever
//! reconstructing a secret: the presented number and CVV are resealed
//! with each candidate's stored salt and the digests compared in
//! constant time.

use crate::crypto::{digests_match, seal};
use crate::types::StoredCredential;
use tracing::debug;

/// True when the presented fields all match `credential`.
///
/// The number digest is checked first, then the expiry text, then the
/// CVV digest. A miss on an earlier field skips the later work.
pub fn credential_matches(
    credential: &StoredCredential,
    number: &str,
    cvv: &str,
    expiry: &str,
) -> bool {
    let number_digest = seal(number, &credential.salt);
    if !digests_match(&number_digest, &credential.number_digest) {
        return false;
    }
    if credential.expiry.to_mmyy() != expiry {
        return false;
    }
    let cvv_digest = seal(cvv, &credential.salt);
    digests_match(&cvv_digest, &credential.cvv_digest)
}

/// True when any candidate fully matches the presented card.
///
/// Candidates are swept in order and the first full match
/// short-circuits the rest.
pub fn has_matching_credential(
    candidates: &[StoredCredential],
    number: &str,
    cvv: &str,
    expiry: &str,
) -> bool {
    debug!(
        candidates = candidates.len(),
        "matching presented card against stored credentials"
    );
    candidates
        .iter()
        .any(|credential| credential_matches(credential, number, cvv, expiry))
}
