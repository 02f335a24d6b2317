//! Update reconciliation
//!
//! Decides whether an update actually changed a card's secret material.
//! The candidate number and CVV are sealed with the existing salt and
//! compared against the stored digests: when both still match, the
//! stored triple is carried forward untouched; when either differs, a
//! fresh salt reseals both. One salt covers both digests, so rotation
//! is all or nothing and a credential never mixes salt generations.

use crate::crypto::{digests_match, seal, seal_pair, SealedSecrets};
use crate::types::StoredCredential;
use tracing::debug;

/// Reconcile candidate secrets against an existing credential.
///
/// Returns the triple to store: either the existing one, byte for
/// byte, or a freshly salted reseal of the candidate secrets.
pub fn reconcile(existing: &StoredCredential, number: &str, cvv: &str) -> SealedSecrets {
    let number_digest = seal(number, &existing.salt);
    let cvv_digest = seal(cvv, &existing.salt);

    let unchanged = digests_match(&number_digest, &existing.number_digest)
        && digests_match(&cvv_digest, &existing.cvv_digest);

    if unchanged {
        debug!("secret material unchanged, keeping existing salt");
        SealedSecrets {
            salt: existing.salt.clone(),
            number_digest: existing.number_digest,
            cvv_digest: existing.cvv_digest,
        }
    } else {
        debug!("secret material changed, rotating salt");
        seal_pair(number, cvv)
    }
}
