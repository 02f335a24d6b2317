//! Card Vault credential core
//!
//! Turns raw card data into an at-rest representation that never
//! contains a secret: per-network format validation, then a pair of
//! salted SHA-256 digests (number and CVV) sealed under one random
//! salt, alongside the display metadata callers are allowed to see.
//! Presented cards are verified against stored credentials by
//! resealing with the stored salt, and updates reconcile against the
//! existing credential so the salt rotates exactly when secret
//! material changed.
//!
//! The core is synchronous and stateless; persistence and transport
//! live with the callers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod crypto;
pub mod error;
pub mod matching;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use crypto::{
    digests_match, generate_salt, seal, seal_pair, sha256_digest, SealedSecrets, DIGEST_LENGTH,
    SALT_LENGTH,
};
pub use error::{CardError, Result};
pub use matching::{credential_matches, has_matching_credential};
pub use reconcile::reconcile;
pub use types::{Expiry, Network, RawCardInput, StoredCredential};
pub use validation::{is_valid_cvv, is_valid_number, validate_card_format};
