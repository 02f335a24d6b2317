//! Core types for card credentials
//!
//! [`RawCardInput`] is the transient shape of a submitted card and is
//! never persisted. [`StoredCredential`] is the at-rest shape: display
//! metadata plus salted digests. The raw number and CVV cannot be
//! recovered from a stored credential.

use crate::crypto::{self, DIGEST_LENGTH};
use crate::error::{CardError, Result};
use crate::{matching, reconcile, validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card network governing the number and CVV format rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Absent or unrecognized network. Rejected on every operation and
    /// never present in a stored credential.
    Unknown,
    /// American Express
    Amex,
    /// Visa
    Visa,
    /// MasterCard
    MasterCard,
}

impl Network {
    /// Map a numeric network id (1 = Amex, 2 = Visa, 3 = MasterCard)
    /// to a network. Any other value maps to [`Network::Unknown`].
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => Network::Amex,
            2 => Network::Visa,
            3 => Network::MasterCard,
            _ => Network::Unknown,
        }
    }

    /// Numeric id of this network
    pub fn id(&self) -> i32 {
        match self {
            Network::Unknown => 0,
            Network::Amex => 1,
            Network::Visa => 2,
            Network::MasterCard => 3,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Unknown => "Unknown",
            Network::Amex => "Amex",
            Network::Visa => "Visa",
            Network::MasterCard => "MasterCard",
        };
        write!(f, "{}", name)
    }
}

/// Card expiry held as a real month and year pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiry {
    /// Month, 1 through 12
    pub month: u8,
    /// Four-digit year
    pub year: u16,
}

impl Expiry {
    /// Parse a strict `MMYY` digit string. The month must be 01-12 and
    /// two-digit years map to 2000-2099. No whitespace, separators or
    /// other formats are accepted.
    pub fn parse(text: &str, network: Network) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_digit()) {
            return Err(CardError::InvalidExpiryFormat { network });
        }
        let month = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        let year = (bytes[2] - b'0') as u16 * 10 + (bytes[3] - b'0') as u16;
        if !(1..=12).contains(&month) {
            return Err(CardError::InvalidExpiryFormat { network });
        }
        Ok(Expiry {
            month,
            year: 2000 + year,
        })
    }

    /// Render back to the `MMYY` text form cards are presented in
    pub fn to_mmyy(&self) -> String {
        format!("{:02}{:02}", self.month, self.year % 100)
    }
}

/// Raw card data exactly as submitted by a caller.
///
/// Values are checked, sealed and dropped. This type must never be
/// persisted, and its `Debug` form redacts everything but the claimed
/// network so accidental logging cannot leak secret material.
#[derive(Clone)]
pub struct RawCardInput {
    /// Card number as entered
    pub number: String,
    /// Card verification value
    pub cvv: String,
    /// Expiry as a four-character MMYY string
    pub expiry: String,
    /// Claimed network
    pub network: Network,
}

impl RawCardInput {
    /// Build a raw input from its parts
    pub fn new(
        number: impl Into<String>,
        cvv: impl Into<String>,
        expiry: impl Into<String>,
        network: Network,
    ) -> Self {
        RawCardInput {
            number: number.into(),
            cvv: cvv.into(),
            expiry: expiry.into(),
            network,
        }
    }
}

impl fmt::Debug for RawCardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCardInput")
            .field("number", &"<redacted>")
            .field("cvv", &"<redacted>")
            .field("expiry", &"<redacted>")
            .field("network", &self.network)
            .finish()
    }
}

/// A card credential at rest.
///
/// Carries the display metadata (network, last four digits, expiry)
/// alongside the salted SHA-256 digests of the number and CVV. Both
/// digests are always sealed under the single salt held here, so the
/// three fields form a unit and are only ever replaced together.
#[derive(Clone)]
pub struct StoredCredential {
    /// Confirmed network, never [`Network::Unknown`]
    pub network: Network,
    /// Last four digits of the card number, kept for display
    pub last_four_digits: String,
    /// Card expiry
    pub expiry: Expiry,
    /// Salted digest of the card number
    pub number_digest: [u8; DIGEST_LENGTH],
    /// Salted digest of the CVV
    pub cvv_digest: [u8; DIGEST_LENGTH],
    /// Salt both digests were sealed under
    pub salt: Vec<u8>,
}

impl StoredCredential {
    /// Validate a raw card and seal it into its at-rest form.
    ///
    /// Validation runs first, so a format rejection returns before any
    /// hashing happens.
    pub fn create(input: &RawCardInput) -> Result<Self> {
        let network = validation::validate_card_format(input)?;
        let expiry = Expiry::parse(&input.expiry, network)?;
        let sealed = crypto::seal_pair(&input.number, &input.cvv);
        Ok(StoredCredential {
            network,
            last_four_digits: last_four(&input.number),
            expiry,
            number_digest: sealed.number_digest,
            cvv_digest: sealed.cvv_digest,
            salt: sealed.salt,
        })
    }

    /// Validate a candidate input and reconcile it against this
    /// credential.
    ///
    /// The candidate goes through the same validation as a new card.
    /// Display metadata is recomputed from the candidate; the salt and
    /// digests are carried forward unchanged when the secret material
    /// did not change, and resealed under a fresh salt when it did.
    pub fn apply_update(&self, input: &RawCardInput) -> Result<Self> {
        let network = validation::validate_card_format(input)?;
        let expiry = Expiry::parse(&input.expiry, network)?;
        let sealed = reconcile::reconcile(self, &input.number, &input.cvv);
        Ok(StoredCredential {
            network,
            last_four_digits: last_four(&input.number),
            expiry,
            number_digest: sealed.number_digest,
            cvv_digest: sealed.cvv_digest,
            salt: sealed.salt,
        })
    }

    /// True when the presented number, CVV and expiry all match this
    /// credential. See [`matching::credential_matches`] for the exact
    /// comparison order.
    pub fn matches(&self, number: &str, cvv: &str, expiry: &str) -> bool {
        matching::credential_matches(self, number, cvv, expiry)
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("network", &self.network)
            .field("last_four_digits", &self.last_four_digits)
            .field("expiry", &self.expiry)
            .field("number_digest", &"<redacted>")
            .field("cvv_digest", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// Last four characters of a validated card number.
///
/// Callers must validate first; every accepted number is at least 15
/// digits long.
fn last_four(number: &str) -> String {
    number[number.len() - 4..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_id() {
        assert_eq!(Network::from_id(1), Network::Amex);
        assert_eq!(Network::from_id(2), Network::Visa);
        assert_eq!(Network::from_id(3), Network::MasterCard);
        assert_eq!(Network::from_id(0), Network::Unknown);
        assert_eq!(Network::from_id(100), Network::Unknown);
        assert_eq!(Network::from_id(-1), Network::Unknown);
    }

    #[test]
    fn test_network_id_round_trip() {
        for network in [Network::Amex, Network::Visa, Network::MasterCard] {
            assert_eq!(Network::from_id(network.id()), network);
        }
    }

    #[test]
    fn test_network_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Network::Visa).unwrap(), "\"Visa\"");
        let parsed: Network = serde_json::from_str("\"MasterCard\"").unwrap();
        assert_eq!(parsed, Network::MasterCard);
    }

    #[test]
    fn test_expiry_serde_round_trip() {
        let expiry = Expiry {
            month: 7,
            year: 2031,
        };
        let json = serde_json::to_string(&expiry).unwrap();
        let parsed: Expiry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, expiry);
    }

    #[test]
    fn test_expiry_parse_valid() {
        let expiry = Expiry::parse("1230", Network::Visa).unwrap();
        assert_eq!(expiry.month, 12);
        assert_eq!(expiry.year, 2030);
        assert_eq!(expiry.to_mmyy(), "1230");
    }

    #[test]
    fn test_expiry_parse_single_digit_month() {
        let expiry = Expiry::parse("0126", Network::Visa).unwrap();
        assert_eq!(expiry.month, 1);
        assert_eq!(expiry.year, 2026);
        assert_eq!(expiry.to_mmyy(), "0126");
    }

    #[test]
    fn test_expiry_rejects_bad_month() {
        for text in ["0030", "1330", "9930"] {
            let err = Expiry::parse(text, Network::Visa).unwrap_err();
            assert_eq!(
                err,
                CardError::InvalidExpiryFormat {
                    network: Network::Visa
                }
            );
        }
    }

    #[test]
    fn test_expiry_rejects_bad_shape() {
        for text in ["", "123", "12345", "12/30", "1a30", " 230"] {
            assert!(Expiry::parse(text, Network::Visa).is_err());
        }
    }

    #[test]
    fn test_raw_input_debug_redacts_secrets() {
        let input = RawCardInput::new("4242424242424242", "123", "1230", Network::Visa);
        let rendered = format!("{:?}", input);
        assert!(!rendered.contains("4242424242424242"));
        assert!(!rendered.contains("123"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("Visa"));
    }

    #[test]
    fn test_stored_credential_debug_redacts_digests() {
        let input = RawCardInput::new("4242424242424242", "123", "1230", Network::Visa);
        let credential = StoredCredential::create(&input).unwrap();
        let rendered = format!("{:?}", credential);
        assert!(rendered.contains("4242"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("salt: ["));
    }
}
