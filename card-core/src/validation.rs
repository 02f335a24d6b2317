//! Per-network card format validation
//!
//! Strict format checks only: exact length, ASCII digits, no trimming
//! and no separator stripping. Checks run in a fixed order (network,
//! number, CVV, expiry) and the first failure wins, so callers always
//! see the same rejection for the same input.

use crate::error::{CardError, Result};
use crate::types::{Network, RawCardInput};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref AMEX_NUMBER_FORMAT: Regex = Regex::new(r"^[0-9]{15}$").unwrap();
    static ref AMEX_CVV_FORMAT: Regex = Regex::new(r"^[0-9]{4}$").unwrap();
    static ref VISA_NUMBER_FORMAT: Regex = Regex::new(r"^[0-9]{16}$").unwrap();
    static ref VISA_CVV_FORMAT: Regex = Regex::new(r"^[0-9]{3}$").unwrap();
    static ref MASTERCARD_NUMBER_FORMAT: Regex = Regex::new(r"^[0-9]{16}$").unwrap();
    static ref MASTERCARD_CVV_FORMAT: Regex = Regex::new(r"^[0-9]{3}$").unwrap();
    static ref EXPIRY_FORMAT: Regex = Regex::new(r"^[0-9]{4}$").unwrap();
}

/// Validate a raw card against its claimed network's format rules.
///
/// Returns the confirmed network on success so downstream code works
/// with a network that is known to be recognized.
pub fn validate_card_format(input: &RawCardInput) -> Result<Network> {
    let network = input.network;
    if network == Network::Unknown {
        return Err(CardError::UnknownNetwork);
    }
    if !is_valid_number(&input.number, network) {
        return Err(CardError::InvalidNumberFormat { network });
    }
    if !is_valid_cvv(&input.cvv, network) {
        return Err(CardError::InvalidCvvFormat { network });
    }
    if !EXPIRY_FORMAT.is_match(&input.expiry) {
        return Err(CardError::InvalidExpiryFormat { network });
    }
    Ok(network)
}

/// True when `number` satisfies the network's card number rule
pub fn is_valid_number(number: &str, network: Network) -> bool {
    match network {
        Network::Amex => AMEX_NUMBER_FORMAT.is_match(number),
        Network::Visa => VISA_NUMBER_FORMAT.is_match(number),
        Network::MasterCard => MASTERCARD_NUMBER_FORMAT.is_match(number),
        Network::Unknown => false,
    }
}

/// True when `cvv` satisfies the network's CVV rule
pub fn is_valid_cvv(cvv: &str, network: Network) -> bool {
    match network {
        Network::Amex => AMEX_CVV_FORMAT.is_match(cvv),
        Network::Visa => VISA_CVV_FORMAT.is_match(cvv),
        Network::MasterCard => MASTERCARD_CVV_FORMAT.is_match(cvv),
        Network::Unknown => false,
    }
}
