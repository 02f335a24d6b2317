//! Error types for card credential operations

use crate::types::Network;
use thiserror::Error;

/// Result type alias for credential operations
pub type Result<T> = std::result::Result<T, CardError>;

/// Errors produced while validating or sealing card data.
///
/// Every variant is raised before any secret material is hashed, so a
/// failed operation leaves nothing derived from the input behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// The claimed network is absent or not one this engine knows
    #[error("Invalid card network. Card network is unknown.")]
    UnknownNetwork,

    /// The card number does not satisfy the network's format rule
    #[error("Invalid card number format for network {network}")]
    InvalidNumberFormat {
        /// Network whose rule was violated
        network: Network,
    },

    /// The CVV does not satisfy the network's format rule
    #[error("Invalid CVV format for network {network}")]
    InvalidCvvFormat {
        /// Network whose rule was violated
        network: Network,
    },

    /// The expiry is not a four-digit MMYY string with a real month
    #[error("Invalid expiry date format for network {network}")]
    InvalidExpiryFormat {
        /// Network whose rule was violated
        network: Network,
    },
}
