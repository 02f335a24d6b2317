use card_core::{Expiry, Network, RawCardInput, StoredCredential, DIGEST_LENGTH};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{Result, VaultError};

/// Customer owning zero or more stored cards
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card credential row as persisted.
///
/// Holds the digest triple as raw bytes; [`Card::credential`]
/// rehydrates the typed credential for matching and reconciliation.
#[derive(Clone, FromRow)]
pub struct Card {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub network_id: i16,
    pub last_four: String,
    pub expiry_month: i16,
    pub expiry_year: i16,
    pub number_digest: Vec<u8>,
    pub cvv_digest: Vec<u8>,
    pub salt: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Rehydrate the stored credential from this row.
    ///
    /// Rows are only written from sealed credentials, so a shape
    /// mismatch here means the row was corrupted outside the service.
    pub fn credential(&self) -> Result<StoredCredential> {
        let network = Network::from_id(i32::from(self.network_id));
        if network == Network::Unknown {
            return Err(VaultError::Internal(format!(
                "card {} has unrecognized network id {}",
                self.id, self.network_id
            )));
        }

        let number_digest: [u8; DIGEST_LENGTH] =
            self.number_digest.as_slice().try_into().map_err(|_| {
                VaultError::Internal(format!("card {} has a malformed number digest", self.id))
            })?;
        let cvv_digest: [u8; DIGEST_LENGTH] =
            self.cvv_digest.as_slice().try_into().map_err(|_| {
                VaultError::Internal(format!("card {} has a malformed CVV digest", self.id))
            })?;

        let month = u8::try_from(self.expiry_month)
            .ok()
            .filter(|m| (1..=12).contains(m));
        let year = u16::try_from(self.expiry_year).ok();
        let (month, year) = match (month, year) {
            (Some(month), Some(year)) => (month, year),
            _ => {
                return Err(VaultError::Internal(format!(
                    "card {} has an out of range expiry",
                    self.id
                )))
            }
        };

        Ok(StoredCredential {
            network,
            last_four_digits: self.last_four.clone(),
            expiry: Expiry { month, year },
            number_digest,
            cvv_digest,
            salt: self.salt.clone(),
        })
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("id", &self.id)
            .field("customer_id", &self.customer_id)
            .field("network_id", &self.network_id)
            .field("last_four", &self.last_four)
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("number_digest", &"<redacted>")
            .field("cvv_digest", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

/// Customer create/update request
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CustomerRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    pub date_of_birth: NaiveDate,
}

/// Customer response shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            id: customer.id,
            name: customer.name,
            address: customer.address,
            date_of_birth: customer.date_of_birth,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Card submission for storing a new card or replacing a stored one.
///
/// Carries raw secret material in transit only. `Debug` redacts every
/// card field so request logging can never leak a number or CVV.
#[derive(Clone, Deserialize, Serialize)]
pub struct CardRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub customer_id: Uuid,
    pub network_id: i32,
    pub number: String,
    pub cvv: String,
    pub expiry: String,
}

impl CardRequest {
    /// View this request as raw card input for the credential engine
    pub fn raw_input(&self) -> RawCardInput {
        RawCardInput::new(
            self.number.clone(),
            self.cvv.clone(),
            self.expiry.clone(),
            Network::from_id(self.network_id),
        )
    }
}

impl fmt::Debug for CardRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardRequest")
            .field("id", &self.id)
            .field("customer_id", &self.customer_id)
            .field("network_id", &self.network_id)
            .field("number", &"<redacted>")
            .field("cvv", &"<redacted>")
            .field("expiry", &"<redacted>")
            .finish()
    }
}

/// Card presentation for verification: no claimed network, no card id
#[derive(Clone, Deserialize, Serialize)]
pub struct VerifyCardRequest {
    pub customer_id: Uuid,
    pub number: String,
    pub cvv: String,
    pub expiry: String,
}

impl fmt::Debug for VerifyCardRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyCardRequest")
            .field("customer_id", &self.customer_id)
            .field("number", &"<redacted>")
            .field("cvv", &"<redacted>")
            .field("expiry", &"<redacted>")
            .finish()
    }
}

/// Card display shape: metadata only, never digests or salt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDisplay {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub network: String,
    pub last_four_digits: String,
    pub expiry: String,
}

impl CardDisplay {
    pub fn from_row(row: &Card) -> Self {
        CardDisplay {
            id: row.id,
            customer_id: row.customer_id,
            network: Network::from_id(i32::from(row.network_id)).to_string(),
            last_four_digits: row.last_four.clone(),
            expiry: format!("{:02}{:02}", row.expiry_month, row.expiry_year % 100),
        }
    }
}
