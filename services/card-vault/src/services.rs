use crate::database::Database;
use crate::errors::{Result, VaultError};
use crate::metrics;
use crate::models::{
    CardDisplay, CardRequest, CustomerRequest, CustomerResponse, VerifyCardRequest,
};
use card_core::{has_matching_credential, StoredCredential};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct VaultService {
    db: Arc<Database>,
}

impl VaultService {
    pub fn new(db: Arc<Database>) -> Self {
        VaultService { db }
    }

    /// Create a customer
    pub async fn create_customer(&self, request: CustomerRequest) -> Result<CustomerResponse> {
        request
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        let customer = self.db.create_customer(&request).await?;

        info!("Created customer {}", customer.id);

        Ok(customer.into())
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, customer_id: Uuid) -> Result<CustomerResponse> {
        let customer = self
            .db
            .get_customer(customer_id)
            .await?
            .ok_or(VaultError::CustomerNotFound(customer_id))?;

        Ok(customer.into())
    }

    /// List all customers
    pub async fn list_customers(&self) -> Result<Vec<CustomerResponse>> {
        let customers = self.db.list_customers().await?;

        Ok(customers.into_iter().map(CustomerResponse::from).collect())
    }

    /// Replace a customer's profile fields
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        request: CustomerRequest,
    ) -> Result<CustomerResponse> {
        if let Some(body_id) = request.id {
            if body_id != customer_id {
                return Err(VaultError::IdMismatch {
                    path_id: customer_id,
                    body_id,
                });
            }
        }

        request
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        let customer = self
            .db
            .update_customer(customer_id, &request)
            .await?
            .ok_or(VaultError::CustomerNotFound(customer_id))?;

        Ok(customer.into())
    }

    /// Delete a customer and every card stored for them
    pub async fn delete_customer(&self, customer_id: Uuid) -> Result<CustomerResponse> {
        let customer = self
            .db
            .delete_customer(customer_id)
            .await?
            .ok_or(VaultError::CustomerNotFound(customer_id))?;

        info!("Deleted customer {} and their cards", customer.id);

        Ok(customer.into())
    }

    /// Validate, seal and store a new card for a customer.
    ///
    /// The raw card data is rejected before any hashing when its format
    /// is invalid, and only the sealed credential reaches the database.
    pub async fn create_card(&self, request: CardRequest) -> Result<CardDisplay> {
        if !self.db.customer_exists(request.customer_id).await? {
            return Err(VaultError::MissingCardOwner(request.customer_id));
        }

        let credential = StoredCredential::create(&request.raw_input()).map_err(|err| {
            metrics::record_card_rejection(&err);
            VaultError::from(err)
        })?;
        let card = self.db.create_card(request.customer_id, &credential).await?;

        metrics::CARDS_ENROLLED.inc();
        info!(
            "Stored {} card {} for customer {}",
            credential.network, card.id, card.customer_id
        );

        Ok(CardDisplay::from_row(&card))
    }

    /// Get a card's display form by ID
    pub async fn get_card(&self, card_id: Uuid) -> Result<CardDisplay> {
        let card = self
            .db
            .get_card(card_id)
            .await?
            .ok_or(VaultError::CardNotFound(card_id))?;

        Ok(CardDisplay::from_row(&card))
    }

    /// List the display forms of every card stored for a customer
    pub async fn get_customer_cards(&self, customer_id: Uuid) -> Result<Vec<CardDisplay>> {
        if !self.db.customer_exists(customer_id).await? {
            return Err(VaultError::CustomerNotFound(customer_id));
        }

        let cards = self.db.get_cards_by_customer(customer_id).await?;

        Ok(cards.iter().map(CardDisplay::from_row).collect())
    }

    /// Replace a stored card with new card data.
    ///
    /// The candidate goes through full validation, then reconciliation
    /// against the stored credential decides whether the salt rotates.
    /// A card stays with the customer it was stored for.
    pub async fn update_card(&self, card_id: Uuid, request: CardRequest) -> Result<CardDisplay> {
        if let Some(body_id) = request.id {
            if body_id != card_id {
                return Err(VaultError::IdMismatch {
                    path_id: card_id,
                    body_id,
                });
            }
        }

        let card = self
            .db
            .get_card(card_id)
            .await?
            .ok_or(VaultError::CardNotFound(card_id))?;

        if card.customer_id != request.customer_id {
            return Err(VaultError::CardReassignment);
        }

        let existing = card.credential()?;
        let updated = existing.apply_update(&request.raw_input()).map_err(|err| {
            metrics::record_card_rejection(&err);
            VaultError::from(err)
        })?;

        let rotated = updated.salt != existing.salt;
        let row = self
            .db
            .update_card(card_id, &updated)
            .await?
            .ok_or(VaultError::CardNotFound(card_id))?;

        metrics::CARDS_UPDATED.inc();
        if rotated {
            metrics::SALT_ROTATIONS.inc();
        }
        info!(
            "Updated card {} for customer {} (salt rotated: {})",
            row.id, row.customer_id, rotated
        );

        Ok(CardDisplay::from_row(&row))
    }

    /// Delete a card, returning its display form
    pub async fn delete_card(&self, card_id: Uuid) -> Result<CardDisplay> {
        let card = self
            .db
            .delete_card(card_id)
            .await?
            .ok_or(VaultError::CardNotFound(card_id))?;

        metrics::CARDS_DELETED.inc();
        info!("Deleted card {} for customer {}", card.id, card.customer_id);

        Ok(CardDisplay::from_row(&card))
    }

    /// Verify a presented card against a customer's stored credentials.
    ///
    /// Succeeds when any stored card matches the presented number, CVV
    /// and expiry simultaneously; a presentation mixing fields from two
    /// stored cards never verifies.
    pub async fn verify_card(&self, request: VerifyCardRequest) -> Result<()> {
        if !self.db.customer_exists(request.customer_id).await? {
            return Err(VaultError::CustomerNotFound(request.customer_id));
        }

        let rows = self.db.get_cards_by_customer(request.customer_id).await?;
        let credentials = rows
            .iter()
            .map(|row| row.credential())
            .collect::<Result<Vec<_>>>()?;

        metrics::VERIFICATION_ATTEMPTS.inc();
        if has_matching_credential(&credentials, &request.number, &request.cvv, &request.expiry) {
            metrics::VERIFICATION_MATCHES.inc();
            Ok(())
        } else {
            Err(VaultError::NoMatchingCard)
        }
    }
}
