//! Payment processor trait and tip payment types.
//!
//! The processor itself (intent creation on its backend, the hosted card
//! form) is an external collaborator; this module owns only the request
//! shape and the single create-then-confirm call sequence the checkout flow
//! performs.

use crate::error::{Result, TipcardError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A tip payment to be charged, amounts in minor currency units (cents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipPaymentRequest {
    pub amount_minor: u64,
    pub staff_id: String,
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl TipPaymentRequest {
    pub fn new(
        amount_minor: u64,
        staff_id: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Self {
        Self {
            amount_minor,
            staff_id: staff_id.into(),
            room_id: room_id.into(),
            feedback: None,
            rating: None,
        }
    }

    /// Convenience for UIs that collect whole currency units.
    pub fn from_major_units(
        amount_major: u64,
        staff_id: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Self {
        Self::new(amount_major * 100, staff_id, room_id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount_minor == 0 {
            return Err(TipcardError::invalid_input("tip amount must be positive"));
        }
        if self.staff_id.is_empty() || self.room_id.is_empty() {
            return Err(TipcardError::invalid_input(
                "tip must reference a staff member and a room",
            ));
        }
        Ok(())
    }
}

/// Opaque token returned by the processor; used once to confirm the charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Terminal state of the single confirm call. No reconciliation happens
/// beyond this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Succeeded,
    Processing,
    Failed,
}

/// Result of confirming a card charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// Processor-side intent identifier.
    pub intent: String,
    pub status: PaymentStatus,
}

/// An abstract card-payment backend.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Registers the pending charge and returns the secret used to confirm
    /// it client-side.
    async fn create_payment_intent(&self, request: &TipPaymentRequest) -> Result<ClientSecret>;

    /// Confirms the charge. Called exactly once per intent.
    async fn confirm_card_payment(&self, secret: &ClientSecret) -> Result<PaymentConfirmation>;
}
