//! Checkout use case: tip links and tip payments.
//!
//! A guest scans a room's QR code (the link built here), picks a staff
//! member and an amount, and the payment goes through the processor as a
//! create-intent plus a single confirm call. Rendering the QR image and the
//! hosted card form belong to the UI and the processor respectively.

use std::sync::Arc;
use tipcard_core::error::Result;
use tipcard_core::payment::{PaymentConfirmation, PaymentProcessor, TipPaymentRequest};

/// Drives the guest-facing tip payment flow.
pub struct CheckoutUseCase {
    processor: Arc<dyn PaymentProcessor>,
    tip_base_url: String,
}

impl CheckoutUseCase {
    pub fn new(processor: Arc<dyn PaymentProcessor>, tip_base_url: impl Into<String>) -> Self {
        Self {
            processor,
            tip_base_url: tip_base_url.into(),
        }
    }

    /// The URL encoded into a room's QR code.
    pub fn tip_url(&self, room_id: &str) -> String {
        format!("{}/room/{}", self.tip_base_url.trim_end_matches('/'), room_id)
    }

    /// Charges a tip: validates the request, creates the payment intent,
    /// and confirms the card charge once. No further reconciliation.
    pub async fn process_tip(&self, request: TipPaymentRequest) -> Result<PaymentConfirmation> {
        request.validate()?;

        let secret = self.processor.create_payment_intent(&request).await?;
        let confirmation = self.processor.confirm_card_payment(&secret).await?;

        tracing::info!(
            intent = %confirmation.intent,
            status = ?confirmation.status,
            amount_minor = request.amount_minor,
            "tip payment confirmed"
        );
        Ok(confirmation)
    }
}
