//! Organization profile domain model.

use crate::config::DemoCredentials;
use crate::error::{Result, TipcardError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Remote collection holding one profile document per organization, keyed by
/// the auth provider's user identifier.
pub const HOTELS_COLLECTION: &str = "hotels";

/// Lifecycle status of an organization profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    #[default]
    Active,
}

/// Billing tier of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
}

/// A hotel room participating in the tipping system.
///
/// Field names follow the persisted document format of existing deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub number: String,
    pub floor: String,
    #[serde(rename = "type")]
    pub room_type: String,
    /// IDs of staff members currently assigned to clean this room.
    #[serde(rename = "assignedStaff", default)]
    pub assigned_staff_ids: Vec<String>,
}

/// A staff member who can receive tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The onboarded hotel's configuration record.
///
/// Persisted both remotely (collection `hotels`, keyed by the auth uid) and
/// in the local record cache under the same logical key. Credential fields
/// never appear here: they live only on [`RegistrationInput`], so a profile
/// cannot leak a password into either store by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    /// Document id. The auth provider's user identifier when the account was
    /// created remotely, a locally generated id otherwise.
    pub uid: String,
    pub org_id: String,
    pub hotel_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default)]
    pub subscription: SubscriptionTier,
    /// ISO 8601 timestamps.
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

impl OrganizationProfile {
    /// Builds the profile persisted at registration. Credential fields on the
    /// input are not copied.
    pub fn from_registration(input: &RegistrationInput, org_id: String) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            uid: Uuid::new_v4().to_string(),
            org_id,
            hotel_name: input.hotel_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            zip_code: input.zip_code.clone(),
            status: ProfileStatus::Active,
            subscription: SubscriptionTier::Free,
            created_at: now.clone(),
            updated_at: now,
            rooms: Vec::new(),
            staff: Vec::new(),
        }
    }

    /// The fixed profile behind the demo credential pair.
    pub fn demo(demo: &DemoCredentials) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            uid: "demo".to_string(),
            org_id: demo.org_id.clone(),
            hotel_name: "Demo Hotel".to_string(),
            email: demo.email.clone(),
            phone: "+1 234 567 8900".to_string(),
            address: "123 Demo Street".to_string(),
            city: "Demo City".to_string(),
            state: "DS".to_string(),
            zip_code: "12345".to_string(),
            status: ProfileStatus::Active,
            subscription: SubscriptionTier::Free,
            created_at: now.clone(),
            updated_at: now,
            rooms: Vec::new(),
            staff: Vec::new(),
        }
    }

    /// Bumps `updated_at` to now. Called by every catalog edit.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    pub fn staff_member(&self, staff_id: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|member| member.id == staff_id)
    }
}

/// The registration form contents. This is the only type that carries
/// credentials; they are handed to the auth provider and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationInput {
    pub hotel_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl RegistrationInput {
    const MIN_PASSWORD_LEN: usize = 6;

    /// Validates the form before any remote or local side effect happens.
    pub fn validate(&self) -> Result<()> {
        if self.hotel_name.trim().is_empty() {
            return Err(TipcardError::invalid_input("hotel name is required"));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || !email.contains('.') {
            return Err(TipcardError::invalid_input("a valid email is required"));
        }
        if self.password.len() < Self::MIN_PASSWORD_LEN {
            return Err(TipcardError::invalid_input(format!(
                "password must be at least {} characters",
                Self::MIN_PASSWORD_LEN
            )));
        }
        if self.password != self.confirm_password {
            return Err(TipcardError::invalid_input("passwords do not match"));
        }
        Ok(())
    }
}
