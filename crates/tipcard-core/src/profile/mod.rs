//! Organization profile domain module.
//!
//! The organization profile is the onboarded hotel's configuration record:
//! identity, contact details, rooms, and staff. It is created once at
//! registration and mutated by later catalog edits.

mod model;
mod org_id;

pub use model::{
    HOTELS_COLLECTION, OrganizationProfile, ProfileStatus, RegistrationInput, Room, StaffMember,
    SubscriptionTier,
};
pub use org_id::generate_org_id;
