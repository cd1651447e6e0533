//! Tipcard application - use cases over the core.
//!
//! Each use case composes the core's session manager and record store for
//! one slice of the UI:
//!
//! - [`onboarding::OnboardingUseCase`] - sign-in, registration, sign-out
//! - [`catalog::CatalogUseCase`] - room and staff management
//! - [`checkout::CheckoutUseCase`] - tip links and tip payments

pub mod catalog;
pub mod checkout;
pub mod onboarding;

pub use catalog::{CatalogUseCase, RoomInput, StaffInput};
pub use checkout::CheckoutUseCase;
pub use onboarding::{NavigationCallback, OnboardingUseCase, Route};
