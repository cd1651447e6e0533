//! Session domain module.
//!
//! Owns authentication and onboarding state: the explicit state machine,
//! the durable session flags, and the manager that drives both.
//!
//! # Module Structure
//!
//! - `model`: the session state machine (`SessionState`, `SessionSnapshot`)
//! - `persistence`: durable session flags (`SessionKeys`)
//! - `manager`: session lifecycle management (`SessionManager`)

mod manager;
mod model;
mod persistence;

pub use manager::{RegistrationOutcome, SessionManager, SignInMethod};
pub use model::{ProfileSource, SessionSnapshot, SessionState};
pub use persistence::SessionKeys;
