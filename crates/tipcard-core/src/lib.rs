//! Tipcard core - session management and local-first persistence.
//!
//! This crate is the domain layer of the tipcard hotel-tipping product.
//! It owns:
//!
//! - the session state machine and its operations (sign-in, registration,
//!   sign-out) in [`session`]
//! - the local-first record store that prefers the remote document backend
//!   and degrades to a durable local cache in [`store`]
//! - the organization profile model in [`profile`]
//! - the collaborator traits the UI shell injects concrete backends for:
//!   [`auth::AuthProvider`], [`store::DocumentStore`],
//!   [`store::KeyValueStorage`], [`payment::PaymentProcessor`]
//!
//! No I/O implementation lives here; see `tipcard-infrastructure` for the
//! storage backends and `tipcard-application` for the use cases.

pub mod auth;
pub mod config;
pub mod error;
pub mod payment;
pub mod profile;
pub mod session;
pub mod store;

// Re-export common error type
pub use error::{Result, TipcardError};
