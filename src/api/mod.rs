//! API clients for Spotify.
//!
//! This module provides two API clients:
//! - [`WebApi`]: Web API for metadata, search and playlist editing
//! - [`AccountsApi`]: Accounts service for token grants
//!
//! The [`consent`] module runs the local listener that completes the
//! user-consent flow.

pub mod accounts;
pub mod consent;
pub mod web;

pub use accounts::AccountsApi;
pub use web::WebApi;
