//! Identity verification for the catalog application.
//!
//! This crate provides:
//! - Parsing of the OAuth2 client-secrets document
//! - Anti-forgery state tokens for the login page
//! - The [`IdentityProvider`] seam and its Google implementation
//! - [`IdentityVerifier`], which checks an authorization code end to end

mod client_secrets;
mod error;
mod google;
mod provider;
mod state_token;
mod verifier;

pub use client_secrets::*;
pub use error::*;
pub use google::*;
pub use provider::*;
pub use state_token::*;
pub use verifier::*;

/// Provider tag stored in the session after a Google login.
pub const GOOGLE_PROVIDER: &str = "google";

/// Redirect URI used for the one-time-code flow of the Google sign-in button.
pub const POSTMESSAGE_REDIRECT_URI: &str = "postmessage";
