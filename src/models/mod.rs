//! Data models for the claim bot
//!
//! Typed command requests and the read-only views handed to the admin dashboard.

pub mod claim;
pub mod guild;

// Re-export commonly used types for convenience
pub use claim::{ClaimRequest, RegisterCredentialRequest, ValidationError};
pub use guild::GuildEntry;
