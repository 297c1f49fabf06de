//! Context supplied to a pipeline from outside.
//!
//! This module provides:
//! - The identity provider used to attribute records
//! - The campaign profile that feeds prompt context

mod campaign;
mod identity;

pub use campaign::CampaignProfile;
pub use identity::{AnonymousIdentity, IdentityProvider, StaticIdentity, UserId};
