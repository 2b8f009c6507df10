//! Business logic services.
//!
//! Services orchestrate the catalog, resolver, knowledge, and composer
//! layers into high-level operations.

mod briefing;

pub use briefing::{BriefOptions, BriefingService};
