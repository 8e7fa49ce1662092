//! Metadata resolution and aggregation.
//!
//! # Module layout
//!
//! - [`resolver`] -- Ordered strategy cascade choosing one canonical record.
//! - [`classify`] -- Keyword-based content type labels.
//! - [`aggregate`] -- The façade tying resolution, details, images and labels
//!   together.

pub mod aggregate;
pub mod classify;
pub mod resolver;

pub use aggregate::Aggregator;
pub use classify::classify;
pub use resolver::{
    FallbackTitleLookup, PrimaryCollectionSearch, PrimaryMultiSearch, Resolver, ResolverStrategy,
};
