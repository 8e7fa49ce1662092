//! Image merge engine.
//!
//! Combines structured catalog images with scraped images into a single
//! deduplicated list ranked by a weighted score.

mod merge;
mod score;

pub use merge::{dedupe, url_hash, ImageMerger};
pub use score::{rank, score};
