//! Posterdeck-Common: shared types and errors.
//!
//! - **Core Types**: media kinds, provider references, images, resolved
//!   records and aggregate results
//! - **Error Handling**: common error type and result alias
//!
//! # Examples
//!
//! ```
//! use posterdeck_common::{ImageItem, MediaKind, Error, Result};
//!
//! let image = ImageItem::scraped("https://example.com/poster.jpg", "bing");
//! assert!(!image.structured);
//! assert_eq!(MediaKind::Series.to_string(), "series");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("title"))
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
