//! Cyclic paging over an aggregate result's images.

use std::sync::Arc;

use posterdeck_common::{AggregateResult, ImageItem};

/// Cursor into `result.images`, wrapping at both ends.
#[derive(Debug, Clone)]
pub struct PagingSession {
    result: Arc<AggregateResult>,
    cursor: usize,
}

impl PagingSession {
    pub fn new(result: Arc<AggregateResult>) -> Self {
        Self { result, cursor: 0 }
    }

    pub fn result(&self) -> &AggregateResult {
        &self.result
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.result.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result.images.is_empty()
    }

    pub fn current(&self) -> Option<&ImageItem> {
        self.result.images.get(self.cursor)
    }

    pub fn next(&mut self) -> Option<&ImageItem> {
        if self.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<&ImageItem> {
        if self.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.len() - 1) % self.len();
        self.current()
    }

    /// Images of 1-based page `n` with `size` images per page. Pages past the
    /// end are empty.
    pub fn page(&self, n: usize, size: usize) -> &[ImageItem] {
        let size = size.max(1);
        let start = page_start(n, size);
        let images = &self.result.images;
        if start >= images.len() {
            return &[];
        }
        let end = (start + size).min(images.len());
        &images[start..end]
    }

    /// Number of pages at `size` images per page.
    pub fn page_count(&self, size: usize) -> usize {
        self.len().div_ceil(size.max(1))
    }
}

/// Zero-based index of the first image on 1-based page `n`. Saturates instead
/// of overflowing for absurd page numbers.
pub fn page_start(n: usize, size: usize) -> usize {
    n.saturating_sub(1).saturating_mul(size.max(1))
}
