use posterdeck_common::ImageItem;

use crate::config::ScoringConfig;

/// Composite ranking score of one image.
///
/// `area * resolution_weight + popularity * popularity_weight`, plus the flat
/// bonus for structured items. Missing dimensions or popularity count as zero.
pub fn score(item: &ImageItem, weights: &ScoringConfig) -> f64 {
    let area = item.area() as f64;
    let popularity = item.popularity.unwrap_or(0.0);
    let bonus = if item.structured {
        weights.structured_bonus
    } else {
        0.0
    };
    area * weights.resolution_weight + popularity * weights.popularity_weight + bonus
}

/// Order images by descending score. Equal scores keep their input order.
pub fn rank(items: Vec<ImageItem>, weights: &ScoringConfig) -> Vec<ImageItem> {
    let mut scored: Vec<(f64, ImageItem)> = items
        .into_iter()
        .map(|item| (score(&item, weights), item))
        .collect();
    scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    scored.into_iter().map(|(_, item)| item).collect()
}
