//! Content type classification from query text.

use posterdeck_common::{ContentType, MediaKind};

/// Keyword groups checked in order; the first group with a match decides.
const KEYWORDS: &[(&[&str], ContentType)] = &[
    (&["season", "episode", "s0", "e0", "web series"], ContentType::TvShow),
    (&["kdrama", "k-drama"], ContentType::KDrama),
    (&["donghua"], ContentType::Donghua),
    (&["manga"], ContentType::Manga),
    (&["anime"], ContentType::Anime),
    (&["collection", "universe", "saga"], ContentType::Collection),
];

/// Label a query by keyword, falling back to the resolved media kind.
///
/// Matching is case-insensitive substring search, so `"s01e02"` reads as a TV
/// marker. A keyword match always wins over `kind`.
pub fn classify(query: &str, kind: Option<MediaKind>) -> ContentType {
    let lowered = query.to_lowercase();

    let matched = KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lowered.contains(w)))
        .map(|(_, label)| *label);

    match (matched, kind) {
        (Some(label), _) => label,
        (None, Some(MediaKind::Series)) => ContentType::TvShow,
        (None, Some(MediaKind::Movie)) => ContentType::Movie,
        (None, None) => ContentType::MovieOrTv,
    }
}
