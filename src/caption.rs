//! Caption box rendering for aggregate results.

use posterdeck_common::AggregateResult;

const RULE_WIDTH: usize = 38;
const SYNOPSIS_LIMIT: usize = 900;
const QUALITY_LINE: &str = "480p | 720p | 1080p";
const NO_SYNOPSIS: &str = "No synopsis available.";

/// Synopsis text, cut to the display limit with an ellipsis.
fn synopsis(overview: &str) -> String {
    let trimmed = overview.trim();
    if trimmed.is_empty() {
        return NO_SYNOPSIS.to_string();
    }
    if trimmed.chars().count() > SYNOPSIS_LIMIT {
        let cut: String = trimmed.chars().take(SYNOPSIS_LIMIT - 3).collect();
        return format!("{cut}...");
    }
    trimmed.to_string()
}

/// Render the ruled caption shown alongside a poster.
///
/// `audio` is optional release information; `N/A` when absent.
pub fn render_caption(result: &AggregateResult, audio: Option<&str>) -> String {
    let rule = "─".repeat(RULE_WIDTH);

    let header = match result.year {
        Some(year) => format!("🎬 {} ({year})", result.title),
        None => format!("🎬 {}", result.title),
    };
    let rating = result
        .rating
        .map(|r| format!("{r:.1}/10"))
        .unwrap_or_else(|| "N/A".to_string());
    let genres = if result.genres.is_empty() {
        "N/A".to_string()
    } else {
        result.genres.join(", ")
    };

    [
        rule.clone(),
        header,
        rule.clone(),
        format!("🎭 Type : {}", result.content_type),
        format!("⭐ Rating : {rating}"),
        format!("📁 Quality : {QUALITY_LINE}"),
        format!("🔈 Audio : {}", audio.unwrap_or("N/A")),
        format!("🎯 Genres : {genres}"),
        rule.clone(),
        format!("🧾 Synopsis :\n{}", synopsis(&result.overview)),
        rule,
    ]
    .join("\n")
}
