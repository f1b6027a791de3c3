// ABOUTME: Terminal formatting for command results
// ABOUTME: Colored verdict lines and the token table

use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use modview_core::{AdminTokenRecord, CategoryRating, ModerationVerdict};

/// `#rrggbb` to an RGB triple
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn rating_line(rating: &CategoryRating) -> ColoredString {
    let text = rating.to_string();
    match hex_to_rgb(rating.color()) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Lines printed for a moderation verdict
pub fn verdict_report(verdict: &ModerationVerdict) -> Vec<String> {
    let safety = if verdict.is_safe {
        verdict.safety_label().green().bold()
    } else {
        verdict.safety_label().red().bold()
    };

    let mut lines = vec![
        format!("Overall Safety: {}", safety),
        format!("Confidence: {}", verdict.confidence_label()),
        String::new(),
        "Categories:".bold().to_string(),
    ];

    let ratings: Vec<CategoryRating> = verdict.ratings().collect();
    if ratings.is_empty() {
        lines.push(format!("  {}", "(none reported)".dimmed()));
    }
    lines.extend(ratings.iter().map(|rating| format!("  {}", rating_line(rating))));
    lines
}

pub fn token_table(records: &[AdminTokenRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["Token", "Type", "Created"]);
    for record in records {
        table.add_row(vec![
            record.token.clone(),
            if record.is_admin { "Admin" } else { "User" }.to_string(),
            record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#28a745"), Some((0x28, 0xa7, 0x45)));
        assert_eq!(hex_to_rgb("#DC3545"), Some((0xdc, 0x35, 0x45)));
        assert_eq!(hex_to_rgb("28a745"), None);
        assert_eq!(hex_to_rgb("#12345"), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn test_verdict_report_text() {
        colored::control::set_override(false);
        let verdict: ModerationVerdict = serde_json::from_value(json!({
            "is_safe": false,
            "confidence": 0.87,
            "categories": {"violence": 5, "nudity": 0, "weapons": "n/a"}
        }))
        .unwrap();

        assert_eq!(
            verdict_report(&verdict),
            vec![
                "Overall Safety: Unsafe",
                "Confidence: 87.0%",
                "",
                "Categories:",
                "  violence: Extreme (5)",
                "  nudity: Safe (0)",
                "  weapons: Unknown (n/a)",
            ]
        );
    }

    #[test]
    fn test_token_table_lists_every_record() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let records = vec![
            AdminTokenRecord {
                token: "user-token".to_string(),
                is_admin: false,
                created_at,
            },
            AdminTokenRecord {
                token: "admin-token".to_string(),
                is_admin: true,
                created_at,
            },
        ];

        let rendered = token_table(&records).to_string();
        assert!(rendered.contains("user-token"));
        assert!(rendered.contains("admin-token"));
        assert!(rendered.contains("2024-01-02 03:04:05"));
    }
}
