/// Format a follower count for the header social row.
/// Examples: 950 → "950", 1500 → "1.5k", 220430 → "220k", 1500000 → "1.5M"
pub fn format_follower_count(count: Option<u64>) -> String {
    let Some(count) = count else {
        return String::new();
    };
    if count < 1_000 {
        return count.to_string();
    }
    if count < 1_000_000 {
        return compact(count as f64 / 1_000.0, "k");
    }
    compact(count as f64 / 1_000_000.0, "M")
}

fn compact(value: f64, suffix: &str) -> String {
    if value >= 100.0 {
        format!("{}{suffix}", value.round() as u64)
    } else if value.fract() == 0.0 {
        format!("{value:.0}{suffix}")
    } else {
        format!("{value:.1}{suffix}")
    }
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a value placed inside a double-quoted CSS string (`url("...")`).
pub fn escape_css_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
