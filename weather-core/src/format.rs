//! Pure display helpers: icons, units, relative time and escaping.

use chrono::{DateTime, Utc};

use crate::model::Unit;

/// Placeholder shown for unknown values.
pub const DASH: &str = "-";

/// Weather icon family selected from the free-text condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Sun,
    Rain,
    Cloud,
    Fog,
    Snow,
    Storm,
}

/// Keyword families in priority order; the first family with a hit wins.
const ICON_KEYWORDS: &[(Icon, &[&str])] = &[
    (Icon::Sun, &["sun", "clear", "hot", "bright"]),
    (Icon::Rain, &["rain", "shower", "drizzle"]),
    (Icon::Cloud, &["cloud", "overcast", "cloudy"]),
    (Icon::Fog, &["fog", "haze", "mist", "smog"]),
    (Icon::Snow, &["snow", "sleet", "flurr"]),
    (Icon::Storm, &["storm", "thunder", "tstorm"]),
];

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Sun => "sun",
            Icon::Rain => "rain",
            Icon::Cloud => "cloud",
            Icon::Fog => "fog",
            Icon::Snow => "snow",
            Icon::Storm => "storm",
        }
    }

    /// Inline SVG markup for the icon.
    pub fn svg(&self) -> &'static str {
        match self {
            Icon::Sun => {
                r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><circle cx="12" cy="12" r="4" fill="#FBBF24"/><g stroke="#F59E0B" stroke-width="1.4" stroke-linecap="round"><path d="M12 2v2M12 20v2M2 12h2M20 12h2M5 5l1.5 1.5M17.5 17.5L19 19M5 19l1.5-1.5M17.5 6.5L19 5"/></g></svg>"##
            }
            Icon::Rain => {
                r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M6 15a4 4 0 010-8 5 5 0 019.6-1.4A4 4 0 0118 15H6z" fill="#BAE6FD" stroke="#0EA5E9" stroke-width="1.3"/><path d="M8 18v3M12 18v3M16 18v3" stroke="#0284C7" stroke-width="1.5" stroke-linecap="round"/></svg>"##
            }
            Icon::Cloud => {
                r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M6 17a4 4 0 010-8 5 5 0 019.6-1.4A4 4 0 0118 17H6z" fill="#E2E8F0" stroke="#64748B" stroke-width="1.3"/></svg>"##
            }
            Icon::Fog => {
                r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M4 8h12M3 12h18M5 16h14" stroke="#94A3B8" stroke-width="1.6" stroke-linecap="round"/></svg>"##
            }
            Icon::Snow => {
                r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M12 3v18M4.2 7.5l15.6 9M4.2 16.5l15.6-9" stroke="#60A5FA" stroke-width="1.5" stroke-linecap="round"/></svg>"##
            }
            Icon::Storm => {
                r##"<svg viewBox="0 0 24 24" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M6 13a4 4 0 010-8 5 5 0 019.6-1.4A4 4 0 0118 13" stroke="#64748B" stroke-width="1.3"/><path d="M12 11l-3 5h3l-2 5 5-7h-3l2-3z" fill="#FECACA" stroke="#EF4444" stroke-width="1"/></svg>"##
            }
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive keyword match; falls back to [`Icon::Cloud`].
pub fn pick_icon(condition: &str) -> Icon {
    let lower = condition.to_lowercase();

    ICON_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(icon, _)| *icon)
        .unwrap_or(Icon::Cloud)
}

/// Render a number the way it was entered, without a trailing `.0`.
pub fn format_number(value: f64) -> String {
    // Avoid printing "-0".
    if value == 0.0 { "0".to_string() } else { value.to_string() }
}

/// `"<n> km/h"` for Celsius cards, `"<n> mph"` for Fahrenheit. Empty when unknown.
pub fn format_wind(unit: Unit, value: Option<f64>) -> String {
    match value {
        Some(n) => format!("{} {}", format_number(n), unit.wind_suffix()),
        None => String::new(),
    }
}

pub fn format_temperature(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| DASH.to_string())
}

/// Feels-like value with its degree suffix, or a dash.
pub fn format_feels(unit: Unit, value: Option<f64>) -> String {
    match value {
        Some(n) => format!("{}°{}", format_number(n), unit),
        None => DASH.to_string(),
    }
}

pub fn format_humidity(value: Option<f64>) -> String {
    match value {
        Some(n) => format!("{}%", format_number(n)),
        None => DASH.to_string(),
    }
}

/// Relative age of an epoch-millisecond timestamp. Zero yields an empty string.
pub fn time_ago(timestamp_ms: i64, now: DateTime<Utc>) -> String {
    if timestamp_ms == 0 {
        return String::new();
    }

    let secs = now.timestamp_millis().saturating_sub(timestamp_ms).div_euclid(1000);
    if secs < 10 {
        return "just now".to_string();
    }
    if secs < 60 {
        return format!("{secs} sec ago");
    }

    let mins = secs / 60;
    if mins < 60 {
        return format!("{mins} min ago");
    }

    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours} hr{} ago", plural(hours));
    }

    let days = hours / 24;
    format!("{days} day{} ago", plural(days))
}

fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}

/// Escape text for safe inclusion in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
