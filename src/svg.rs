use anyhow::Context;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{UNAVAILABLE, stat_rows};
use crate::summary::ActivitySummary;

const START_Y: i32 = 30;
const LINE_HEIGHT: i32 = 20;
const LEFT_PADDING: f32 = 15.0;
const RIGHT_PADDING: f32 = 30.0;
const CHAR_WIDTH: f32 = 9.6;
const MIN_ROW_CHARS: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub cc: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                text: "#c9d1d9",
                key: "#c084fc",
                value: "#a5d6ff",
                cc: "#616e7f",
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#24292f",
                key: "#6d28d9",
                value: "#0366d6",
                cc: "#6a737d",
            },
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Theme::Dark => "dark_mode.svg",
            Theme::Light => "light_mode.svg",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Splits a stat into key, dot leader and value so that every value ends in
/// the same column.
pub fn build_stat_row(key: &str, value: &str, align_width: usize) -> (String, String, String) {
    let key_part = format!("{key}: ");
    let base_len = key_part.chars().count() + value.chars().count();
    let available = align_width.saturating_sub(base_len);

    let dots = match available {
        0 => "".to_string(),
        1 => " ".to_string(),
        2 => ". ".to_string(),
        n => ".".repeat(n),
    };

    (key_part, dots, value.to_string())
}

fn build_header_line(label: &str, align_width: usize) -> String {
    let base = format!("{label} ");
    let dash_count = align_width.saturating_sub(base.chars().count()) + 2;
    format!("{base}{}", "-".repeat(dash_count))
}

fn header_label(summary: &ActivitySummary) -> String {
    match &summary.profile {
        Some(p) if !p.login.is_empty() => format!("{} -- GitHub Stats", p.login),
        _ => "GitHub Stats".to_string(),
    }
}

// Builds the card body and returns (tspans, width, height)
fn build_body(summary: &ActivitySummary, today: NaiveDate) -> (String, f32, f32) {
    let mut tspans = String::new();

    if !summary.is_available() {
        let width = LEFT_PADDING + UNAVAILABLE.len() as f32 * CHAR_WIDTH + RIGHT_PADDING;
        tspans.push_str(&format!(
            r#"<tspan x="{LEFT_PADDING}" y="{START_Y}" class="cc">{}</tspan>
"#,
            escape_xml(UNAVAILABLE)
        ));
        return (tspans, width, START_Y as f32 + 30.0);
    }

    let rows = stat_rows(summary, today);
    let header = header_label(summary);

    let align_width = rows
        .iter()
        .map(|(k, v)| k.len() + 2 + v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
        .max(MIN_ROW_CHARS);

    tspans.push_str(&format!(
        r#"<tspan x="{LEFT_PADDING}" y="{START_Y}">{}</tspan>
"#,
        escape_xml(&build_header_line(&header, align_width))
    ));

    for (i, (key, value)) in rows.iter().enumerate() {
        let y = START_Y + (i as i32 + 1) * LINE_HEIGHT;
        let (k, d, v) = build_stat_row(key, value, align_width);
        tspans.push_str(&format!(
            r#"<tspan x="{LEFT_PADDING}" y="{y}" class="cc">. </tspan>
<tspan class="key">{}</tspan><tspan class="cc">{}</tspan><tspan class="value">{}</tspan>
"#,
            escape_xml(&k),
            escape_xml(&d),
            escape_xml(&v)
        ));
    }

    let lines = rows.len() + 1;
    let width = LEFT_PADDING + (align_width as f32 + 4.0) * CHAR_WIDTH + RIGHT_PADDING;
    let height = lines as f32 * LINE_HEIGHT as f32 + START_Y as f32;

    (tspans, width, height)
}

/// Renders the stats card for one theme.
pub fn generate_svg(summary: &ActivitySummary, today: NaiveDate, theme: Theme) -> String {
    let colors = theme.colors();
    let (body, w, h) = build_body(summary, today);

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="ConsolasFallback,Consolas,monospace"
     font-size="16px">

<style>
.key      {{ fill: {key}; }}
.value    {{ fill: {value}; }}
.cc       {{ fill: {cc}; }}
</style>

<rect width="{w}px" height="{h}px" fill="{bg}" rx="15"/>

<text fill="{text}">
{body}
</text>

</svg>
"#,
        w = w,
        h = h,
        bg = colors.bg,
        text = colors.text,
        key = colors.key,
        value = colors.value,
        cc = colors.cc,
        body = body
    )
}

/// Writes the dark and light cards into `dir`, creating it if needed.
pub fn write_cards(
    dir: &Path,
    summary: &ActivitySummary,
    today: NaiveDate,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for theme in [Theme::Dark, Theme::Light] {
        let path = dir.join(theme.file_name());
        fs::write(&path, generate_svg(summary, today, theme))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
