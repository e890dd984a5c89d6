//! # SVG Image
//!
//! A flat image: one background rectangle covering the canvas and up to
//! three centred text lines. Output is built by string concatenation in a
//! fixed attribute order so equal inputs give equal bytes.

use crate::config::RenderConfig;

/// Vertical positions, in percent, for one, two, or three lines.
fn line_positions(count: usize) -> &'static [u32] {
    match count {
        0 => &[],
        1 => &[50],
        2 => &[45, 55],
        _ => &[40, 50, 60],
    }
}

/// Escape text for use in SVG character data and attribute values.
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn open(config: &RenderConfig) -> String {
    let size = config.canvas_size;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    )
}

fn rect(fill: &str) -> String {
    format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        escape_xml(fill)
    )
}

/// Render the image for one identifier. Lines past the third are dropped.
pub fn render_image(
    config: &RenderConfig,
    background: &str,
    foreground: &str,
    lines: &[String],
) -> String {
    let lines = &lines[..lines.len().min(3)];
    let mut svg = open(config);
    svg.push_str(&rect(background));
    for (line, y) in lines.iter().zip(line_positions(lines.len())) {
        svg.push_str(&format!(
            r#"<text x="50%" y="{y}%" text-anchor="middle" dominant-baseline="middle" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
            escape_xml(&config.font_family),
            config.font_size,
            escape_xml(foreground),
            escape_xml(line),
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// Fixed image for suppressed identifiers: the placeholder fill, no text.
pub fn placeholder_image(config: &RenderConfig) -> String {
    let mut svg = open(config);
    svg.push_str(&rect(&config.placeholder_background));
    svg.push_str("</svg>");
    svg
}
