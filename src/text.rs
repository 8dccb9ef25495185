//! Word wrapping and centred text blocks.

use crate::surface::RenderSurface;

/// Greedy word wrap.
///
/// Words are split on single spaces and packed while the joined line
/// measures at most `max_width`. A word that alone exceeds `max_width`
/// is emitted on its own line, unsplit.
pub fn wrap<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure(&candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    lines.push(current);
    lines
}

/// Draw `lines` as a block vertically centred on `center_y`, each line
/// horizontally centred on `center_x`, in input order.
pub fn render_centered(
    lines: &[String],
    center_x: f32,
    center_y: f32,
    line_height: f32,
    surface: &mut dyn RenderSurface,
) {
    let total = lines.len() as f32 * line_height;
    let first = center_y - total / 2.0 + line_height / 2.0;
    for (i, line) in lines.iter().enumerate() {
        let width = surface.measure_text_width(line);
        surface.draw_text(line, center_x - width / 2.0, first + i as f32 * line_height);
    }
}

/// Wrap against the surface's own metrics and draw centred.
pub fn draw_wrapped(
    surface: &mut dyn RenderSurface,
    text: &str,
    center_x: f32,
    center_y: f32,
    max_width: f32,
    line_height: f32,
) {
    let lines = wrap(text, max_width, |s| surface.measure_text_width(s));
    render_centered(&lines, center_x, center_y, line_height, surface);
}
