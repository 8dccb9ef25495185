//! Render surface capability and the recording surface used by backends and tests.

use crate::constants::BACKGROUND;

/// Paint colour: 8-bit RGB plus a real-valued alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Paint {
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha: clamp_unit(alpha) }
    }

    pub fn rgb((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn background() -> Self {
        Self::rgb(BACKGROUND)
    }

    /// CSS-style `hsla(h, s%, l%, a)`; hue in degrees, saturation and
    /// lightness in percent.
    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = channel(l);
            return Self::rgba(v, v, v, alpha);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgba(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
            alpha,
        )
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha: clamp_unit(alpha), ..self }
    }

    /// Alpha as an 8-bit channel for backends that want one.
    pub fn alpha_u8(&self) -> u8 {
        (self.alpha * 255.0).round() as u8
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Clamp to `[0, 1]`; NaN maps to 0.
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self { x: cx - w / 2.0, y: cy - h / 2.0, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Registration token returned by [`RenderSurface::watch_resize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResizeWatch(u64);

/// Drawing capability handed to every engine.
///
/// Text is positioned by its left edge and the vertical middle of the line.
pub trait RenderSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Erase everything drawn so far.
    fn clear(&mut self);
    fn set_paint(&mut self, paint: Paint);
    /// Font size in pixels for subsequent text calls.
    fn set_font(&mut self, size_px: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);

    fn has_text_metrics(&self) -> bool {
        true
    }
    fn measure_text_width(&self, text: &str) -> f32;
    fn draw_text(&mut self, text: &str, x: f32, y: f32);

    /// Register interest in size changes. While any watch is registered the
    /// surface follows its host's size; otherwise it keeps its current size.
    /// Registering catches up with the host size reported while unwatched.
    fn watch_resize(&mut self) -> ResizeWatch;
    fn unwatch_resize(&mut self, watch: ResizeWatch);
}

/// Width function used by a [`DrawList`]: `(text, font_px) -> width_px`.
pub type TextMetrics = fn(&str, f32) -> f32;

/// Rough average advance of a proportional sans font.
pub fn approximate_metrics(text: &str, font_px: f32) -> f32 {
    text.chars().count() as f32 * font_px * 0.5
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { x: f32, y: f32, w: f32, h: f32, paint: Paint },
    FillCircle { x: f32, y: f32, radius: f32, paint: Paint },
    Text { text: String, x: f32, y: f32, font_px: f32, paint: Paint },
}

/// Surface that records draw commands for a backend to replay.
///
/// Also the headless surface: nothing here touches a window.
pub struct DrawList {
    width: f32,
    height: f32,
    /// Latest size reported by the host, applied or not.
    host_size: (f32, f32),
    paint: Paint,
    font_px: f32,
    metrics: Option<TextMetrics>,
    commands: Vec<DrawCommand>,
    watches: Vec<ResizeWatch>,
    next_watch: u64,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            host_size: (width, height),
            paint: Paint::rgb((255, 255, 255)),
            font_px: 16.0,
            metrics: Some(approximate_metrics),
            commands: Vec::new(),
            watches: Vec::new(),
            next_watch: 0,
        }
    }

    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// A surface that cannot measure text.
    pub fn without_text_metrics(mut self) -> Self {
        self.metrics = None;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Paint)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, paint, .. } => Some((text.as_str(), *paint)),
            _ => None,
        })
    }

    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// Host size changed. Applied now while somebody watches, otherwise
    /// on the next [`RenderSurface::watch_resize`].
    pub fn host_resized(&mut self, width: f32, height: f32) -> bool {
        self.host_size = (width, height);
        if self.watches.is_empty() {
            return false;
        }
        (self.width, self.height) = self.host_size;
        true
    }
}

impl RenderSurface for DrawList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    fn set_font(&mut self, size_px: f32) {
        self.font_px = size_px;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, paint: self.paint });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(DrawCommand::FillCircle { x, y, radius, paint: self.paint });
    }

    fn has_text_metrics(&self) -> bool {
        self.metrics.is_some()
    }

    fn measure_text_width(&self, text: &str) -> f32 {
        self.metrics.map_or(0.0, |m| m(text, self.font_px))
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            font_px: self.font_px,
            paint: self.paint,
        });
    }

    fn watch_resize(&mut self) -> ResizeWatch {
        let watch = ResizeWatch(self.next_watch);
        self.next_watch += 1;
        self.watches.push(watch);
        (self.width, self.height) = self.host_size;
        watch
    }

    fn unwatch_resize(&mut self, watch: ResizeWatch) {
        self.watches.retain(|w| *w != watch);
    }
}
