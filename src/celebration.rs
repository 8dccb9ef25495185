//! Final screen: the photo carousel, floating hearts and closing messages.

use std::path::PathBuf;

use rand::Rng;
use rand::rngs::StdRng;

use crate::ambient::{AmbientField, AmbientSettings};
use crate::carousel::{Carousel, Gesture, placement};
use crate::config::ShowConfig;
use crate::constants::{FPS, HEART_SPAWN_FRAMES, SWIPE_THRESHOLD_PX, TEXT_COLOR};
use crate::error::ShowResult;
use crate::particles::engine_rng;
use crate::surface::{Paint, Rect, RenderSurface};
use crate::text;

const HEART_HUES: [f32; 3] = [330.0, 345.0, 0.0];

#[derive(Clone, Debug, PartialEq)]
pub struct Heart {
    /// Horizontal position as a fraction of the width.
    pub x: f32,
    pub size: f32,
    pub hue: f32,
    pub age: u64,
    pub lifetime: u64,
}

impl Heart {
    /// Progress through the heart's life, `0..=1`.
    pub fn progress(&self) -> f32 {
        (self.age as f32 / self.lifetime.max(1) as f32).min(1.0)
    }
}

/// A heart every [`HEART_SPAWN_FRAMES`], each rising for 3 to 7 seconds.
pub struct HeartStream {
    hearts: Vec<Heart>,
    frame: u64,
    rng: StdRng,
}

impl HeartStream {
    pub fn new(rng: StdRng) -> Self {
        Self { hearts: Vec::new(), frame: 0, rng }
    }

    pub fn hearts(&self) -> &[Heart] {
        &self.hearts
    }

    pub fn tick(&mut self) {
        for heart in &mut self.hearts {
            heart.age += 1;
        }
        self.hearts.retain(|h| h.age < h.lifetime);

        if self.frame % HEART_SPAWN_FRAMES == 0 {
            let seconds = 3.0 + self.rng.random::<f32>() * 4.0;
            self.hearts.push(Heart {
                x: self.rng.random::<f32>(),
                size: 16.0 + self.rng.random::<f32>() * 22.4,
                hue: HEART_HUES[self.rng.random_range(0..HEART_HUES.len())],
                age: 0,
                lifetime: (seconds * FPS as f32) as u64,
            });
        }
        self.frame += 1;
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let width = surface.width();
        let height = surface.height();
        for heart in &self.hearts {
            let t = heart.progress();
            let x = heart.x * width;
            let y = height + heart.size - (height + heart.size * 2.0) * t;
            let r = heart.size / 4.0;
            surface.set_paint(Paint::hsla(heart.hue, 85.0, 65.0, 1.0 - t));
            surface.fill_circle(x - r, y - r / 2.0, r);
            surface.fill_circle(x + r, y - r / 2.0, r);
            surface.fill_circle(x, y + r / 2.0, r * 0.9);
        }
    }
}

pub struct Celebration {
    carousel: Carousel<PathBuf>,
    message: String,
    sub_message: String,
    hearts: HeartStream,
    ambient: AmbientField,
    drag_start: Option<f32>,
}

impl Celebration {
    pub fn init(surface: &dyn RenderSurface, config: &ShowConfig) -> ShowResult<Self> {
        let carousel = Carousel::new(config.carousel_photos())?;
        let ambient = AmbientField::init(
            surface,
            AmbientSettings {
                star_count: config.ambient.celebration_star_count,
                palette: config.starfield.color_hues.clone(),
                max_radius: config.ambient.max_radius,
                twinkle_chance: config.ambient.twinkle_chance,
            },
            engine_rng(config.seed, 2),
        );
        Ok(Self {
            carousel,
            message: config.celebration.message.clone(),
            sub_message: config.celebration.sub_message.clone(),
            hearts: HeartStream::new(engine_rng(config.seed, 3)),
            ambient,
            drag_start: None,
        })
    }

    pub fn carousel(&self) -> &Carousel<PathBuf> {
        &self.carousel
    }

    pub fn hearts(&self) -> &HeartStream {
        &self.hearts
    }

    pub fn ambient_mut(&mut self) -> &mut AmbientField {
        &mut self.ambient
    }

    pub fn gesture(&mut self, gesture: Gesture) -> bool {
        self.carousel.apply(gesture)
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.drag_start = Some(x);
    }

    /// A long drag turns the carousel; a click on an arrow turns it too.
    pub fn pointer_up(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let Some(start) = self.drag_start.take() else {
            return false;
        };
        let dx = x - start;
        if dx.abs() > SWIPE_THRESHOLD_PX {
            return self.gesture(Gesture::Drag { dx });
        }
        let (left, right) = arrow_rects(width, height);
        if left.contains(x, y) {
            self.gesture(Gesture::ArrowLeft)
        } else if right.contains(x, y) {
            self.gesture(Gesture::ArrowRight)
        } else {
            false
        }
    }

    /// Everything drawn over the ambient stars. Advances the hearts.
    pub fn render_overlay(&mut self, surface: &mut dyn RenderSurface) {
        self.hearts.tick();
        self.hearts.render(surface);
        self.render_carousel(surface);

        let width = surface.width();
        let height = surface.height();
        surface.set_paint(Paint::rgb(TEXT_COLOR));
        surface.set_font(28.0_f32.min(width / 22.0));
        text::draw_wrapped(surface, &self.message, width / 2.0, height * 0.82, width * 0.9, 36.0);
        surface.set_font(20.0_f32.min(width / 30.0));
        text::draw_wrapped(surface, &self.sub_message, width / 2.0, height * 0.9, width * 0.9, 28.0);
    }

    fn render_carousel(&self, surface: &mut dyn RenderSurface) {
        let width = surface.width();
        let height = surface.height();
        let (track_w, card_w, center_y) = track_metrics(width, height);
        let card_h = card_w * 1.25;

        let mut visible: Vec<_> = self
            .carousel
            .iter_slots()
            .filter_map(|(path, slot)| placement(slot).map(|p| (path, p)))
            .collect();
        visible.sort_by_key(|(_, p)| p.depth);

        surface.set_font(14.0);
        for (path, p) in visible {
            let w = card_w * p.scale;
            let h = card_h * p.scale;
            let frame = Rect::centered(width / 2.0 + p.offset * track_w, center_y, w, h);
            surface.set_paint(Paint::rgba(250, 240, 245, p.opacity));
            surface.fill_rect(frame.x, frame.y, frame.w, frame.h);
            surface.set_paint(Paint::rgba(40, 30, 60, p.opacity));
            surface.fill_rect(frame.x + 8.0, frame.y + 8.0, frame.w - 16.0, frame.h - 40.0);

            let caption = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let caption_w = surface.measure_text_width(&caption);
            surface.set_paint(Paint::rgba(60, 40, 80, p.opacity));
            surface.draw_text(&caption, frame.center().0 - caption_w / 2.0, frame.y + frame.h - 16.0);
        }

        let (left, right) = arrow_rects(width, height);
        surface.set_font(24.0);
        for (rect, glyph) in [(left, "<"), (right, ">")] {
            surface.set_paint(Paint::rgba(255, 255, 255, 0.15));
            surface.fill_rect(rect.x, rect.y, rect.w, rect.h);
            surface.set_paint(Paint::rgb(TEXT_COLOR));
            let (cx, cy) = rect.center();
            let glyph_w = surface.measure_text_width(glyph);
            surface.draw_text(glyph, cx - glyph_w / 2.0, cy);
        }
    }
}

/// `(track width, centre card width, track centre y)`.
fn track_metrics(width: f32, height: f32) -> (f32, f32, f32) {
    let track_w = width.min(900.0);
    let card_w = (track_w * 0.34).min(height * 0.4);
    (track_w, card_w, height * 0.42)
}

/// Left and right arrow buttons beside the carousel track.
pub fn arrow_rects(width: f32, height: f32) -> (Rect, Rect) {
    let (track_w, _, center_y) = track_metrics(width, height);
    let inset = (width - track_w) / 2.0 + 36.0;
    (
        Rect::centered(inset, center_y, 44.0, 44.0),
        Rect::centered(width - inset, center_y, 44.0, 44.0),
    )
}
