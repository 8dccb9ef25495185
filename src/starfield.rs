//! The intro starfield: twinkling stars behind a timed sequence of
//! fading messages, ending with persistent lines and a reveal signal.

use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::{ShowConfig, StarfieldConfig};
use crate::constants::*;
use crate::engine::Engine;
use crate::error::{ShowError, ShowResult};
use crate::particles::{Bounds, ParticleField, engine_rng};
use crate::schedule::{Frame, Schedule};
use crate::scheduler::{TickHandle, TickScheduler};
use crate::surface::{Paint, RenderSurface, ResizeWatch};
use crate::text;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    /// Terminal; a new run needs a fresh engine.
    Stopped,
}

/// Outcome of one rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: Frame,
    /// The continue control should be visible.
    pub reveal: bool,
}

type RevealCallback = Box<dyn FnMut(Frame)>;

pub struct Starfield {
    settings: StarfieldConfig,
    schedule: Schedule,
    field: ParticleField,
    rng: StdRng,
    frame: Frame,
    state: EngineState,
    pending: Option<TickHandle>,
    resize_watch: Option<ResizeWatch>,
    revealed: bool,
    on_reveal: Option<RevealCallback>,
}

impl Starfield {
    pub fn init(surface: &dyn RenderSurface, config: &ShowConfig) -> ShowResult<Self> {
        Self::with_rng(surface, config, engine_rng(config.seed, 0))
    }

    pub fn with_rng(
        surface: &dyn RenderSurface,
        config: &ShowConfig,
        mut rng: StdRng,
    ) -> ShowResult<Self> {
        if !surface.has_text_metrics() {
            return Err(ShowError::surface_unavailable(
                "starfield text needs a surface that can measure text",
            ));
        }
        let settings = config.starfield.clone();
        if settings.color_hues.is_empty() {
            return Err(ShowError::configuration("starfield palette is empty"));
        }
        if settings.star_count == 0 {
            return Err(ShowError::configuration("starfield needs at least one star"));
        }

        let schedule = Schedule::build(
            &config.messages,
            &config.final_lines,
            settings.frame_duration,
            &config.partner_name,
        )?;
        let field = ParticleField::initialize(
            &mut rng,
            Bounds::of(surface),
            settings.star_count,
            &settings.color_hues,
            settings.max_radius,
        );

        Ok(Self {
            settings,
            schedule,
            field,
            rng,
            frame: 0,
            state: EngineState::Idle,
            pending: None,
            resize_watch: None,
            revealed: false,
            on_reveal: None,
        })
    }

    /// Called on every frame at or past the continue frame.
    pub fn on_reveal(mut self, callback: impl FnMut(Frame) + 'static) -> Self {
        self.on_reveal = Some(Box::new(callback));
        self
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Render the current frame and step the counter. Does not touch the
    /// scheduler, so tests can drive frames directly.
    pub fn advance_frame(&mut self, surface: &mut dyn RenderSurface) -> FrameReport {
        let frame = self.frame;
        let width = surface.width();
        let height = surface.height();

        surface.clear();
        surface.set_paint(Paint::background());
        surface.fill_rect(0.0, 0.0, width, height);

        // Twinkle after drawing: this frame shows pre-tick opacities.
        self.field.render(surface);
        self.field.tick(&mut self.rng, self.settings.twinkle_chance);

        self.render_messages(surface, frame);

        let reveal = self.schedule.is_revealed(frame);
        if reveal {
            if !self.revealed {
                info!(frame, "final line shown, revealing continue control");
                self.revealed = true;
            }
            if let Some(callback) = self.on_reveal.as_mut() {
                callback(frame);
            }
        }

        self.frame += 1;
        FrameReport { frame, reveal }
    }

    fn render_messages(&self, surface: &mut dyn RenderSurface, frame: Frame) {
        let width = surface.width();
        let height = surface.height();
        let font_px = font_size(width);
        surface.set_font(font_px);

        let line_height = font_px + LINE_SPACING_PX;
        let max_width = width * WRAP_WIDTH_FRACTION;
        let center_x = width / 2.0;

        for slot in &self.schedule.sequential {
            let opacity = slot.opacity(frame);
            if opacity > 0.0 {
                surface.set_paint(Paint::rgb(TEXT_COLOR).with_alpha(opacity));
                text::draw_wrapped(surface, &slot.text, center_x, height / 2.0, max_width, line_height);
            }
        }

        for slot in &self.schedule.finals {
            let opacity = self.schedule.final_opacity(slot, frame);
            if opacity > 0.0 {
                surface.set_paint(Paint::rgb(TEXT_COLOR).with_alpha(opacity));
                let y = height / 2.0 - FINAL_BLOCK_LIFT_PX
                    + slot.line_index as f32 * (font_px + FINAL_LINE_GAP_PX);
                text::draw_wrapped(surface, &slot.text, center_x, y, max_width, line_height);
            }
        }
    }
}

/// Message font size for a surface of the given width.
pub fn font_size(width: f32) -> f32 {
    FONT_MAX_PX.min(width / FONT_WIDTH_DIVISOR)
}

impl Engine for Starfield {
    fn start(&mut self, scheduler: &mut dyn TickScheduler, surface: &mut dyn RenderSurface) {
        match self.state {
            EngineState::Running => {}
            EngineState::Stopped => warn!("starfield already stopped, ignoring start"),
            EngineState::Idle => {
                self.frame = 0;
                self.state = EngineState::Running;
                self.resize_watch = Some(surface.watch_resize());
                self.pending = Some(scheduler.request_tick());
                debug!(continue_frame = self.schedule.continue_frame, "starfield started");
            }
        }
    }

    fn stop(&mut self, scheduler: &mut dyn TickScheduler, surface: &mut dyn RenderSurface) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_tick(handle);
        }
        if let Some(watch) = self.resize_watch.take() {
            surface.unwatch_resize(watch);
        }
        if self.state != EngineState::Stopped {
            debug!(frame = self.frame, "starfield stopped");
            self.state = EngineState::Stopped;
        }
    }

    fn on_tick(
        &mut self,
        handle: TickHandle,
        scheduler: &mut dyn TickScheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        if self.state != EngineState::Running || self.pending != Some(handle) {
            return false;
        }
        self.advance_frame(surface);
        self.pending = Some(scheduler.request_tick());
        true
    }

    fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use rand::SeedableRng;

    use super::*;
    use crate::scheduler::FrameScheduler;
    use crate::surface::DrawList;

    fn config() -> ShowConfig {
        let mut c = ShowConfig::default();
        c.messages = vec!["first".into(), "second".into()];
        c.final_lines = vec!["bye {name}".into()];
        c.partner_name = "Aria".into();
        c.starfield.frame_duration = 5;
        c.starfield.star_count = 30;
        c
    }

    fn engine(surface: &DrawList) -> Starfield {
        Starfield::with_rng(surface, &config(), StdRng::seed_from_u64(3)).unwrap()
    }

    #[test]
    fn font_tracks_width() {
        assert_eq!(font_size(2600.0), 28.0);
        assert_eq!(font_size(520.0), 20.0);
    }

    #[test]
    fn missing_metrics_is_surface_error() {
        let surface = DrawList::new(100.0, 100.0).without_text_metrics();
        let err = Starfield::init(&surface, &config()).err().unwrap();
        assert!(matches!(err, ShowError::SurfaceUnavailable(_)));
    }

    #[test]
    fn frames_show_expected_text() {
        let mut surface = DrawList::new(800.0, 600.0);
        let mut sf = engine(&surface);

        sf.advance_frame(&mut surface);
        assert_eq!(surface.texts().count(), 0);

        for _ in 1..5 {
            sf.advance_frame(&mut surface);
        }
        // frame 5: "first" at full opacity
        let report = sf.advance_frame(&mut surface);
        assert_eq!(report.frame, 5);
        let texts: Vec<_> = surface.texts().map(|(t, p)| (t.to_string(), p.alpha)).collect();
        assert_eq!(texts, vec![("first".to_string(), 1.0)]);
    }

    #[test]
    fn final_line_has_name_and_reveal_follows() {
        let mut surface = DrawList::new(800.0, 600.0);
        let hits = Rc::new(Cell::new(0u32));
        let seen = hits.clone();
        let mut sf = engine(&surface).on_reveal(move |_| seen.set(seen.get() + 1));
        let continue_frame = sf.schedule().continue_frame;
        assert_eq!(continue_frame, 26);

        for f in 0..continue_frame {
            assert!(!sf.advance_frame(&mut surface).reveal, "frame {f}");
        }
        assert_eq!(hits.get(), 0);
        for _ in 0..3 {
            assert!(sf.advance_frame(&mut surface).reveal);
        }
        assert_eq!(hits.get(), 3);
        assert!(surface.texts().any(|(t, p)| t == "bye Aria" && p.alpha == 1.0));
    }

    #[test]
    fn start_stop_lifecycle() {
        let mut surface = DrawList::new(400.0, 300.0);
        let mut scheduler = FrameScheduler::new();
        let mut sf = engine(&surface);
        assert_eq!(sf.state(), EngineState::Idle);

        sf.start(&mut scheduler, &mut surface);
        sf.start(&mut scheduler, &mut surface);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(surface.watch_count(), 1);

        for _ in 0..4 {
            for h in scheduler.take_due() {
                assert!(sf.on_tick(h, &mut scheduler, &mut surface));
            }
        }
        assert_eq!(sf.frame(), 4);

        sf.stop(&mut scheduler, &mut surface);
        sf.stop(&mut scheduler, &mut surface);
        assert_eq!(sf.state(), EngineState::Stopped);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(surface.watch_count(), 0);

        sf.start(&mut scheduler, &mut surface);
        assert_eq!(sf.state(), EngineState::Stopped);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn stop_right_after_start_freezes_the_counter() {
        let mut surface = DrawList::new(400.0, 300.0);
        let mut scheduler = FrameScheduler::new();
        let mut sf = engine(&surface);
        sf.start(&mut scheduler, &mut surface);
        let due = scheduler.take_due();
        sf.stop(&mut scheduler, &mut surface);

        let opacities: Vec<f32> = sf.field().particles().iter().map(|p| p.opacity).collect();
        for h in due {
            assert!(!sf.on_tick(h, &mut scheduler, &mut surface));
        }
        assert_eq!(sf.frame(), 0);
        let after: Vec<f32> = sf.field().particles().iter().map(|p| p.opacity).collect();
        assert_eq!(opacities, after);
    }

    #[test]
    fn foreign_handles_are_ignored() {
        let mut surface = DrawList::new(400.0, 300.0);
        let mut scheduler = FrameScheduler::new();
        let mut sf = engine(&surface);
        let foreign = scheduler.request_tick();
        sf.start(&mut scheduler, &mut surface);
        assert!(!sf.on_tick(foreign, &mut scheduler, &mut surface));
        assert_eq!(sf.frame(), 0);
    }
}
