//! Composes the three screens: owns the engines, routes input and draws
//! one frame at a time into whatever surface the backend provides.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info};

use crate::ambient::{AmbientField, AmbientSettings};
use crate::carousel::Gesture;
use crate::celebration::Celebration;
use crate::config::ShowConfig;
use crate::constants::{TEXT_COLOR, TRANSITION_DELAY};
use crate::engine::Engine;
use crate::error::ShowResult;
use crate::particles::engine_rng;
use crate::proposal::Proposal;
use crate::scheduler::FrameScheduler;
use crate::schedule::Frame;
use crate::screen::{Screen, ScreenManager};
use crate::starfield::Starfield;
use crate::surface::{Paint, Rect, RenderSurface};
use crate::text;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Enter/space: the continue control, or "yes" on the proposal.
    Confirm,
    Accept,
    Reject,
    Left,
    Right,
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStatus {
    pub screen: Screen,
    /// Starfield frame counter (frozen once the intro stops).
    pub starfield_frame: Frame,
    pub continue_visible: bool,
}

struct ProposalScreen {
    model: Proposal,
    ambient: AmbientField,
}

struct Button {
    label: String,
    rect: Rect,
    font_px: f32,
}

impl Button {
    fn layout(
        surface: &mut dyn RenderSurface,
        label: &str,
        font_px: f32,
        (pad_v, pad_h): (f32, f32),
        cx: f32,
        cy: f32,
    ) -> Self {
        surface.set_font(font_px);
        let w = surface.measure_text_width(label) + pad_h * 2.0;
        let h = font_px + pad_v * 2.0;
        Self { label: label.to_string(), rect: Rect::centered(cx, cy, w, h), font_px }
    }

    fn draw(&self, surface: &mut dyn RenderSurface, fill: Paint) {
        surface.set_paint(fill);
        surface.fill_rect(self.rect.x, self.rect.y, self.rect.w, self.rect.h);
        surface.set_font(self.font_px);
        surface.set_paint(Paint::rgb((255, 255, 255)));
        let (cx, cy) = self.rect.center();
        let w = surface.measure_text_width(&self.label);
        surface.draw_text(&self.label, cx - w / 2.0, cy);
    }
}

pub struct Presentation {
    config: ShowConfig,
    screens: ScreenManager,
    scheduler: FrameScheduler,
    starfield: Starfield,
    continue_visible: Rc<Cell<bool>>,
    proposal: Option<ProposalScreen>,
    celebration: Option<Celebration>,
}

impl Presentation {
    /// Validate the configuration, build the intro and start it.
    pub fn new(config: ShowConfig, surface: &mut dyn RenderSurface) -> ShowResult<Self> {
        config.validate()?;

        let continue_visible = Rc::new(Cell::new(false));
        let flag = continue_visible.clone();
        let mut starfield = Starfield::init(surface, &config)?.on_reveal(move |_| flag.set(true));

        let mut scheduler = FrameScheduler::new();
        starfield.start(&mut scheduler, surface);

        Ok(Self {
            config,
            screens: ScreenManager::new(TRANSITION_DELAY),
            scheduler,
            starfield,
            continue_visible,
            proposal: None,
            celebration: None,
        })
    }

    pub fn screen(&self) -> Screen {
        self.screens.current()
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebration.as_ref()
    }

    pub fn rejections(&self) -> usize {
        self.proposal.as_ref().map_or(0, |p| p.model.rejections())
    }

    pub fn status(&self) -> FrameStatus {
        FrameStatus {
            screen: self.screens.current(),
            starfield_frame: self.starfield.frame(),
            continue_visible: self.continue_visible.get(),
        }
    }

    pub fn handle_input(&mut self, input: Input, surface: &mut dyn RenderSurface, now: Instant) {
        if !self.screens.is_active() {
            return;
        }
        match self.screens.current() {
            Screen::Starfield => self.starfield_input(input, surface, now),
            Screen::Proposal => self.proposal_input(input, surface, now),
            Screen::Celebration => self.celebration_input(input, surface),
        }
    }

    fn starfield_input(&mut self, input: Input, surface: &mut dyn RenderSurface, now: Instant) {
        if !self.continue_visible.get() {
            return;
        }
        let pressed = match input {
            Input::Confirm => true,
            Input::PointerUp { x, y } => self.continue_button(surface).rect.contains(x, y),
            _ => false,
        };
        if pressed {
            self.starfield.stop(&mut self.scheduler, surface);
            self.screens.transition_to(Screen::Proposal, now);
        }
    }

    fn proposal_input(&mut self, input: Input, surface: &mut dyn RenderSurface, now: Instant) {
        let Some((yes, no)) = self.proposal_buttons(surface) else {
            return;
        };
        let accepted = match input {
            Input::Confirm | Input::Accept => true,
            Input::PointerUp { x, y } if yes.rect.contains(x, y) => true,
            Input::Reject => false,
            Input::PointerUp { x, y } if no.rect.contains(x, y) => false,
            _ => return,
        };

        let Some(screen) = self.proposal.as_mut() else {
            return;
        };
        if accepted {
            info!(rejections = screen.model.rejections(), "proposal accepted");
            screen.ambient.stop(&mut self.scheduler, surface);
            self.screens.transition_to(Screen::Celebration, now);
        } else {
            let question = screen.model.reject();
            debug!(question, "proposal rejected");
        }
    }

    fn celebration_input(&mut self, input: Input, surface: &mut dyn RenderSurface) {
        let Some(celebration) = self.celebration.as_mut() else {
            return;
        };
        match input {
            Input::Left => {
                celebration.gesture(Gesture::ArrowLeft);
            }
            Input::Right => {
                celebration.gesture(Gesture::ArrowRight);
            }
            Input::PointerDown { x, .. } => celebration.pointer_down(x),
            Input::PointerUp { x, y } => {
                celebration.pointer_up(x, y, surface.width(), surface.height());
            }
            _ => {}
        }
    }

    /// Run one display refresh: finish due transitions, fire due ticks,
    /// then draw the active screen's controls on top.
    pub fn frame(&mut self, surface: &mut dyn RenderSurface, now: Instant) -> ShowResult<FrameStatus> {
        if let Some(screen) = self.screens.poll(now) {
            self.activate(screen, surface)?;
        }

        let mut drew = false;
        for handle in self.scheduler.take_due() {
            let sched = &mut self.scheduler;
            drew |= self.starfield.on_tick(handle, sched, surface)
                || self
                    .proposal
                    .as_mut()
                    .is_some_and(|p| p.ambient.on_tick(handle, sched, surface))
                || self
                    .celebration
                    .as_mut()
                    .is_some_and(|c| c.ambient_mut().on_tick(handle, sched, surface));
        }
        if !drew {
            surface.clear();
        }

        if self.screens.is_active() {
            match self.screens.current() {
                Screen::Starfield => {
                    if self.continue_visible.get() {
                        let button = self.continue_button(surface);
                        button.draw(surface, Paint::rgba(140, 90, 200, 0.8));
                    }
                }
                Screen::Proposal => self.draw_proposal(surface),
                Screen::Celebration => {
                    if let Some(c) = self.celebration.as_mut() {
                        c.render_overlay(surface);
                    }
                }
            }
        }

        Ok(self.status())
    }

    fn activate(&mut self, screen: Screen, surface: &mut dyn RenderSurface) -> ShowResult<()> {
        match screen {
            Screen::Starfield => {}
            Screen::Proposal => {
                let mut ambient = AmbientField::init(
                    surface,
                    self.ambient_settings(self.config.ambient.proposal_star_count),
                    engine_rng(self.config.seed, 1),
                );
                ambient.start(&mut self.scheduler, surface);
                self.proposal = Some(ProposalScreen {
                    model: Proposal::new(self.config.proposal.clone()),
                    ambient,
                });
            }
            Screen::Celebration => {
                let mut celebration = Celebration::init(surface, &self.config)?;
                celebration.ambient_mut().start(&mut self.scheduler, surface);
                self.celebration = Some(celebration);
            }
        }
        Ok(())
    }

    fn ambient_settings(&self, star_count: usize) -> AmbientSettings {
        AmbientSettings {
            star_count,
            palette: self.config.starfield.color_hues.clone(),
            max_radius: self.config.ambient.max_radius,
            twinkle_chance: self.config.ambient.twinkle_chance,
        }
    }

    fn continue_button(&self, surface: &mut dyn RenderSurface) -> Button {
        let (w, h) = (surface.width(), surface.height());
        Button::layout(surface, &self.config.continue_button_text, 20.0, (12.0, 32.0), w / 2.0, h * 0.85)
    }

    /// "yes" to the left of centre, "no" to the right.
    fn proposal_buttons(&self, surface: &mut dyn RenderSurface) -> Option<(Button, Button)> {
        let model = &self.proposal.as_ref()?.model;
        let (cx, cy) = (surface.width() / 2.0, surface.height() / 2.0 + 60.0);

        let mut yes = Button::layout(
            surface,
            model.yes_text(),
            model.yes_font_px(),
            model.yes_padding(),
            cx,
            cy,
        );
        yes.rect.x = cx - yes.rect.w - 12.0;

        let mut no = Button::layout(
            surface,
            model.no_text(),
            model.no_font_px(),
            model.no_padding(),
            cx,
            cy,
        );
        no.rect.x = cx + 12.0;
        Some((yes, no))
    }

    fn draw_proposal(&self, surface: &mut dyn RenderSurface) {
        let Some(screen) = self.proposal.as_ref() else {
            return;
        };
        let (w, h) = (surface.width(), surface.height());
        let card = Rect::centered(w / 2.0, h / 2.0, (w * 0.9).min(560.0), 320.0);
        surface.set_paint(Paint::rgba(255, 255, 255, 0.08));
        surface.fill_rect(card.x, card.y, card.w, card.h);

        surface.set_font(30.0_f32.min(w / 20.0));
        surface.set_paint(Paint::rgb(TEXT_COLOR));
        text::draw_wrapped(surface, screen.model.question(), w / 2.0, card.y + 90.0, card.w * 0.85, 40.0);

        if let Some((yes, no)) = self.proposal_buttons(surface) {
            yes.draw(surface, Paint::rgba(220, 60, 120, 0.9));
            no.draw(surface, Paint::rgba(90, 90, 110, 0.9));
        }
    }
}
