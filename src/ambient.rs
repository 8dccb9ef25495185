//! Decorative background stars for the later screens. No text, no
//! schedule; each screen owns its own instance.

use rand::rngs::StdRng;
use tracing::debug;

use crate::engine::Engine;
use crate::particles::{Bounds, ParticleField};
use crate::scheduler::{TickHandle, TickScheduler};
use crate::surface::{RenderSurface, ResizeWatch};

#[derive(Clone, Debug, PartialEq)]
pub struct AmbientSettings {
    pub star_count: usize,
    pub palette: Vec<f32>,
    pub max_radius: f32,
    pub twinkle_chance: f64,
}

pub struct AmbientField {
    settings: AmbientSettings,
    bounds: Bounds,
    field: ParticleField,
    rng: StdRng,
    running: bool,
    pending: Option<TickHandle>,
    resize_watch: Option<ResizeWatch>,
}

impl AmbientField {
    /// Scatter stars over the surface's current region.
    pub fn init(surface: &dyn RenderSurface, settings: AmbientSettings, mut rng: StdRng) -> Self {
        let bounds = Bounds::of(surface);
        let field = scatter(&mut rng, bounds, &settings);
        Self {
            settings,
            bounds,
            field,
            rng,
            running: false,
            pending: None,
            resize_watch: None,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn advance_frame(&mut self, surface: &mut dyn RenderSurface) {
        surface.clear();
        self.field.tick(&mut self.rng, self.settings.twinkle_chance);
        self.field.render(surface);
    }
}

fn scatter(rng: &mut StdRng, bounds: Bounds, settings: &AmbientSettings) -> ParticleField {
    ParticleField::initialize(
        rng,
        bounds,
        settings.star_count,
        &settings.palette,
        settings.max_radius,
    )
}

impl Engine for AmbientField {
    fn start(&mut self, scheduler: &mut dyn TickScheduler, surface: &mut dyn RenderSurface) {
        if self.running {
            return;
        }
        self.running = true;
        self.resize_watch = Some(surface.watch_resize());
        // Watching may have picked up a size the host reported earlier.
        let bounds = Bounds::of(surface);
        if bounds != self.bounds {
            debug!(width = bounds.width, height = bounds.height, "ambient field rescattered");
            self.field = scatter(&mut self.rng, bounds, &self.settings);
            self.bounds = bounds;
        }
        self.pending = Some(scheduler.request_tick());
        debug!(stars = self.field.len(), "ambient field started");
    }

    fn stop(&mut self, scheduler: &mut dyn TickScheduler, surface: &mut dyn RenderSurface) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_tick(handle);
        }
        if let Some(watch) = self.resize_watch.take() {
            surface.unwatch_resize(watch);
        }
        if self.running {
            debug!("ambient field stopped");
            self.running = false;
        }
    }

    fn on_tick(
        &mut self,
        handle: TickHandle,
        scheduler: &mut dyn TickScheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        if !self.running || self.pending != Some(handle) {
            return false;
        }
        self.advance_frame(surface);
        self.pending = Some(scheduler.request_tick());
        true
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
