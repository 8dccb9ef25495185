use crate::scheduler::{TickHandle, TickScheduler};
use crate::surface::RenderSurface;

/// A frame-driven renderer that owns its own tick loop.
pub trait Engine {
    /// Begin ticking. A no-op when already running.
    fn start(&mut self, scheduler: &mut dyn TickScheduler, surface: &mut dyn RenderSurface);
    /// Cancel the pending tick and release the resize watch. Idempotent.
    fn stop(&mut self, scheduler: &mut dyn TickScheduler, surface: &mut dyn RenderSurface);
    /// Handle a fired tick. Returns `false` when the handle is not this
    /// engine's pending tick or the engine is no longer running.
    fn on_tick(
        &mut self,
        handle: TickHandle,
        scheduler: &mut dyn TickScheduler,
        surface: &mut dyn RenderSurface,
    ) -> bool;
    fn is_running(&self) -> bool;
}
