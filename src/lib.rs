//! Frame-driven starfield presentation: timed fading text over twinkling
//! stars, a proposal card and a photo carousel.

pub mod ambient;
pub mod carousel;
pub mod celebration;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod particles;
pub mod presentation;
pub mod proposal;
pub mod schedule;
pub mod scheduler;
pub mod screen;
pub mod starfield;
pub mod surface;
pub mod text;
#[cfg(feature = "window")]
pub mod window;

pub use config::ShowConfig;
pub use engine::Engine;
pub use error::{ShowError, ShowResult};
pub use presentation::{FrameStatus, Input, Presentation};
pub use screen::Screen;
pub use surface::{DrawList, RenderSurface};
