use std::time::Duration;

pub const RENDER_WIDTH: i32 = 1280;           // Initial window width
pub const RENDER_HEIGHT: i32 = 720;           // Initial window height
pub const FPS: u32 = 60;                      // Target display refresh
pub const FRAME_TIME: Duration = Duration::from_micros(1_000_000 / FPS as u64);

pub const BACKGROUND: (u8, u8, u8) = (0x0a, 0x0a, 0x1a);
pub const TEXT_COLOR: (u8, u8, u8) = (220, 200, 255);
pub const STAR_LIGHTNESS: f32 = 88.0;         // HSL lightness of every star, in percent

pub const FONT_MAX_PX: f32 = 28.0;
pub const FONT_WIDTH_DIVISOR: f32 = 26.0;     // font size = min(FONT_MAX_PX, width / divisor)
pub const WRAP_WIDTH_FRACTION: f32 = 0.85;    // wrapped text may use this share of the width
pub const LINE_SPACING_PX: f32 = 10.0;        // extra leading between wrapped lines
pub const FINAL_LINE_GAP_PX: f32 = 16.0;      // extra stride between final lines
pub const FINAL_BLOCK_LIFT_PX: f32 = 30.0;    // final lines start this far above centre

pub const SWIPE_THRESHOLD_PX: f32 = 40.0;
pub const VISIBLE_SLOT_RADIUS: i64 = 2;       // carousel slots -2..=2 are drawn

pub const TRANSITION_DELAY: Duration = Duration::from_millis(600);
pub const HEART_SPAWN_FRAMES: u64 = 24;       // 400 ms at 60 Hz
