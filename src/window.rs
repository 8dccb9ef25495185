//! raylib backend: replays recorded frames into a window and turns
//! keyboard and mouse events into presentation input.

use std::ffi::CString;
use std::time::Instant;

use anyhow::{Context, Result};
use raylib::prelude::*;
use tracing::info;

use crate::config::ShowConfig;
use crate::constants::*;
use crate::presentation::{Input, Presentation};
use crate::surface::{DrawCommand, DrawList, Paint, approximate_metrics};

fn color(p: Paint) -> Color {
    Color::new(p.r, p.g, p.b, p.alpha_u8())
}

/// Width of `text` in raylib's default font. Only valid once the window is open.
pub fn default_font_width(text: &str, font_px: f32) -> f32 {
    let Ok(c_text) = CString::new(text) else {
        return approximate_metrics(text, font_px);
    };
    // The window (and with it the default font) exists for the whole
    // lifetime of the surface this is installed on.
    unsafe { raylib::ffi::MeasureText(c_text.as_ptr(), font_px.round() as i32) as f32 }
}

pub fn replay(d: &mut RaylibDrawHandle, commands: &[DrawCommand]) {
    let background = color(Paint::background());
    d.clear_background(background);

    for command in commands {
        match command {
            DrawCommand::Clear => d.clear_background(background),
            DrawCommand::FillRect { x, y, w, h, paint } => {
                d.draw_rectangle_rec(Rectangle::new(*x, *y, *w, *h), color(*paint));
            }
            DrawCommand::FillCircle { x, y, radius, paint } => {
                d.draw_circle_v(Vector2::new(*x, *y), *radius, color(*paint));
            }
            DrawCommand::Text { text, x, y, font_px, paint } => {
                // Surface text is placed by the line's vertical middle, raylib's by its top.
                let top = *y - *font_px / 2.0;
                d.draw_text(text, *x as i32, top as i32, font_px.round() as i32, color(*paint));
            }
        }
    }
}

fn collect_input(rl: &RaylibHandle) -> Vec<Input> {
    let mut inputs = Vec::new();
    if rl.is_key_pressed(KeyboardKey::KEY_ENTER) || rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
        inputs.push(Input::Confirm);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_Y) {
        inputs.push(Input::Accept);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_N) {
        inputs.push(Input::Reject);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
        inputs.push(Input::Left);
    }
    if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
        inputs.push(Input::Right);
    }

    let mouse = rl.get_mouse_position();
    if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
        inputs.push(Input::PointerDown { x: mouse.x, y: mouse.y });
    }
    if rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT) {
        inputs.push(Input::PointerUp { x: mouse.x, y: mouse.y });
    }
    inputs
}

pub fn run(config: ShowConfig) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH, RENDER_HEIGHT)
        .title("Starfield")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    let mut surface = DrawList::new(rl.get_screen_width() as f32, rl.get_screen_height() as f32)
        .with_metrics(default_font_width);
    let mut presentation =
        Presentation::new(config, &mut surface).context("failed to set up the presentation")?;
    let mut shown = presentation.screen();
    info!(screen = ?shown, "window open");

    // --- Main Loop ---
    while !rl.window_should_close() {
        let now = Instant::now();

        if rl.is_window_resized() {
            surface.host_resized(rl.get_screen_width() as f32, rl.get_screen_height() as f32);
        }
        for input in collect_input(&rl) {
            presentation.handle_input(input, &mut surface, now);
        }

        let status = presentation.frame(&mut surface, now)?;
        if status.screen != shown {
            info!(screen = ?status.screen, "now showing");
            shown = status.screen;
        }

        let commands = surface.take_commands();
        let mut d = rl.begin_drawing(&thread);
        replay(&mut d, &commands);
    }
    Ok(())
}
