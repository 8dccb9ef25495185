use rand::SeedableRng;
use rand::rngs::StdRng;

use starfield::scheduler::{FrameScheduler, TickScheduler};
use starfield::starfield::Starfield;
use starfield::surface::DrawCommand;
use starfield::{DrawList, Engine, RenderSurface, ShowConfig};

fn config(phase: u64) -> ShowConfig {
    let mut c = ShowConfig::default();
    c.partner_name = "Aria".into();
    c.messages = vec!["alpha".into(), "beta".into(), "gamma".into()];
    c.final_lines = vec!["Love you {name}".into(), "again".into()];
    c.starfield.frame_duration = phase;
    c.starfield.star_count = 25;
    c
}

#[test]
fn reveal_is_asserted_exactly_from_the_continue_frame() {
    let mut surface = DrawList::new(640.0, 480.0);
    let mut sf = Starfield::with_rng(&surface, &config(6), StdRng::seed_from_u64(11)).unwrap();
    let continue_frame = sf.schedule().continue_frame;
    // 3 messages * 12 frames, then two final lines 6 apart, then one phase
    assert_eq!(continue_frame, 37 + 6 + 6);

    for _ in 0..continue_frame + 20 {
        let report = sf.advance_frame(&mut surface);
        assert_eq!(report.reveal, report.frame >= continue_frame);
    }
}

#[test]
fn every_frame_clears_then_paints_background_then_stars() {
    let mut surface = DrawList::new(640.0, 480.0);
    let mut sf = Starfield::with_rng(&surface, &config(6), StdRng::seed_from_u64(11)).unwrap();
    sf.advance_frame(&mut surface);

    let commands = surface.commands();
    assert_eq!(commands[0], DrawCommand::Clear);
    assert!(matches!(commands[1], DrawCommand::FillRect { w, h, .. } if w == 640.0 && h == 480.0));
    let discs = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
        .count();
    assert_eq!(discs, 25);
}

#[test]
fn final_lines_stack_below_each_other() {
    let mut surface = DrawList::new(640.0, 480.0);
    let mut sf = Starfield::with_rng(&surface, &config(6), StdRng::seed_from_u64(11)).unwrap();
    for _ in 0..=sf.schedule().continue_frame {
        sf.advance_frame(&mut surface);
    }
    let ys: Vec<f32> = surface
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { y, .. } => Some(*y),
            _ => None,
        })
        .collect();
    assert_eq!(ys.len(), 2);
    let font = (640.0_f32 / 26.0).min(28.0);
    assert!((ys[1] - ys[0] - (font + 16.0)).abs() < 1e-3);
}

#[test]
fn long_messages_wrap_on_narrow_surfaces() {
    let mut c = config(4);
    c.messages = vec!["Amongst trillions and trillions of stars, over billions of years".into()];
    let mut surface = DrawList::new(260.0, 480.0);
    let mut sf = Starfield::with_rng(&surface, &c, StdRng::seed_from_u64(1)).unwrap();
    for _ in 0..=4 {
        sf.advance_frame(&mut surface);
    }
    let lines: Vec<String> = surface.texts().map(|(t, _)| t.to_string()).collect();
    assert!(lines.len() > 1);
    assert_eq!(lines.join(" "), c.messages[0]);
    let max = 260.0 * 0.85;
    for line in &lines {
        if line.contains(' ') {
            assert!(surface.measure_text_width(line) <= max, "{line}");
        }
    }
}

#[test]
fn scheduler_drives_the_engine_one_frame_per_refresh() {
    let mut surface = DrawList::new(640.0, 480.0);
    let mut scheduler = FrameScheduler::new();
    let mut sf = Starfield::with_rng(&surface, &config(6), StdRng::seed_from_u64(2)).unwrap();
    sf.start(&mut scheduler, &mut surface);

    for refresh in 1..=30 {
        let due = scheduler.take_due();
        assert_eq!(due.len(), 1);
        for handle in due {
            sf.on_tick(handle, &mut scheduler, &mut surface);
        }
        assert_eq!(sf.frame(), refresh);
    }

    let stale = scheduler.request_tick();
    sf.stop(&mut scheduler, &mut surface);
    assert!(!sf.on_tick(stale, &mut scheduler, &mut surface));
    assert_eq!(sf.frame(), 30);
}
