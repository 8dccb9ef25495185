use std::time::{Duration, Instant};

use starfield::constants::TRANSITION_DELAY;
use starfield::{DrawList, Input, Presentation, RenderSurface, Screen, ShowConfig};

fn config() -> ShowConfig {
    let mut c = ShowConfig::default();
    c.seed = Some(42);
    c.partner_name = "Aria".into();
    c.messages = vec!["one".into(), "two".into()];
    c.final_lines = vec!["Love you {name}".into(), "always".into()];
    c.starfield.frame_duration = 4;
    c.starfield.star_count = 50;
    c
}

/// Run frames at `now` until `done` holds, with an upper bound.
fn run_until(
    p: &mut Presentation,
    surface: &mut DrawList,
    now: Instant,
    mut done: impl FnMut(&Presentation) -> bool,
) {
    for _ in 0..1000 {
        if done(p) {
            return;
        }
        p.frame(surface, now).unwrap();
    }
    panic!("condition never reached");
}

#[test]
fn walks_through_all_three_screens() {
    let mut surface = DrawList::new(1024.0, 768.0);
    let mut p = Presentation::new(config(), &mut surface).unwrap();
    let t0 = Instant::now();

    run_until(&mut p, &mut surface, t0, |p| p.status().continue_visible);
    assert!(surface.texts().any(|(t, _)| t == "Love you Aria"));

    p.handle_input(Input::Confirm, &mut surface, t0);
    let t1 = t0 + TRANSITION_DELAY;
    p.frame(&mut surface, t1).unwrap();
    assert_eq!(p.screen(), Screen::Proposal);
    assert!(surface.texts().any(|(t, _)| t == "Will you be my Valentine?"));

    p.handle_input(Input::Reject, &mut surface, t1);
    p.handle_input(Input::Reject, &mut surface, t1);
    assert_eq!(p.rejections(), 2);
    p.frame(&mut surface, t1).unwrap();
    assert!(surface.texts().any(|(t, _)| t == "Think again..."));

    p.handle_input(Input::Accept, &mut surface, t1);
    let t2 = t1 + TRANSITION_DELAY;
    p.frame(&mut surface, t2).unwrap();
    assert_eq!(p.screen(), Screen::Celebration);

    p.handle_input(Input::Right, &mut surface, t2);
    p.handle_input(Input::Right, &mut surface, t2);
    p.handle_input(Input::Left, &mut surface, t2);
    let carousel = p.celebration().unwrap().carousel();
    assert_eq!(carousel.current_index(), 1);
}

#[test]
fn input_during_a_transition_is_ignored() {
    let mut surface = DrawList::new(1024.0, 768.0);
    let mut p = Presentation::new(config(), &mut surface).unwrap();
    let t0 = Instant::now();
    run_until(&mut p, &mut surface, t0, |p| p.status().continue_visible);

    p.handle_input(Input::Confirm, &mut surface, t0);
    p.handle_input(Input::Accept, &mut surface, t0);
    p.frame(&mut surface, t0 + Duration::from_millis(100)).unwrap();
    assert_eq!(p.screen(), Screen::Starfield);

    p.frame(&mut surface, t0 + TRANSITION_DELAY).unwrap();
    assert_eq!(p.screen(), Screen::Proposal);
    assert_eq!(p.rejections(), 0);
}

#[test]
fn resize_follows_only_while_an_engine_watches() {
    let mut surface = DrawList::new(800.0, 600.0);
    let mut p = Presentation::new(config(), &mut surface).unwrap();
    let t0 = Instant::now();
    p.frame(&mut surface, t0).unwrap();

    let before: Vec<(f32, f32)> = p.starfield().field().particles().iter().map(|s| (s.x, s.y)).collect();
    assert!(surface.host_resized(1600.0, 900.0));
    p.frame(&mut surface, t0).unwrap();
    assert_eq!(surface.width(), 1600.0);
    let after: Vec<(f32, f32)> = p.starfield().field().particles().iter().map(|s| (s.x, s.y)).collect();
    assert_eq!(before, after);

    run_until(&mut p, &mut surface, t0, |p| p.status().continue_visible);
    p.handle_input(Input::Confirm, &mut surface, t0);
    assert!(!surface.host_resized(640.0, 480.0));
    assert_eq!(surface.width(), 1600.0);
}

#[test]
fn resize_during_a_transition_reaches_the_next_screen() {
    let mut surface = DrawList::new(800.0, 600.0);
    let mut p = Presentation::new(config(), &mut surface).unwrap();
    let t0 = Instant::now();
    run_until(&mut p, &mut surface, t0, |p| p.status().continue_visible);

    p.handle_input(Input::Confirm, &mut surface, t0);
    assert!(!surface.host_resized(1600.0, 900.0));
    assert_eq!(surface.width(), 800.0);

    p.frame(&mut surface, t0 + TRANSITION_DELAY).unwrap();
    assert_eq!(p.screen(), Screen::Proposal);
    assert_eq!((surface.width(), surface.height()), (1600.0, 900.0));
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let mut surface = DrawList::new(800.0, 600.0);
    let mut c = config();
    c.final_lines.clear();
    assert!(Presentation::new(c, &mut surface).is_err());

    let mut blind = DrawList::new(800.0, 600.0).without_text_metrics();
    let err = Presentation::new(config(), &mut blind).err().unwrap();
    assert!(err.to_string().starts_with("surface unavailable"));
}
