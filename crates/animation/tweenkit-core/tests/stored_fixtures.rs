use tweenkit_core::{
    parse_stored_tween_json, Animated, DriverEvent, Easing, MoveDirection, PropertyKind,
    RotationAxis, Variant,
};

fn load(name: &str) -> tweenkit_core::StoredTween {
    let json = tweenkit_test_fixtures::tweens::json(name).expect("fixture should load");
    parse_stored_tween_json(&json).expect("fixture should validate")
}

#[test]
fn every_fixture_parses_and_validates() {
    for key in tweenkit_test_fixtures::tweens::keys() {
        let tween = load(&key);
        assert_eq!(tween.name, key);
    }
}

#[test]
fn pulse_alpha_loops_with_a_pause() {
    let tween = load("pulse-alpha");
    assert_eq!(tween.property, PropertyKind::Alpha);
    let cfg = &tween.config;
    assert_eq!(cfg.variant(), Variant::ComeBack);
    assert!(cfg.looping());
    assert_eq!(cfg.cycle_length_ms(), 1500);
    assert_eq!(cfg.easing(), &Easing::EaseInOut);

    let mut alpha = Animated::alpha(cfg);
    let mut drive = true;
    let mut starts = Vec::new();
    let mut now = 0.0;
    while now <= 3100.0 {
        for event in alpha.tick(cfg, drive, now).events {
            match event {
                DriverEvent::DriveRequested { drive: d, .. } => drive = d,
                DriverEvent::LegStarted {
                    leg: tweenkit_core::LegKind::Forward,
                    starts_at_ms,
                    ..
                } => starts.push(starts_at_ms),
                _ => {}
            }
        }
        now += 25.0;
    }
    assert_eq!(starts, vec![0.0, 1500.0, 3000.0]);
}

#[test]
fn nudge_right_waits_out_its_initial_delay() {
    let tween = load("nudge-right");
    assert_eq!(
        tween.property,
        PropertyKind::Move {
            direction: MoveDirection::Right
        }
    );
    let cfg = &tween.config;
    let mut nudge = Animated::movement(cfg, MoveDirection::Right);
    assert_eq!(nudge.tick(cfg, true, 0.0).output.start, 0.0);
    assert_eq!(nudge.tick(cfg, true, 499.0).output.start, 0.0);
    assert_eq!(nudge.tick(cfg, true, 1000.0).output.start, 16.0);
}

#[test]
fn flip_y_uses_an_overshooting_curve() {
    let tween = load("flip-y-eased");
    assert_eq!(
        tween.property,
        PropertyKind::Rotation {
            axis: RotationAxis::Y
        }
    );
    let cfg = &tween.config;
    assert!(matches!(cfg.easing(), Easing::CubicBezier { .. }));

    let mut flip = Animated::rotation(cfg, RotationAxis::Y);
    flip.tick(cfg, true, 0.0);
    let mut peak = 0.0_f32;
    let mut now = 0.0;
    while now < 800.0 {
        peak = peak.max(flip.tick(cfg, true, now).output.degrees);
        now += 10.0;
    }
    assert!(peak > 180.0, "curve should overshoot, peak {peak}");
    assert_eq!(flip.tick(cfg, true, 800.0).output.degrees, 180.0);
}

#[test]
fn grow_come_back_round_trips_once() {
    let tween = load("grow-come-back");
    let cfg = &tween.config;
    assert!(!cfg.looping());
    let mut grow = Animated::expand(cfg);
    let mut drive = true;
    let mut completed = 0;
    let mut now = 0.0;
    while now <= 2000.0 {
        for event in grow.tick(cfg, drive, now).events {
            match event {
                DriverEvent::DriveRequested { drive: d, .. } => drive = d,
                DriverEvent::CycleCompleted { .. } => completed += 1,
                _ => {}
            }
        }
        now += 10.0;
    }
    assert_eq!(completed, 1);
    assert_eq!(grow.output().0, 1.0);
}
