use std::time::Duration;

use bevy::prelude::*;
use bevy_tweenkit::{ClockSource, TweenClock, TweenkitPlugin};

#[test]
fn plugin_inserts_clock_resource() {
    let mut app = App::new();
    // it should insert TweenClock when the plugin is added
    app.add_plugins(MinimalPlugins).add_plugins(TweenkitPlugin);

    let clock = app.world().get_resource::<TweenClock>().unwrap();
    assert_eq!(clock.source, ClockSource::Time);
    assert_eq!(clock.now_ms, 0.0);
}

/// it should accumulate Bevy's frame delta into the clock
#[test]
fn time_source_accumulates_delta() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(TweenkitPlugin);

    for _ in 0..3 {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(100));
        app.world_mut().run_schedule(Update);
    }

    let clock = app.world().resource::<TweenClock>();
    assert!((clock.now_ms - 300.0).abs() < 1e-6, "clock at {}", clock.now_ms);
}

/// it should leave a manual clock alone
#[test]
fn manual_source_ignores_delta() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(TweenkitPlugin);
    app.insert_resource(TweenClock::manual());

    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(100));
    app.world_mut().run_schedule(Update);

    assert_eq!(app.world().resource::<TweenClock>().now_ms, 0.0);
}
