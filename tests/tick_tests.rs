//! Tests for the fixed-interval tick handler driven through `FrameDriver::poll`.

use keybinder::controller::{ManualClock, ScriptedDevice};
use keybinder::input::codes::{KEY_A, KEY_SPACE};
use keybinder::{key, FrameDriver, InputSettings, Modifiers};
use std::cell::RefCell;
use std::rc::Rc;

fn driver() -> FrameDriver<ScriptedDevice, ManualClock> {
    FrameDriver::new(ScriptedDevice::new(), ManualClock::new())
}

fn count_ticks(
    driver: &mut FrameDriver<ScriptedDevice, ManualClock>,
    interval_ms: u64,
) -> Rc<RefCell<Vec<u64>>> {
    let runs = Rc::new(RefCell::new(Vec::new()));
    let log = runs.clone();
    driver.set_tick_handler(interval_ms, move |tick| log.borrow_mut().push(tick.tick()));
    runs
}

#[test]
fn test_fifty_ms_at_sixteen_runs_three_ticks() {
    let mut driver = driver();
    let runs = count_ticks(&mut driver, 16);

    driver.clock_mut().advance(50);
    driver.poll();

    assert_eq!(*runs.borrow(), vec![0, 1, 2]);
    assert_eq!(driver.tick_count(), 3);
    assert_eq!(driver.tick_accumulator_ms(), Some(2));
}

#[test]
fn test_short_frames_accumulate_until_an_interval_passes() {
    let mut driver = driver();
    let runs = count_ticks(&mut driver, 16);

    for _ in 0..3 {
        driver.clock_mut().advance(5);
        driver.poll();
    }
    assert!(runs.borrow().is_empty());
    assert_eq!(driver.tick_accumulator_ms(), Some(15));

    driver.clock_mut().advance(1);
    driver.poll();
    assert_eq!(runs.borrow().len(), 1);
    assert_eq!(driver.tick_accumulator_ms(), Some(0));
}

#[test]
fn test_no_handler_means_no_ticks() {
    let mut driver = driver();
    driver.clock_mut().advance(100);
    driver.poll();
    assert_eq!(driver.tick_count(), 0);
    assert_eq!(driver.tick_accumulator_ms(), None);
    assert_eq!(driver.delta_ms(), 100);
}

#[test]
fn test_replacing_handler_resets_accumulator() {
    let mut driver = driver();
    let first = count_ticks(&mut driver, 16);
    driver.clock_mut().advance(10);
    driver.poll();
    assert_eq!(driver.tick_accumulator_ms(), Some(10));

    let second = count_ticks(&mut driver, 16);
    assert_eq!(driver.tick_accumulator_ms(), Some(0));
    driver.clock_mut().advance(10);
    driver.poll();
    assert!(first.borrow().is_empty());
    assert!(second.borrow().is_empty());

    driver.clear_tick_handler();
    assert_eq!(driver.tick_accumulator_ms(), None);
}

#[test]
fn test_tick_sees_press_from_a_frame_without_a_tick() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut driver = driver();
    driver.bind(key(KEY_SPACE), "jump");

    let log = seen.clone();
    driver.set_tick_handler(16, move |tick| {
        log.borrow_mut()
            .push((tick.tick(), tick.triggered("jump", Modifiers::NONE)));
    });

    // press lands in a frame too short to run a tick
    driver.device_mut().press(key(KEY_SPACE));
    driver.clock_mut().advance(8);
    driver.poll();
    assert!(driver.triggered("jump", Modifiers::NONE));

    driver.clock_mut().advance(8);
    driver.poll();
    assert!(!driver.triggered("jump", Modifiers::NONE));

    driver.clock_mut().advance(16);
    driver.poll();

    assert_eq!(*seen.borrow(), vec![(0, true), (1, false)]);
}

#[test]
fn test_tick_edge_is_cleared_after_first_catch_up_run() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut driver = driver();

    let log = seen.clone();
    driver.set_tick_handler(10, move |tick| {
        log.borrow_mut()
            .push(tick.triggered(key(KEY_A), Modifiers::NONE));
    });

    driver.device_mut().press(key(KEY_A));
    driver.clock_mut().advance(30);
    driver.poll();

    assert_eq!(*seen.borrow(), vec![true, false, false]);
}

#[test]
fn test_triggered_once_inside_tick_scope() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut driver = driver();

    let log = seen.clone();
    driver.set_tick_handler(16, move |tick| {
        let first = tick.triggered_once(key(KEY_A), Modifiers::NONE);
        let second = tick.triggered_once(key(KEY_A), Modifiers::NONE);
        log.borrow_mut().push((first, second, tick.pressed(key(KEY_A), Modifiers::NONE)));
    });

    driver.device_mut().press(key(KEY_A));
    driver.clock_mut().advance(16);
    driver.poll();

    assert_eq!(*seen.borrow(), vec![(true, false, true)]);
    // the frame edge set is separate from the tick one
    assert!(driver.triggered(key(KEY_A), Modifiers::NONE));
}

#[test]
fn test_catch_up_cap_from_settings() {
    let settings = InputSettings {
        max_catch_up_ticks: Some(4),
        ..InputSettings::default()
    };
    let mut driver =
        FrameDriver::with_settings(ScriptedDevice::new(), ManualClock::new(), settings)
            .expect("settings are valid");
    let runs = count_ticks(&mut driver, 10);

    driver.clock_mut().advance(1_007);
    driver.poll();

    assert_eq!(runs.borrow().len(), 4);
    assert_eq!(driver.tick_accumulator_ms(), Some(7));

    driver.clock_mut().advance(10);
    driver.poll();
    assert_eq!(runs.borrow().len(), 5);
}

#[test]
fn test_fps_reports_after_a_window() {
    let mut driver = driver();
    assert_eq!(driver.fps(), 0.0);

    for _ in 0..100 {
        driver.clock_mut().advance(10);
        driver.poll();
    }

    assert_eq!(driver.frame_count(), 100);
    assert!((driver.fps() - 100.0).abs() < 1e-3);
}
