//! Integration tests for the ControlLoop → SharedState → ConfigStore chain.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use ventcontrol::app::events::AppEvent;
use ventcontrol::app::ports::SensorPort;
use ventcontrol::app::service::{ControlLoop, LoopState, stop_channel};
use ventcontrol::app::shared::SharedState;
use ventcontrol::app::store::ConfigStore;
use ventcontrol::config::{Settings, SettingsPatch};
use ventcontrol::control::{ActuatorState, SensorReading};
use ventcontrol::sensors::hardware::{FALLBACK_READING, HardwareSensor, NoDevice};

use super::mock_hw::{MemConfigPort, RecordingSink, ScriptedSensor, reading};

const PERIOD: Duration = Duration::from_millis(5);

fn make_shared(port: &MemConfigPort) -> Arc<SharedState> {
    Arc::new(SharedState::new(ConfigStore::open(port.clone())))
}

fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
fn cold_stuffy_room_drives_heating_and_boost() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let mut ctl = ControlLoop::new(
        ScriptedSensor::constant(reading(18.0, 50.0, 900.0, 20.0)),
        RecordingSink::new(),
        Arc::clone(&shared),
        PERIOD,
    );

    ctl.tick();

    assert_eq!(
        shared.actuators(),
        ActuatorState {
            heating: true,
            cooling: false,
            humidifier: false,
            fan_speed: 100,
            recuperator: true,
        }
    );
}

#[test]
fn patch_applies_from_the_next_cycle() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let mut ctl = ControlLoop::new(
        ScriptedSensor::constant(reading(22.0, 50.0, 900.0, 40.0)),
        RecordingSink::new(),
        Arc::clone(&shared),
        PERIOD,
    );

    ctl.tick();
    assert_eq!(shared.actuators().fan_speed, 100);

    let patch = SettingsPatch::from_json(br#"{"co2_limit": 1000}"#).unwrap();
    shared.config().apply_patch(&patch).unwrap();
    assert_eq!(port.stored().unwrap().co2_limit, 1000.0);

    ctl.tick();
    assert_eq!(shared.actuators().fan_speed, 50);
}

#[test]
fn heating_holds_through_the_dead_band_across_cycles() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let sensor = ScriptedSensor::new([
        reading(20.0, 50.0, 600.0, 40.0), // below 21.0 → on
        reading(21.8, 50.0, 600.0, 40.0), // dead band → hold on
        reading(22.6, 50.0, 600.0, 40.0), // above 22.5 → off
        reading(21.8, 50.0, 600.0, 40.0), // dead band → hold off
    ]);
    let mut ctl = ControlLoop::new(sensor, RecordingSink::new(), Arc::clone(&shared), PERIOD);

    let mut seen = Vec::new();
    for _ in 0..4 {
        ctl.tick();
        seen.push(shared.actuators().heating);
    }
    assert_eq!(seen, [true, true, false, false]);
}

#[test]
fn stop_signal_runs_cleanup_on_loop_thread() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let sink = RecordingSink::new();
    let mut ctl = ControlLoop::new(
        ScriptedSensor::constant(reading(26.0, 40.0, 950.0, 20.0)),
        sink.clone(),
        Arc::clone(&shared),
        PERIOD,
    );
    let (stop, signal) = stop_channel();

    let handle = thread::spawn(move || {
        ctl.run(&signal);
        ctl.state()
    });

    assert!(
        wait_until(Duration::from_secs(5), || shared.health().cycles >= 3),
        "loop should complete a few cycles"
    );
    assert_ne!(shared.actuators(), ActuatorState::all_off());
    assert!(shared.health().running);

    stop.stop();
    let final_state = handle.join().unwrap();

    assert_eq!(final_state, LoopState::Stopped);
    assert_eq!(shared.actuators(), ActuatorState::all_off());
    assert!(!shared.health().running);
    assert_eq!(port.stored(), Some(Settings::default()), "final flush");

    let events = sink.events();
    assert!(matches!(events.first(), Some(AppEvent::Started { .. })));
    assert!(matches!(
        events.last(),
        Some(AppEvent::Stopped {
            settings_flushed: true,
            ..
        })
    ));
}

#[test]
fn failed_final_flush_still_turns_everything_off() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let sink = RecordingSink::new();
    let mut ctl = ControlLoop::new(
        ScriptedSensor::constant(reading(18.0, 30.0, 900.0, 20.0)),
        sink.clone(),
        Arc::clone(&shared),
        PERIOD,
    );
    ctl.tick();
    port.fail_saves.store(true, Ordering::SeqCst);

    ctl.shutdown();

    assert_eq!(shared.actuators(), ActuatorState::all_off());
    assert!(shared.config().persist_pending());
    assert!(matches!(
        sink.events().last(),
        Some(AppEvent::Stopped {
            settings_flushed: false,
            ..
        })
    ));
}

#[test]
fn concurrent_patches_and_cycles_stay_consistent() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let mut ctl = ControlLoop::new(
        ScriptedSensor::constant(reading(22.0, 50.0, 900.0, 40.0)),
        RecordingSink::new(),
        Arc::clone(&shared),
        Duration::from_millis(1),
    );
    let (stop, signal) = stop_channel();
    let loop_thread = thread::spawn(move || ctl.run(&signal));

    let patchers: Vec<_> = (0..4)
        .map(|i| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for j in 0..50 {
                    let limit = 850.0 + f32::from((i * 50 + j) as u16 % 200);
                    let patch = SettingsPatch {
                        co2_limit: Some(limit),
                        ..SettingsPatch::default()
                    };
                    shared.config().apply_patch(&patch).unwrap();
                    let snap = shared.snapshot();
                    assert!(matches!(snap.state.fan_speed, 0 | 50 | 100));
                    assert!(snap.settings.validate().is_ok());
                }
            })
        })
        .collect();
    for p in patchers {
        p.join().unwrap();
    }

    stop.stop();
    loop_thread.join().unwrap();

    // The stored document is the last value the store accepted.
    assert_eq!(port.stored(), Some(shared.settings()));
    assert_eq!(shared.actuators(), ActuatorState::all_off());
}

#[test]
fn missing_device_reports_degraded_and_uses_fallback() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let sink = RecordingSink::new();
    let mut ctl = ControlLoop::new(
        HardwareSensor::new(NoDevice),
        sink.clone(),
        Arc::clone(&shared),
        PERIOD,
    );

    ctl.tick();
    ctl.tick();

    assert_eq!(shared.reading(), FALLBACK_READING);
    assert!(shared.health().sensor_degraded);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::SensorDegraded)),
        1,
        "degradation is reported on the edge only"
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Cycle { .. })), 2);
}

/// Succeeds a fixed number of times, then panics like a faulty driver.
struct PanickingSensor {
    remaining: u32,
}

impl SensorPort for PanickingSensor {
    fn read(&mut self) -> SensorReading {
        if self.remaining == 0 {
            panic!("sensor driver fault");
        }
        self.remaining -= 1;
        reading(18.0, 30.0, 900.0, 20.0)
    }
}

#[test]
fn panic_on_loop_thread_still_runs_cleanup() {
    let port = MemConfigPort::new();
    let shared = make_shared(&port);
    let sink = RecordingSink::new();
    let mut ctl = ControlLoop::new(
        PanickingSensor { remaining: 2 },
        sink.clone(),
        Arc::clone(&shared),
        Duration::from_millis(1),
    );
    let (_stop, signal) = stop_channel();

    let outcome = thread::spawn(move || ctl.run(&signal)).join();

    assert!(outcome.is_err(), "loop thread should have panicked");
    assert_eq!(shared.actuators(), ActuatorState::all_off());
    assert!(!shared.health().running);
    assert_eq!(shared.health().cycles, 2);
    assert_eq!(port.stored(), Some(Settings::default()));
    assert!(matches!(
        sink.events().last(),
        Some(AppEvent::Stopped {
            cycles: 2,
            settings_flushed: true,
        })
    ));
}
