//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`AppEvent`] as one structured
//! `TAG | key=value ...` line through the `log` facade.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::Transition;

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { period, settings } => {
                info!(
                    "START | period={:.1}s | target_temp={:.1}\u{00b0}C target_humidity={:.1}% \
                     co2_limit={:.0}ppm min_airflow={:.1} recuperator_enabled={}",
                    period.as_secs_f32(),
                    settings.target_temp,
                    settings.target_humidity,
                    settings.co2_limit,
                    settings.min_airflow,
                    settings.recuperator_enabled,
                );
            }
            AppEvent::Cycle {
                cycle,
                reading,
                state,
            } => {
                info!(
                    "CYCLE | n={} | T={:.1}\u{00b0}C H={:.1}% CO2={:.0}ppm airflow={:.1} | \
                     heat={} cool={} humid={} fan={}% recup={}",
                    cycle,
                    reading.temperature,
                    reading.humidity,
                    reading.co2,
                    reading.airflow,
                    on_off(state.heating),
                    on_off(state.cooling),
                    on_off(state.humidifier),
                    state.fan_speed,
                    on_off(state.recuperator),
                );
            }
            AppEvent::ActuatorChanged(t) => match t {
                Transition::Heating {
                    on,
                    temperature,
                    target,
                } => info!(
                    "ACTUATOR | heating={} | T={:.1}\u{00b0}C target={:.1}\u{00b0}C",
                    on_off(*on),
                    temperature,
                    target
                ),
                Transition::Cooling {
                    on,
                    temperature,
                    threshold,
                } => info!(
                    "ACTUATOR | cooling={} | T={:.1}\u{00b0}C threshold={:.1}\u{00b0}C",
                    on_off(*on),
                    temperature,
                    threshold
                ),
                Transition::Humidifier {
                    on,
                    humidity,
                    target,
                } => info!(
                    "ACTUATOR | humidifier={} | H={:.1}% target={:.1}%",
                    on_off(*on),
                    humidity,
                    target
                ),
                Transition::Fan {
                    speed,
                    co2,
                    airflow,
                } => info!(
                    "ACTUATOR | fan={}% | CO2={:.0}ppm airflow={:.1}",
                    speed, co2, airflow
                ),
                Transition::Recuperator { on, temperature } => info!(
                    "ACTUATOR | recuperator={} | T={:.1}\u{00b0}C",
                    on_off(*on),
                    temperature
                ),
            },
            AppEvent::SensorDegraded => {
                warn!("SENSOR | degraded, substituting fallback readings");
            }
            AppEvent::SensorRecovered => {
                info!("SENSOR | recovered");
            }
            AppEvent::Stopped {
                cycles,
                settings_flushed,
            } => {
                info!(
                    "STOP | cycles={} | all actuators OFF | settings_flushed={}",
                    cycles, settings_flushed
                );
            }
        }
    }
}
