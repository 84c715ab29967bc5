//! Decision engine.
//!
//! Maps (reading, settings, previous actuator state) to the next actuator
//! state. Five independent rules, each owning exactly one actuator field:
//!
//! | Actuator    | On                          | Off                         | Between |
//! |-------------|-----------------------------|-----------------------------|---------|
//! | heating     | `t < target_temp - 1.0`     | `t > target_temp + 0.5`     | hold    |
//! | cooling     | `t > target_temp + 3.0`     | otherwise                   | —       |
//! | humidifier  | `h < target_humidity - 5.0` | `h > target_humidity + 3.0` | hold    |
//! | fan         | 100 % if `co2 > co2_limit` or `airflow < min_airflow`, else 50 % | | — |
//! | recuperator | `recuperator_enabled && t > 5.0` | otherwise              | —       |
//!
//! Cooling has no dead-band and the fan has only two speeds. Both are
//! deliberate and must not be "fixed" here.
//!
//! No I/O happens in this module. Changes are returned as [`Transition`]s
//! and the control loop decides how to report them.

use crate::config::Settings;

use super::state::{ActuatorState, SensorReading, Transition};

pub const HEATING_ON_BELOW: f32 = 1.0;
pub const HEATING_OFF_ABOVE: f32 = 0.5;
pub const COOLING_ON_ABOVE: f32 = 3.0;
pub const HUMIDIFIER_ON_BELOW: f32 = 5.0;
pub const HUMIDIFIER_OFF_ABOVE: f32 = 3.0;
/// Outdoor-side temperature below which heat recovery is bypassed (°C).
pub const RECUPERATOR_MIN_TEMP: f32 = 5.0;

pub const FAN_NORMAL: u8 = 50;
pub const FAN_BOOST: u8 = 100;

/// Output of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub state: ActuatorState,
    /// One entry per actuator whose value changed, in rule order.
    pub transitions: Vec<Transition>,
}

/// Two-threshold switch: on below `on_below`, off above `off_above`,
/// unchanged in between.
fn dead_band(value: f32, on_below: f32, off_above: f32, previous: bool) -> bool {
    if value < on_below {
        true
    } else if value > off_above {
        false
    } else {
        previous
    }
}

pub fn heating(temperature: f32, target_temp: f32, previous: bool) -> bool {
    dead_band(
        temperature,
        target_temp - HEATING_ON_BELOW,
        target_temp + HEATING_OFF_ABOVE,
        previous,
    )
}

pub fn cooling(temperature: f32, target_temp: f32) -> bool {
    temperature > target_temp + COOLING_ON_ABOVE
}

pub fn humidifier(humidity: f32, target_humidity: f32, previous: bool) -> bool {
    dead_band(
        humidity,
        target_humidity - HUMIDIFIER_ON_BELOW,
        target_humidity + HUMIDIFIER_OFF_ABOVE,
        previous,
    )
}

pub fn fan_speed(co2: f32, airflow: f32, co2_limit: f32, min_airflow: f32) -> u8 {
    if co2 > co2_limit || airflow < min_airflow {
        FAN_BOOST
    } else {
        FAN_NORMAL
    }
}

pub fn recuperator(temperature: f32, enabled: bool) -> bool {
    enabled && temperature > RECUPERATOR_MIN_TEMP
}

/// Evaluate all five rules.
pub fn decide(reading: &SensorReading, settings: &Settings, previous: &ActuatorState) -> Decision {
    let state = ActuatorState {
        heating: heating(reading.temperature, settings.target_temp, previous.heating),
        cooling: cooling(reading.temperature, settings.target_temp),
        humidifier: humidifier(
            reading.humidity,
            settings.target_humidity,
            previous.humidifier,
        ),
        fan_speed: fan_speed(
            reading.co2,
            reading.airflow,
            settings.co2_limit,
            settings.min_airflow,
        ),
        recuperator: recuperator(reading.temperature, settings.recuperator_enabled),
    };

    let mut transitions = Vec::new();
    if state.heating != previous.heating {
        transitions.push(Transition::Heating {
            on: state.heating,
            temperature: reading.temperature,
            target: settings.target_temp,
        });
    }
    if state.cooling != previous.cooling {
        transitions.push(Transition::Cooling {
            on: state.cooling,
            temperature: reading.temperature,
            threshold: settings.target_temp + COOLING_ON_ABOVE,
        });
    }
    if state.humidifier != previous.humidifier {
        transitions.push(Transition::Humidifier {
            on: state.humidifier,
            humidity: reading.humidity,
            target: settings.target_humidity,
        });
    }
    if state.fan_speed != previous.fan_speed {
        transitions.push(Transition::Fan {
            speed: state.fan_speed,
            co2: reading.co2,
            airflow: reading.airflow,
        });
    }
    if state.recuperator != previous.recuperator {
        transitions.push(Transition::Recuperator {
            on: state.recuperator,
            temperature: reading.temperature,
        });
    }

    Decision { state, transitions }
}
