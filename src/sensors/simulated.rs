//! Noise-generating sensor simulator.
//!
//! Each reading is drawn independently:
//!
//! | Quantity    | Nominal | Offset range (inclusive) |
//! |-------------|---------|--------------------------|
//! | temperature | 20.0 °C | -2.0 .. +5.0             |
//! | humidity    | 45.0 %  | -10.0 .. +10.0           |
//! | co2         | 600 ppm | -100 .. +300 (whole ppm) |
//! | airflow     | 40.0    | -5.0 .. +10.0            |
//!
//! The ranges are part of the contract; tests rely on them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::SensorPort;
use crate::control::SensorReading;

pub const TEMPERATURE_NOMINAL: f32 = 20.0;
pub const HUMIDITY_NOMINAL: f32 = 45.0;
pub const CO2_NOMINAL: f32 = 600.0;
pub const AIRFLOW_NOMINAL: f32 = 40.0;

pub struct SimulatedSensor<R = StdRng> {
    rng: R,
}

impl SimulatedSensor<StdRng> {
    /// Simulator seeded from the OS entropy source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible simulator.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimulatedSensor<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SimulatedSensor<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SensorPort for SimulatedSensor<R> {
    fn read(&mut self) -> SensorReading {
        SensorReading {
            temperature: TEMPERATURE_NOMINAL + self.rng.gen_range(-2.0f32..=5.0),
            humidity: HUMIDITY_NOMINAL + self.rng.gen_range(-10.0f32..=10.0),
            co2: CO2_NOMINAL + self.rng.gen_range(-100i32..=300) as f32,
            airflow: AIRFLOW_NOMINAL + self.rng.gen_range(-5.0f32..=10.0),
        }
    }
}
