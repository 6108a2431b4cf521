use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::battery::{BatteryReading, PERCENTAGE_RANGE, VOLTAGE_MV_RANGE};

/// Draws both fields uniformly from their inclusive ranges.
pub fn generate_reading<R: Rng + ?Sized>(rng: &mut R) -> BatteryReading {
    BatteryReading {
        battery_percentage: rng.gen_range(PERCENTAGE_RANGE),
        battery_voltage_mv: rng.gen_range(VOLTAGE_MV_RANGE),
    }
}

pub trait ReadingSource {
    fn next_reading(&mut self) -> BatteryReading;
}

#[derive(Debug, Clone)]
pub struct RandomReadings<R> {
    rng: R,
}

impl<R: Rng> RandomReadings<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomReadings<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReadingSource for RandomReadings<R> {
    fn next_reading(&mut self) -> BatteryReading {
        generate_reading(&mut self.rng)
    }
}
