use std::ops::RangeInclusive;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const PERCENTAGE_RANGE: RangeInclusive<u8> = 0..=100;

pub const VOLTAGE_MV_RANGE: RangeInclusive<u16> = 3000..=4200;

/// A single synthetic battery sample.
///
/// Field order is the order of the keys on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryReading {
    pub battery_percentage: u8,

    pub battery_voltage_mv: u16,
}

impl BatteryReading {
    pub fn validate(&self) -> Result<()> {
        if !PERCENTAGE_RANGE.contains(&self.battery_percentage) {
            bail!(
                "battery percentage out of range: expected {}-{}, got {}",
                PERCENTAGE_RANGE.start(),
                PERCENTAGE_RANGE.end(),
                self.battery_percentage
            );
        }

        if !VOLTAGE_MV_RANGE.contains(&self.battery_voltage_mv) {
            bail!(
                "battery voltage out of range: expected {}-{} mV, got {}",
                VOLTAGE_MV_RANGE.start(),
                VOLTAGE_MV_RANGE.end(),
                self.battery_voltage_mv
            );
        }

        Ok(())
    }
}
