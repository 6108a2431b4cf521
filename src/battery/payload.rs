use std::io;

use anyhow::{Context as _, Result};
use serde::Serialize as _;
use serde_json::ser::{Formatter, Serializer};

use crate::battery::BatteryReading;

/// JSON formatter that separates members with `", "` and keys from values
/// with `": "`, so payloads read `{"a": 1, "b": 2}`.
#[derive(Debug, Clone, Copy, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

impl BatteryReading {
    pub fn to_payload(&self) -> Result<String> {
        let mut buf = Vec::with_capacity(64);
        let mut serializer = Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)
            .context("failed to serialize battery reading")?;

        String::from_utf8(buf).context("serialized battery reading is not valid UTF-8")
    }

    pub fn from_payload(payload: &str) -> Result<Self> {
        let reading: BatteryReading = serde_json::from_str(payload)
            .with_context(|| format!("failed to parse battery reading: {payload}"))?;

        reading
            .validate()
            .with_context(|| format!("invalid battery reading: {payload}"))?;

        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, Value};

    use super::*;

    #[test]
    fn payload_matches_wire_format() {
        let reading = BatteryReading {
            battery_percentage: 42,
            battery_voltage_mv: 3700,
        };

        assert_eq!(
            reading.to_payload().unwrap(),
            r#"{"battery_percentage": 42, "battery_voltage_mv": 3700}"#
        );
    }

    #[test]
    fn payload_has_exactly_two_integer_keys() {
        let payload = BatteryReading {
            battery_percentage: 0,
            battery_voltage_mv: 4200,
        }
        .to_payload()
        .unwrap();

        let object: Map<String, Value> = serde_json::from_str(&payload).unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(object["battery_percentage"], Value::from(0));
        assert_eq!(object["battery_voltage_mv"], Value::from(4200));
    }

    #[test]
    fn parses_compact_payload() {
        let reading =
            BatteryReading::from_payload(r#"{"battery_voltage_mv":3001,"battery_percentage":7}"#)
                .unwrap();

        assert_eq!(
            reading,
            BatteryReading {
                battery_percentage: 7,
                battery_voltage_mv: 3001,
            }
        );
    }

    #[test]
    fn rejects_malformed_payloads() {
        let payloads = [
            r#"{"battery_percentage": 42}"#,
            r#"{"battery_percentage": 42, "battery_voltage_mv": 3700, "extra": 1}"#,
            r#"{"battery_percentage": 142, "battery_voltage_mv": 3700}"#,
            r#"{"battery_percentage": 42, "battery_voltage_mv": 5000}"#,
            r#"{"battery_percentage": 4.2, "battery_voltage_mv": 3700}"#,
            r#"{"battery_percentage": "42", "battery_voltage_mv": 3700}"#,
            "not json",
        ];

        for payload in payloads {
            assert!(
                BatteryReading::from_payload(payload).is_err(),
                "accepted {payload}"
            );
        }
    }
}
