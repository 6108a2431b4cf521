use std::time::Duration;

use battery_telemetry::config::{Config, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOPIC};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Publishes synthetic battery telemetry to an MQTT broker")]
pub struct Args {
    #[arg(long, env = "MQTT_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "MQTT_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "MQTT_TOPIC", default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Seconds between publishes
    #[arg(long, env = "PUBLISH_INTERVAL", default_value_t = 1)]
    pub interval: u64,
}

impl Args {
    pub fn into_config(self) -> Config {
        Config::new(
            self.host,
            self.port,
            self.topic,
            Duration::from_secs(self.interval),
        )
    }
}
