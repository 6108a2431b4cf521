use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";

pub const DEFAULT_PORT: u16 = 1883;

pub const DEFAULT_TOPIC: &str = "mai_iot/test/";

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

pub const KEEP_ALIVE: Duration = Duration::from_secs(60);

const CLIENT_ID_PREFIX: &str = "battery-telemetry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,

    pub port: u16,

    pub topic: String,

    pub interval: Duration,

    pub keep_alive: Duration,

    pub client_id: String,
}

impl Config {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        topic: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            topic: topic.into(),
            interval,
            keep_alive: KEEP_ALIVE,
            client_id: random_client_id(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOPIC, DEFAULT_INTERVAL)
    }
}

fn random_client_id() -> String {
    let suffix: u32 = rand::random();
    format!("{CLIENT_ID_PREFIX}-{suffix:08x}")
}
