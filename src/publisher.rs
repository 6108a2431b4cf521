use std::future::Future;

use anyhow::{Context as _, Result};
use tokio::time::sleep;
use tracing::info;

use crate::{battery::ReadingSource, config::Config};

/// Destination for encoded payloads.
pub trait Sink {
    fn publish(&mut self, topic: &str, payload: &str) -> impl Future<Output = Result<()>>;
}

pub struct Publisher<S, G> {
    config: Config,
    sink: S,
    readings: G,
}

impl<S: Sink, G: ReadingSource> Publisher<S, G> {
    pub fn new(config: Config, sink: S, readings: G) -> Self {
        Self {
            config,
            sink,
            readings,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates, encodes and publishes one reading. Returns the payload sent.
    pub async fn publish_next(&mut self) -> Result<String> {
        let reading = self.readings.next_reading();
        let payload = reading
            .to_payload()
            .context("failed to encode battery reading")?;

        self.sink
            .publish(&self.config.topic, &payload)
            .await
            .with_context(|| format!("failed to publish to topic: {}", self.config.topic))?;

        info!(topic = %self.config.topic, "published {payload}");

        Ok(payload)
    }

    /// Publishes every `config.interval` until `shutdown` resolves.
    ///
    /// The first publish failure ends the loop with that error.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("shutdown requested");
                    return Ok(());
                }
                result = self.tick() => result?,
            }
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    async fn tick(&mut self) -> Result<()> {
        self.publish_next().await?;

        // A zero interval still yields to the runtime here.
        sleep(self.config.interval).await;

        Ok(())
    }
}
