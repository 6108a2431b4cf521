use std::time::Duration;

use anyhow::{Context as _, Result, anyhow, bail};
use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Outgoing,
    Packet, QoS,
};
use tokio::{
    sync::oneshot::{self, error::TryRecvError},
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::{config::Config, publisher::Sink};

const REQUEST_CHANNEL_CAPACITY: usize = 10;

const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// An open MQTT session. Publishes at QoS 0, never retained.
///
/// A background task polls the `rumqttc` event loop; the first connection
/// error it sees ends the task and fails the next publish.
pub struct MqttSink {
    client: AsyncClient,
    failure: oneshot::Receiver<ConnectionError>,
    driver: JoinHandle<()>,
}

/// Connects to the broker and waits for its CONNACK. Does not retry.
pub async fn connect(config: &Config) -> Result<MqttSink> {
    let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
    options.set_keep_alive(config.keep_alive);

    let (client, mut event_loop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);

    wait_for_connack(&mut event_loop).await.with_context(|| {
        format!(
            "failed to connect to MQTT broker: {}:{}",
            config.host, config.port
        )
    })?;

    info!(
        client_id = %config.client_id,
        "connected to MQTT broker: {}:{}", config.host, config.port
    );

    let (failure_tx, failure) = oneshot::channel();
    let driver = tokio::spawn(drive_event_loop(event_loop, failure_tx));

    Ok(MqttSink {
        client,
        failure,
        driver,
    })
}

impl MqttSink {
    /// Sends DISCONNECT and waits briefly for the event loop to flush it.
    pub async fn disconnect(self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .context("failed to request MQTT disconnect")?;

        match timeout(DISCONNECT_TIMEOUT, self.driver).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(anyhow!("MQTT event loop task failed: {err}")),
            Err(_) => bail!("timed out waiting for MQTT disconnect"),
        }
    }
}

impl Sink for MqttSink {
    async fn publish(&mut self, topic: &str, payload: &str) -> Result<()> {
        match self.failure.try_recv() {
            Ok(err) => return Err(anyhow!("MQTT connection lost: {err}")),
            Err(TryRecvError::Closed) => bail!("MQTT connection lost"),
            Err(TryRecvError::Empty) => {}
        }

        self.client
            .publish(topic, QoS::AtMostOnce, false, payload.to_owned())
            .await
            .context("failed to queue MQTT publish")
    }
}

async fn wait_for_connack(event_loop: &mut EventLoop) -> Result<()> {
    loop {
        let event = event_loop
            .poll()
            .await
            .map_err(|err| anyhow!("MQTT connection error: {err}"))?;

        match event {
            Event::Incoming(Packet::ConnAck(connack)) => {
                if connack.code != ConnectReturnCode::Success {
                    bail!("MQTT broker refused connection: {:?}", connack.code);
                }

                return Ok(());
            }
            event => debug!(?event, "MQTT event before CONNACK"),
        }
    }
}

async fn drive_event_loop(mut event_loop: EventLoop, failure: oneshot::Sender<ConnectionError>) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!("MQTT disconnect sent");
                return;
            }
            Ok(event) => debug!(?event, "MQTT event"),
            Err(err) => {
                warn!("MQTT event loop stopped: {err}");
                let _ = failure.send(err);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn connect_fails_fast_when_broker_is_unreachable() {
        let config = Config::new("127.0.0.1", closed_port(), "t/", Duration::ZERO);

        let err = timeout(Duration::from_secs(10), connect(&config))
            .await
            .expect("connect did not fail fast")
            .err()
            .expect("connected to a closed port");

        assert!(
            format!("{err:#}").contains("failed to connect to MQTT broker"),
            "{err:#}"
        );
    }
}
