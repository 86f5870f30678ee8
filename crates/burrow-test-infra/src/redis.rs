use crate::{Result, TestInfraError};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

/// Test fixture for a disposable, standalone Redis server.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
}

impl RedisServer {
    /// Starts a Redis container and waits until it answers `PING`.
    pub async fn new() -> Result<Self> {
        let container = GenericImage::new("redis", "8.6.0")
            .with_exposed_port(6379_u16.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;

        let server = Self { container };
        server.wait_ready().await?;
        Ok(server)
    }

    pub async fn host(&self) -> Result<String> {
        Ok(loopback_host(self.container.get_host().await?.to_string()))
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(6379).await?)
    }

    pub async fn url(&self) -> Result<String> {
        Ok(format!("redis://{}:{}", self.host().await?, self.port().await?))
    }

    /// Opens a new multiplexed connection to the server.
    pub async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        let client = redis::Client::open(self.url().await?.as_str())?;
        Ok(client.get_multiplexed_async_connection().await?)
    }

    /// Returns the underlying container reference.
    pub fn container(&self) -> &ContainerAsync<GenericImage> {
        &self.container
    }

    async fn wait_ready(&self) -> Result<()> {
        let mut last_error = None;

        for _ in 0..20 {
            match self.ping().await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    last_error = Some(err);
                    tokio::time::sleep(Duration::from_millis(250)).await;
                }
            }
        }

        Err(TestInfraError::NotReady(format!(
            "redis (last PING error: {last_error:?})"
        )))
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

/// Pins `localhost` to IPv4 so clients don't try `::1` first against a port
/// that is only published on IPv4.
pub(crate) fn loopback_host(host: String) -> String {
    match host.as_str() {
        "localhost" => String::from("127.0.0.1"),
        _ => host,
    }
}
