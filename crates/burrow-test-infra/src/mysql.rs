use crate::redis::loopback_host;
use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;

/// Credentials and image tag for [`MySqlServer`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "8.4".to_string(), setter(into))]
    tag: String,
    #[builder(default = "burrow".to_string(), setter(into))]
    database: String,
    #[builder(default = "burrow".to_string(), setter(into))]
    username: String,
    #[builder(default = "burrow".to_string(), setter(into))]
    password: String,
}

pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    /// Starts a MySQL container with an empty database owned by the
    /// configured user.
    ///
    /// The entrypoint first boots a temporary server on port 0 to run its
    /// init scripts, so readiness is keyed on the final server's port line.
    /// The first connection can still race the socket; callers should retry it.
    pub async fn new(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr(format!("port: {MYSQL_PORT}")))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_RANDOM_ROOT_PASSWORD", "yes")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn host(&self) -> Result<String> {
        Ok(loopback_host(self.container.get_host().await?.to_string()))
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(MYSQL_PORT).await?)
    }

    pub fn database(&self) -> &str {
        &self.config.database
    }

    /// A `mysql://` DSN for the configured user and database.
    pub async fn database_url(&self) -> Result<String> {
        let MysqlConfig {
            username,
            password,
            database,
            ..
        } = &self.config;

        Ok(format!(
            "mysql://{username}:{password}@{}:{}/{database}",
            self.host().await?,
            self.port().await?,
        ))
    }

    pub fn container(&self) -> &ContainerAsync<GenericImage> {
        &self.container
    }
}
