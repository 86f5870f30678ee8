use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to run container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("redis client error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The container started but the service never answered.
    #[error("{0} never became ready")]
    NotReady(String),
}

pub type Result<T> = std::result::Result<T, TestInfraError>;
