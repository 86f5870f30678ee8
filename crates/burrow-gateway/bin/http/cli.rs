use burrow_allocator::{DEFAULT_COUNTER_KEY, DEFAULT_START_VALUE};
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "BURROW_LISTEN_ADDR";
pub const BASE62_SALT_ENV: &str = "BURROW_BASE62_SALT";
pub const PUBLIC_BASE_URL_ENV: &str = "BURROW_PUBLIC_BASE_URL";
pub const COUNTER_BACKEND_ENV: &str = "BURROW_COUNTER_BACKEND";
pub const REDIS_URL_ENV: &str = "BURROW_REDIS_URL";
pub const COUNTER_KEY_ENV: &str = "BURROW_COUNTER_KEY";
pub const COUNTER_START_ENV: &str = "BURROW_COUNTER_START";
pub const STORAGE_BACKEND_ENV: &str = "BURROW_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "BURROW_MYSQL_DSN";
pub const AUTO_MIGRATE_ENV: &str = "BURROW_AUTO_MIGRATE";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CounterBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for CounterBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterBackendArg::InMemory => write!(f, "in-memory"),
            CounterBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "burrow-gateway")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Secret that permutes the code alphabet. Changing it invalidates every
    /// issued code.
    #[arg(long, env = BASE62_SALT_ENV, hide_env_values = true)]
    pub base62_salt: String,

    /// Prefix for the `short_url` field of create responses, e.g.
    /// `https://brw.example`.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(
        long,
        env = COUNTER_BACKEND_ENV,
        value_enum,
        default_value_t = CounterBackendArg::InMemory
    )]
    pub counter: CounterBackendArg,

    #[arg(long, env = REDIS_URL_ENV, default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    #[arg(long, env = COUNTER_KEY_ENV, default_value = DEFAULT_COUNTER_KEY)]
    pub counter_key: String,

    #[arg(long, env = COUNTER_START_ENV, default_value_t = DEFAULT_START_VALUE)]
    pub counter_start: u64,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// Create the `short_urls` table on start-up if it is missing.
    #[arg(long, env = AUTO_MIGRATE_ENV)]
    pub auto_migrate: bool,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,
}
