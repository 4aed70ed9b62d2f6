//! Server configuration from flags and environment.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which backend holds the todos
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// SQLite file (or `:memory:`)
    Sqlite,
    /// Process memory, lost on exit
    Memory,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "Todo list HTTP gateway")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "TODO_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    #[arg(long, env = "TODO_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// SQLite database file
    #[arg(long, env = "TODO_DB_PATH", default_value = "todos.db")]
    pub db_path: PathBuf,

    /// Directory for rolling log files; stderr only when unset
    #[arg(long, env = "TODO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Built UI assets served for any non-API path
    #[arg(long, env = "TODO_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}
