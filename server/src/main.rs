//! Todo Server Entry Point

use clap::Parser;
use todo_server_lib::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todo_server_lib::run(ServerConfig::parse()).await
}
