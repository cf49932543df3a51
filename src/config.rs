use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Runtime settings, read from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-api", version, about = "JSON API for a todo list")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "TODO_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Directory of the sled store.
    #[arg(long, env = "TODO_DB_PATH", default_value = "db")]
    pub db_path: PathBuf,

    /// Keep records in a throwaway store removed on exit.
    #[arg(long)]
    pub temporary: bool,

    /// Tracing filter, e.g. `info` or `todo_api=debug`.
    #[arg(long = "log", env = "TODO_LOG", default_value = "info")]
    pub log_filter: String,
}
