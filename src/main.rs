use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use todo_api::{
    config::Config,
    db::Db,
    repository::SledTodoRepository,
    AppState, TODOS_PATH,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .init();

    // the store is opened once and shared by every request
    let db = if config.temporary {
        Db::temporary()?
    } else {
        Db::open(&config.db_path)?
    };
    let state = AppState::new(SledTodoRepository::new(db));

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %config.addr,
        path = TODOS_PATH,
        temporary = config.temporary,
        "listening"
    );
    todo_api::run(listener, state).await?;
    Ok(())
}
