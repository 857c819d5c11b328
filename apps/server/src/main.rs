use anyhow::Context;
use handy::domain::config::AppConfig;
use handy::kernel::config::{DEFAULT_CONFIG_FILE, load_config};
use handy_logger::Logger;
use handy_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: AppConfig =
        load_config(Some(DEFAULT_CONFIG_FILE)).context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_PKG_NAME"), &cfg.logging)?;

    Server::builder().config(cfg).build()?.run().await
}
