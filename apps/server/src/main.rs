use anyhow::Context;
use orgdir::domain::config::{ApiConfig, LoggingConfig};
use orgdir::kernel::config::load_config;
use orgdir_logger::{Logger, parse_level};
use orgdir_server::Server;

#[orgdir_runtime::main(server)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    Server::builder().config(cfg).build().await?.run().await
}

fn init_logger(logging: &LoggingConfig) -> anyhow::Result<Logger> {
    let builder = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(parse_level(&logging.level))
        .json(logging.json);

    let builder = match &logging.filter {
        Some(filter) => builder.env_filter(filter),
        None => builder,
    };

    let logger = match &logging.directory {
        Some(directory) => builder.path(directory).init(),
        None => builder.init(),
    };

    logger.context("Failed to initialize logging")
}
