use configs::{AppConfig, LogFormat};
use dotenvy::dotenv;
use tracing::{error, info};

use common::utils::logging::init_logging;

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = AppConfig::load_and_validate()?;
    init_logging(&cfg.logs.level, cfg.logs.format == LogFormat::Json);

    std::panic::set_hook(Box::new(|info| {
        error!(panic = %info, "panic");
    }));

    let workers = cfg.server.worker_threads.unwrap_or(4);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()?;
    info!(workers, "runtime ready");

    runtime.block_on(server::run(cfg, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
        }
        info!("shutdown signal received");
    }))
}
