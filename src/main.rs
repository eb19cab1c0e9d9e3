use basic_static::config::{self, AppState, Config};
use basic_static::handler::StaticFiles;
use basic_static::{logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // The working directory is read once here and injected into the handler
    let cwd = std::env::current_dir()?;
    let options = cfg.serve_options(&cwd)?;
    let root = options.root_dir.clone();

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &root, &cfg);

    let state = Arc::new(AppState::new(cfg, StaticFiles::new(options)));
    server::start_server_loop(listener, state, server::shutdown_signal()).await;

    logger::log_server_stopped();
    Ok(())
}
