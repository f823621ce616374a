use std::sync::Arc;

use staticd::{config, logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // One request at a time: a current-thread runtime is all that is needed
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cfg))
}

async fn run(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    let listener = match server::create_listener(addr) {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            logger::log_port_in_use(addr.port());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    logger::log_server_start(&addr, &cfg);

    let shutdown = server::start_signal_handler();
    server::run_accept_loop(listener, Arc::new(cfg), shutdown).await;

    logger::log_server_stopped();
    Ok(())
}
