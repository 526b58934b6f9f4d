use actix_cors::Cors;
use actix_server::ServerHandle;
use actix_web::{App, HttpServer, web::Data};
use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::{debug, error, info};
use std::{io::Write, sync::Arc};
use switch_control::{
    api::{Api, ui_files},
    config::AppConfig,
    device::{Device, run_ticker},
    remote::HttpRemoteSwitchClient,
    storage::ConfigurationStorage,
};
use tokio::signal::unix::{SignalKind, signal};

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    initialize();

    let config = AppConfig::get();

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let storage = ConfigurationStorage::open(&config.paths.config_dir)
        .context("failed to open configuration storage")?;
    let device = Arc::new(Device::simulated(storage));

    let client = HttpRemoteSwitchClient::new(config.controller.remote_timeout)?;
    let ticker = tokio::spawn(run_ticker(
        device.clone(),
        client,
        config.controller.tick_interval,
    ));

    let (server_handle, server_task) = run_server(device)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            debug!("ctrl-c received");
        },
        _ = sigterm.recv() => {
            debug!("SIGTERM received");
        },
        result = server_task => {
            match result {
                Ok(Ok(())) => debug!("server stopped normally"),
                Ok(Err(e)) => error!("server stopped with error: {e}"),
                Err(e) => error!("server task panicked: {e}"),
            }
        },
    }

    info!("shutting down");

    ticker.abort();
    server_handle.stop(true).await;

    info!("shutdown complete");

    Ok(())
}

fn initialize() {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    info!(
        "module version: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHORT_REV")
    );
}

fn run_server(
    device: Arc<Device>,
) -> Result<(
    ServerHandle,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
)> {
    let api = Api::new(device);
    let config = AppConfig::get();
    let ui_port = config.ui.port;
    let ui_dist_dir = config.paths.ui_dist_dir.clone();

    info!("serving ui from {}", ui_dist_dir.display());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(Data::new(api.clone()))
            .configure(Api::routes)
            .service(ui_files(&ui_dist_dir))
    })
    .bind(format!("0.0.0.0:{ui_port}"))
    .context("failed to bind server")?
    .disable_signals()
    .run();

    Ok((server.handle(), tokio::spawn(server)))
}
