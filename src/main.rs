//! gibs-colormaps - NASA GIBS colormaps as a cached catalog
//!
//! This is the main entry point for the gibs-colormaps application.

use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use gibs_colormaps::colormaps::colorbar::render_colorbar;
use gibs_colormaps::colormaps::colormap::to_rgba8;
use gibs_colormaps::config::Command;
use gibs_colormaps::logging::{init_tracing, log_error, log_timed_operation};
use gibs_colormaps::state::AppState;
use gibs_colormaps::{handlers, Catalog, CatalogAssembler, Config, GibsError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let (config, command) = Config::load()?;

    init_tracing(&config.log_level);
    info!("Starting gibs-colormaps v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let catalog = load_catalog(&config).await.map_err(|e| {
        log_error(&e, "catalog load");
        e
    })?;

    match command {
        Command::Build => {
            println!(
                "{} colormaps cached at {}",
                catalog.len(),
                config.catalog.cache_path.display()
            );
        }
        Command::List => {
            for name in catalog.names() {
                println!("{}", name);
            }
        }
        Command::Show { name, samples } => {
            let colormap = catalog.get_checked(&name)?;
            match samples {
                Some(count) => {
                    let colors: Vec<[u8; 4]> =
                        colormap.sample(count).into_iter().map(to_rgba8).collect();
                    println!("{}", serde_json::to_string(&colors)?);
                }
                None => println!("{}", serde_json::to_string_pretty(colormap)?),
            }
        }
        Command::Render {
            name,
            output,
            width,
            height,
            extend,
        } => {
            let colormap = catalog.get_checked(&name)?;
            let img = log_timed_operation("render_colorbar", || {
                render_colorbar(colormap, width, height, extend)
            })?;
            img.save(&output).map_err(|e| GibsError::ImageGeneration {
                message: format!("Failed to save {}: {}", output.display(), e),
            })?;
            info!(colormap = %name, output = %output.display(), "Colorbar written");
        }
        Command::Serve { .. } => serve(config, catalog).await?,
    }

    Ok(())
}

/// Load the catalog on a blocking thread; fetching uses a blocking client
async fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog_config = config.catalog.clone();
    tokio::task::spawn_blocking(move || CatalogAssembler::over_http(catalog_config)?.load())
        .await
        .map_err(|e| GibsError::Server {
            message: format!("Catalog loading task failed: {}", e),
        })?
}

/// Serve the catalog until a shutdown signal arrives
async fn serve(config: Config, catalog: Catalog) -> Result<()> {
    info!("Serving {} colormaps", catalog.len());

    // Create the server address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|e| GibsError::Config {
                message: format!("Invalid host address: {}", e),
            })?,
        config.server.port,
    ));

    let state = AppState::new_shared(config, catalog);
    let app = handlers::router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GibsError::Server {
            message: format!("Failed to bind to address: {}", e),
        })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GibsError::Server {
            message: format!("Server error: {}", e),
        })?;

    info!("Server has been gracefully shut down");
    Ok(())
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
