mod config;
mod connection;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use config::ServerConfig;
use connection::ConnectionHandler;
use ore_rs_game::ItemCatalog;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = Arc::new(match ServerConfig::load("server.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load server.toml: {e}");
            std::process::exit(1);
        }
    });

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "ORE-RS Server v{} starting on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.address,
        config.server.port
    );
    info!("Max players: {}", config.server.max_players);
    info!(
        "Inventory: {} slots, hotbar: {} slots",
        config.inventory.main_capacity, config.inventory.hotbar_capacity
    );

    let catalog = match &config.items.catalog {
        Some(path) => ItemCatalog::load(path),
        None => ItemCatalog::builtin(),
    };
    let catalog = match catalog {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load item catalog: {e}");
            std::process::exit(1);
        }
    };
    info!("Loaded {} item definitions", catalog.len());

    let addr: SocketAddr = match format!("{}:{}", config.server.address, config.server.port).parse() {
        Ok(a) => a,
        Err(e) => {
            error!("Invalid bind address: {e}");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("Listening on {addr}");

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

    // Handle Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // All inventory state lives in this one task.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(256);
    let mut shutdown_rx_handler = shutdown_rx.clone();
    let handler_task = tokio::spawn(async move {
        let mut handler = ConnectionHandler::new(config, catalog);
        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    match event {
                        Some(e) => handler.handle_event(e),
                        None => break, // channel closed
                    }
                }
                _ = shutdown_rx_handler.changed() => {
                    if *shutdown_rx_handler.borrow() {
                        info!("Dropping {} sessions", handler.session_count());
                        break;
                    }
                }
            }
        }
    });

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        session::spawn(stream, peer, event_tx.clone(), shutdown_rx.clone());
                    }
                    Err(e) => error!("Accept failed: {e}"),
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    drop(event_tx);
    let _ = handler_task.await;
    info!("Server shut down.");
}
