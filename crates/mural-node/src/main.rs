//! Mural hub
//!
//! Usage: `mural-node [--host H] [--config FILE] <PORT> [PEER_PORT]...`

use std::sync::Arc;

use clap::Parser;

use mural_node::config::Cli;
use mural_node::console;
use mural_runtime::{logging, Node, Server};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_from_env();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let node = Arc::new(Node::new(config));
    let server = match Server::bind(Arc::clone(&node)).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(port = node.port(), error = %e, "failed to bind listener");
            std::process::exit(1);
        }
    };
    tracing::info!(
        addr = %server.local_addr(),
        peers = node.propagator().targets().len(),
        "hub started"
    );

    tokio::select! {
        _ = server.run() => {}
        _ = console::run(Arc::clone(&node)) => {
            tracing::info!("quit requested, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received SIGINT, shutting down");
        }
    }

    // A pending stdin read would otherwise hold up runtime shutdown.
    std::process::exit(0);
}
