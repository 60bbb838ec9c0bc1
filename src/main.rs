// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Cadbridge CLI entrypoint.
//!
//! By default this serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp` until
//! interrupted.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool integrations).

use std::error::Error;
use std::sync::Arc;

use axum::Router;
use cadbridge::config::{Config, DEFAULT_MCP_HTTP_PORT, DOCS_ENV_VAR};
use cadbridge::demo::DemoApplication;
use cadbridge::dispatch::Dispatcher;
use cadbridge::docs::DocIndex;
use cadbridge::mcp::CadMcp;
use cadbridge::session::Session;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<docs-dir>] [--demo] [--mcp-http-port <port>]\n  {program} [--docs <dir>] [--demo] [--mcp-http-port <port>]\n  {program} [<docs-dir>] [--demo] --mcp\n  {program} [--docs <dir>] [--demo] --mcp\n\nBy default MCP is served over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--mcp-http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}).\n--mcp serves MCP over stdio instead and cannot be combined with --mcp-http-port.\n\nThe documentation root falls back to ${DOCS_ENV_VAR}; without one, docs tools return nothing.\n--demo connects a built-in in-memory CAD application instead of starting disconnected."
    );
}

/// Logs go to stderr so the stdio transport stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "cadbridge".to_owned());

        let config = match Config::from_env(args) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{program}: {err}");
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let session = if config.demo {
            Session::connected(DemoApplication::new())
        } else {
            Session::disconnected()
        };
        let docs = DocIndex::new(config.docs_root.clone());
        let mcp = CadMcp::new(Arc::new(Dispatcher::new(Arc::new(session), Arc::new(docs))));

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if config.mcp_stdio {
            tracing::info!("serving MCP over stdio");
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        let mcp_http_port = config.http_port();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;

            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let shutdown_token = config.cancellation_token.clone();
            let server_shutdown = shutdown_token.clone();

            let session_manager = Arc::new(LocalSessionManager::default());
            let mcp_service = {
                let mcp = mcp.clone();
                StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config)
            };

            let router = Router::new().nest_service("/mcp", mcp_service);
            let address = listener.local_addr()?;
            eprintln!("cadbridge: serving MCP at http://{address}/mcp");
            tracing::info!(%address, "serving MCP over streamable HTTP");

            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                    server_shutdown.cancelled().await;
                });
                if let Err(err) = serve.await {
                    eprintln!("cadbridge: MCP HTTP server error: {err}");
                }
            });

            let interrupted = tokio::signal::ctrl_c().await;
            shutdown_token.cancel();
            let _ = server_handle.await;
            interrupted?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("cadbridge: {err}");
        std::process::exit(1);
    }
}
