//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use clap::Parser;
use telline_gateway::chat::ChatRoom;
use telline_gateway::config::{Arguments, Configuration};
use telline_gateway::telnet::TelnetServer;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Fall back to defaults when no configuration file is present
    let config = if std::path::Path::new(&arguments.config_file).exists() {
        match Configuration::load(&arguments.config_file) {
            Ok(config) => config,
            Err(e) => {
                error!("Configuration load error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        warn!(
            "Configuration file {} not found, using defaults",
            arguments.config_file
        );
        Configuration::default()
    };

    debug!("Configuration loaded: {:?}", config);

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let port = arguments.port.unwrap_or_else(|| config.telnet.port.to_port());

    info!("Starting Telline Gateway on port {}...", port);

    let (connections_tx, connections_rx) = mpsc::channel(settings.queue_depth);
    tokio::spawn(ChatRoom::new().run(connections_rx));

    let server = TelnetServer::new(settings);
    tokio::select! {
        result = server.serve(port, connections_tx) => {
            if let Err(e) = result {
                error!("Telnet server error: {}", e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down Telline Gateway");
        }
    }
}
