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

//! Telnet listener

use crate::error::{GatewayError, GatewayResult};
use crate::telnet::TelnetSettings;
use crate::telnet::connection::Connection;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Telnet server
pub struct TelnetServer {
    settings: TelnetSettings,
}

impl TelnetServer {
    /// Create a new telnet server
    pub fn new(settings: TelnetSettings) -> Self {
        Self { settings }
    }

    /// Listen on `port` on all interfaces.
    pub async fn serve(
        self,
        port: u16,
        connections: mpsc::Sender<Connection>,
    ) -> GatewayResult<()> {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
        self.serve_on(addr, connections).await
    }

    /// Listen on `addr`.
    ///
    /// Only a bind failure is returned as an error.
    pub async fn serve_on(
        self,
        addr: SocketAddr,
        connections: mpsc::Sender<Connection>,
    ) -> GatewayResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;

        tracing::info!("Telnet server listening on {}", addr);
        self.run(listener, connections).await;
        Ok(())
    }

    /// Accept connections on an already bound listener.
    ///
    /// Runs until the application drops its connection receiver.
    pub async fn run(self, listener: TcpListener, connections: mpsc::Sender<Connection>) {
        tracing::info!("Telnet server accepting connections...");

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    let connection = Connection::detach(stream, addr, &self.settings);
                    tracing::info!(
                        "Accepted telnet connection {} from {}",
                        connection.id(),
                        addr
                    );

                    if connections.send(connection).await.is_err() {
                        tracing::warn!("Connection receiver dropped, telnet server stopping");
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!("Error accepting telnet connection: {}", e);
                }
            }
        }
    }
}

/// Listen on `port` with default settings, publishing each new connection.
pub async fn serve(port: u16, connections: mpsc::Sender<Connection>) -> GatewayResult<()> {
    TelnetServer::new(TelnetSettings::default())
        .serve(port, connections)
        .await
}
