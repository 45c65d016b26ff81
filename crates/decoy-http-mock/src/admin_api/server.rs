//! Admin API server.

use crate::admin_api::router::route_request;
use crate::admin_api::types::AdminState;
use crate::engine::Dispatcher;
use crate::expectation::ExpectationRegistry;
use crate::server::{accept_loop, Acceptor};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Admin API server for Decoy
pub struct AdminApiServer {
    addr: SocketAddr,
    state: AdminState,
}

impl AdminApiServer {
    pub fn new(
        addr: SocketAddr,
        registry: Arc<ExpectationRegistry>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            addr,
            state: AdminState {
                registry,
                dispatcher,
            },
        }
    }

    /// Run the admin API server; only a bind failure returns
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("Decoy Admin API listening on http://{}", self.addr);
        self.serve(listener).await;
        Ok(())
    }

    /// Serve from an already bound listener
    pub async fn serve(self, listener: TcpListener) {
        self.serve_from(listener).await
    }

    async fn serve_from<A: Acceptor>(self, acceptor: A) {
        let state = self.state;
        accept_loop(acceptor, "admin", move |stream, _| {
            let io = TokioIo::new(stream);
            let state = state.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let state = state.clone();
                    async move { route_request(req, state).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Admin API connection error: {}", e);
                }
            });
        })
        .await
    }
}
