//! HTTP front end for mocked traffic.
//!
//! Every request on the mock port goes through the [`Dispatcher`]; there is
//! no routing of its own.

mod handler;

pub use handler::{handle_mock_request, into_hyper_response, parse_cookies, request_path, to_request};

use crate::engine::Dispatcher;
use async_trait::async_trait;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info};

/// Listener-level failures
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Source of inbound connections for the accept loops
#[async_trait]
pub(crate) trait Acceptor: Send {
    async fn next_connection(&mut self) -> io::Result<(TcpStream, SocketAddr)>;
}

#[async_trait]
impl Acceptor for TcpListener {
    async fn next_connection(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        self.accept().await
    }
}

/// Hand every accepted connection to `on_connection`. Accept errors are
/// logged and the loop keeps going.
pub(crate) async fn accept_loop<A, F>(mut acceptor: A, name: &str, mut on_connection: F)
where
    A: Acceptor,
    F: FnMut(TcpStream, SocketAddr) + Send,
{
    loop {
        match acceptor.next_connection().await {
            Ok((stream, peer)) => on_connection(stream, peer),
            Err(e) => error!("Accept error on {} listener: {}", name, e),
        }
    }
}

/// Server answering mocked requests
pub struct MockServer {
    addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
}

impl MockServer {
    pub fn new(addr: SocketAddr, dispatcher: Arc<Dispatcher>) -> Self {
        Self { addr, dispatcher }
    }

    /// Bind the configured address and serve; only a bind failure returns
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;
        info!("Decoy mock server listening on http://{}", self.addr);
        serve(listener, self.dispatcher).await;
        Ok(())
    }
}

/// Serve connections from an already bound listener, one task per connection
pub async fn serve(listener: TcpListener, dispatcher: Arc<Dispatcher>) {
    serve_from(listener, dispatcher).await
}

async fn serve_from<A: Acceptor>(acceptor: A, dispatcher: Arc<Dispatcher>) {
    accept_loop(acceptor, "mock", move |stream, peer| {
        let io = TokioIo::new(stream);
        let dispatcher = Arc::clone(&dispatcher);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let dispatcher = Arc::clone(&dispatcher);
                async move { handle_mock_request(req, dispatcher).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Mock connection error from {}: {}", peer, e);
            }
        });
    })
    .await
}
