//! Wiring of the registry, dispatcher and listeners from a [`Config`].

use crate::admin_api::AdminApiServer;
use crate::config::Config;
use crate::engine::{Dispatcher, HostWhitelist};
use crate::expectation::{ExpectationRegistry, RequestMatcher};
use crate::proxy::Transport;
use crate::server::MockServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared state of a running Decoy instance
#[derive(Clone)]
pub struct Decoy {
    pub registry: Arc<ExpectationRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}

impl Decoy {
    /// Build the registry and dispatcher described by `config`
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let registry = Arc::new(ExpectationRegistry::with_expectations(
            config.expectations.clone(),
        ));
        if !registry.is_empty() {
            info!("Loaded {} expectation(s) from config", registry.len());
        }

        let dispatcher = Dispatcher::new(registry.clone(), Arc::new(RequestMatcher::new()), transport)
            .with_host_whitelist(HostWhitelist::new(config.host_whitelist.clone()))
            .with_logs_url(config.logs_url.clone());

        Self {
            registry,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn mock_server(&self, addr: SocketAddr) -> MockServer {
        MockServer::new(addr, Arc::clone(&self.dispatcher))
    }

    pub fn admin_server(&self, addr: SocketAddr) -> AdminApiServer {
        AdminApiServer::new(addr, Arc::clone(&self.registry), Arc::clone(&self.dispatcher))
    }
}
