//! Decoy: expectation-based HTTP stub server.
//!
//! Requests on the mock port are matched against registered expectations and
//! answered with a canned response or forwarded to a real host. Every
//! exchange is kept in an in-memory log readable through the admin API.

pub mod admin_api;
pub mod app;
pub mod config;
pub mod engine;
pub mod expectation;
pub mod logs;
pub mod proxy;
pub mod server;

pub use app::Decoy;
pub use config::Config;
pub use engine::{Dispatcher, HostWhitelist, NormalizedResponse, Request};
pub use expectation::{Expectation, ExpectationRegistry, RequestMatcher};
pub use logs::LogContainer;
pub use proxy::{ReqwestTransport, Transport};
