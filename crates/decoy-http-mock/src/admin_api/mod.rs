//! Admin REST API.
//!
//! Listens on its own port (default: 2525) and provides:
//! - Registering, listing and removing expectations
//! - Reading and clearing the request log
//! - Health and config endpoints

mod handlers;
mod router;
mod server;
mod types;

pub use server::AdminApiServer;
pub use types::AdminState;
