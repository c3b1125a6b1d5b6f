// fmc-api: Async Rust client for the Cisco FMC REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::{Credentials, Domain, Session};
pub use client::{FmcClient, RequestOpts};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{NamedObject, Page, Paging, ServerVersion};
