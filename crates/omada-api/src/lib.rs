// omada-api: Async Rust client for the TP-Link Omada controller web API

pub mod clients;
pub mod error;
pub mod models;
pub mod retry;
pub mod session;
pub mod sites;
pub mod transport;

pub use error::Error;
pub use models::{ConnectedClient, ControllerInfo, Envelope, Page, SiteEntry};
pub use session::{ControllerSession, SessionState, TOKEN_HEADER};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
