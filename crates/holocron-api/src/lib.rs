// holocron-api: Async Rust client for the swapi.tech people collection

pub mod client;
pub mod error;
#[cfg(feature = "test-fixture")]
pub mod fixture;
pub mod models;
mod people;
pub mod transport;

pub use client::{ArchiveClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use models::{
    DetailEnvelope, ListItem, Listing, PageQuery, Record, ResultEnvelope, SearchEnvelope,
    SortDirection,
};
pub use transport::{RetryPolicy, TransportConfig};
