//! Minimal async client for PostgREST-compatible tabular data APIs.
//!
//! Translates a small structured query vocabulary (select/filter/order/limit,
//! insert, update, delete, upsert) into HTTP requests against the `/rest/v1`
//! surface, and decodes the JSON responses back into [`Record`]s.
//!
//! Layering is strict: composite helpers build on the CRUD primitives, the
//! primitives build on the [`RequestExecutor`], and only the executor talks
//! to the transport.
//!
//! # Usage
//!
//! ```ignore
//! use pgrest_client::{record, Extras, Filters, RestClient, RestConfig};
//!
//! let config = RestConfig::new("https://example.supabase.co", "anon-key");
//! let client = RestClient::new(config)?;
//!
//! let resp = client
//!     .select(
//!         "cities",
//!         "*",
//!         &Filters::new().eq("country", "NZ"),
//!         &Extras::new().order("name.asc").limit(10),
//!     )
//!     .await;
//! let rows = resp.into_result()?;
//! ```

pub mod client;
pub mod encode;
pub mod execute;
pub mod helpers;

pub use client::RestClient;
pub use encode::{encode_select, Extras, Filters};
pub use execute::RequestExecutor;
pub use helpers::{BulkInsertOutcome, ChunkOutcome, DEFAULT_CHUNK_SIZE};

// Re-exports for convenient access
pub use pgrest_client_core::{record, Record, RestConfig, RestError, RestResponse, RestResult};
