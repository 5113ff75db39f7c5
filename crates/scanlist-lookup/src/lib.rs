//! # scanlist-lookup: Product Resolution
//!
//! Turns a barcode into a [`Product`](scanlist_core::Product) using the
//! remote lookup service.
//!
//! ## Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve(barcode)                                                       │
//! │    ├── Ok(Found(product))   service knew the code                      │
//! │    ├── Ok(NotFound)         service answered with zero items           │
//! │    └── Err(LookupError)     could not ask (transport, status, JSON)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Asked and got nothing" is never an error.
//!
//! ## Modules
//!
//! - [`models`] - Response documents as returned by the service
//! - [`client`] - `ProductLookup` trait and the reqwest-backed client
//! - [`resolver`] - Fallback rules from a lookup item to a `Product`
//! - [`config`] - Endpoint, credential, timeout and retry budget
//! - [`error`] - `LookupError`

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;

pub use client::{ProductLookup, UpcLookupClient};
pub use config::LookupConfig;
pub use error::{LookupError, LookupResult};
pub use models::{LookupItem, LookupResponse, Offer};
pub use resolver::{ProductResolver, Resolution};
