//! # scanlist-core: Pure Logic for Scanlist
//!
//! This crate is the **heart** of Scanlist. It contains the product, pricing,
//! duplicate-suppression and export rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Scanlist Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser Front End                            │   │
//! │  │    Camera View ──► Manual Entry ──► Product List ──► Export     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          scanlist-session          scanlist-lookup              │   │
//! │  │    camera lifecycle, dedup     product API, price rules         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ scanlist-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │   dedup   │  │  export   │  │   │
//! │  │   │  Product  │  │   Money   │  │  Recent   │  │   CSV     │  │   │
//! │  │   │ ScanEvent │  │  Display  │  │  Window   │  │  escaping │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CAMERA • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ScanEvent, Product, CameraDevice, Symbology)
//! - [`money`] - Money type with integer cents
//! - [`pricing`] - Display price derivation from offers or a price range
//! - [`dedup`] - Time-bounded duplicate suppression window
//! - [`collection`] - Newest-first product collection
//! - [`export`] - CSV document formatting
//! - [`validation`] - Barcode and manual-entry rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use scanlist_core::money::Money;
//! use scanlist_core::pricing::normalize_price;
//!
//! let price = normalize_price(&[10.0, 20.0], None, None);
//! assert_eq!(price.to_string(), "$15.00");
//!
//! let midpoint = normalize_price(&[], Some(5.0), Some(15.0));
//! assert_eq!(midpoint.amount(), Some(Money::from_cents(1000)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collection;
pub mod dedup;
pub mod error;
pub mod export;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use collection::ProductCollection;
pub use dedup::{DedupVerdict, RecentScanWindow};
pub use error::{CoreError, CoreResult, ValidationError};
pub use export::CsvExport;
pub use money::Money;
pub use pricing::DisplayPrice;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Trailing interval during which a repeated camera decode counts as noise.
pub const DEFAULT_DEDUP_WINDOW_MS: u64 = 3000;

/// How long a session may wait for its first live video frame.
pub const DEFAULT_VIDEO_TIMEOUT_MS: u64 = 4000;

/// Longest barcode accepted for lookup.
///
/// Retail symbologies top out well below this; Code128 can carry longer
/// payloads but nothing the lookup service indexes.
pub const MAX_BARCODE_LENGTH: usize = 64;
