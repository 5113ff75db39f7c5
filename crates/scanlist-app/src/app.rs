//! # Scanner App State
//!
//! The product list the user sees, the lookup in flight and the status line.
//!
//! ## Thread Safety
//! The collection and the status message sit behind `std::sync::Mutex`.
//! Locks are never held across an `.await`, so several lookups may run at
//! once and each prepends its product when it completes.
//!
//! ## Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SessionEvent::Scan(value)                                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  handle_scan ──► pending += 1 ──► resolver.resolve(value)               │
//! │                                        │                                │
//! │        ┌───────────────────────────────┼───────────────────────┐        │
//! │        ▼                               ▼                       ▼        │
//! │  Found(product)                    NotFound                 Err(e)      │
//! │  prepend to list            "No se encontró ..."     "Error al buscar"  │
//! │  "Producto agregado: ..."                                               │
//! │                                                                         │
//! │  pending -= 1 on every path; messages expire after message_ttl_secs     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use scanlist_core::{CoreError, CsvExport, Product, ProductCollection, ScanEvent};
use scanlist_lookup::{LookupError, ProductLookup, ProductResolver, Resolution};
use scanlist_session::{
    ManualEntryHandler, ManualSubmit, SessionError, SessionEvent, SessionState,
};

use crate::config::UiConfig;

// =============================================================================
// Status Messages
// =============================================================================

pub const MSG_NOT_FOUND: &str = "No se encontró información del producto";
pub const MSG_LOOKUP_FAILED: &str = "Error al buscar el producto. Intenta nuevamente.";
pub const MSG_EXPORT_EMPTY: &str = "No hay productos para exportar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

/// A transient line of feedback for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
    expires_at: Instant,
}

impl StatusMessage {
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// =============================================================================
// Outcomes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Added(Product),
    NotFound,
    Failed(LookupError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualEntryOutcome {
    Submitted(ScanEvent),
    /// Only whitespace was typed.
    Empty,
    /// Typed codes are refused while the camera is scanning.
    Disabled,
}

/// Counts a lookup as in flight for as long as it lives.
struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        PendingGuard(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Scanner App
// =============================================================================

pub struct ScannerApp<L> {
    resolver: ProductResolver<L>,
    products: Mutex<ProductCollection>,
    message: Mutex<Option<StatusMessage>>,
    pending: AtomicUsize,
    ui: UiConfig,
}

impl<L: ProductLookup> ScannerApp<L> {
    pub fn new(lookup: L, ui: UiConfig) -> Self {
        ScannerApp {
            resolver: ProductResolver::new(lookup),
            products: Mutex::new(ProductCollection::new()),
            message: Mutex::new(None),
            pending: AtomicUsize::new(0),
            ui,
        }
    }

    pub fn ui_config(&self) -> &UiConfig {
        &self.ui
    }

    fn collection(&self) -> MutexGuard<'_, ProductCollection> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn message_slot(&self) -> MutexGuard<'_, Option<StatusMessage>> {
        self.message.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_message(&self, kind: MessageKind, text: impl Into<String>) {
        let message = StatusMessage {
            kind,
            text: text.into(),
            expires_at: Instant::now() + self.ui.message_ttl(),
        };
        *self.message_slot() = Some(message);
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Resolves a scanned or typed code and records the result.
    pub async fn handle_scan(&self, barcode: &str) -> ScanOutcome {
        self.handle_scan_at(barcode, Utc::now()).await
    }

    /// Like [`handle_scan`](Self::handle_scan) with an explicit discovery time.
    pub async fn handle_scan_at(
        &self,
        barcode: &str,
        discovered_at: DateTime<Utc>,
    ) -> ScanOutcome {
        let _pending = PendingGuard::enter(&self.pending);

        match self.resolver.resolve_at(barcode, discovered_at).await {
            Ok(Resolution::Found(product)) => {
                // Same barcode within one millisecond: the first entry stands.
                if let Err(e) = self.collection().prepend(product.clone()) {
                    debug!(barcode, error = %e, "Product already listed");
                }
                info!(barcode, id = %product.id, name = %product.name, "Product added");
                self.set_message(
                    MessageKind::Success,
                    format!("Producto agregado: {}", product.name),
                );
                ScanOutcome::Added(product)
            }
            Ok(Resolution::NotFound) => {
                info!(barcode, "No product information");
                self.set_message(MessageKind::Error, MSG_NOT_FOUND);
                ScanOutcome::NotFound
            }
            Err(e) => {
                warn!(barcode, error = %e, "Product lookup failed");
                self.set_message(MessageKind::Error, MSG_LOOKUP_FAILED);
                ScanOutcome::Failed(e)
            }
        }
    }

    /// Routes one session event. Returns the outcome for scans.
    pub async fn handle_event(&self, event: SessionEvent) -> Option<ScanOutcome> {
        match event {
            SessionEvent::Scan(scan) => {
                debug!(value = scan.value(), source = ?scan.source(), "Scan received");
                Some(self.handle_scan(scan.value()).await)
            }
            SessionEvent::StateChanged(state) => {
                debug!(%state, "Session state changed");
                None
            }
            SessionEvent::Error(err) => {
                self.report_session_error(&err);
                None
            }
            SessionEvent::Haptic(pulse) => {
                trace!(?pulse, "Haptic pulse");
                None
            }
        }
    }

    /// Shows a session failure on the status line.
    pub fn report_session_error(&self, err: &SessionError) {
        warn!(error = %err, "Session error");
        self.set_message(MessageKind::Error, err.user_message());
    }

    /// Applies the manual-entry lock, then submits the typed code.
    pub fn submit_manual(
        &self,
        handler: &mut ManualEntryHandler,
        state: SessionState,
    ) -> ManualEntryOutcome {
        if self.ui.lock_manual_entry_while_scanning && state == SessionState::Active {
            debug!("Manual entry refused while scanning");
            return ManualEntryOutcome::Disabled;
        }

        match handler.submit() {
            ManualSubmit::Submitted(event) => ManualEntryOutcome::Submitted(event),
            ManualSubmit::Empty => ManualEntryOutcome::Empty,
        }
    }

    // =========================================================================
    // Product List
    // =========================================================================

    /// Snapshot of the list, newest first.
    pub fn products(&self) -> Vec<Product> {
        self.collection().as_slice().to_vec()
    }

    pub fn product_count(&self) -> usize {
        self.collection().len()
    }

    pub fn remove_product(&self, id: &str) -> Option<Product> {
        self.collection().remove(id)
    }

    pub fn remove_product_at(&self, index: usize) -> Option<Product> {
        self.collection().remove_at(index)
    }

    pub fn clear_products(&self) -> usize {
        let removed = self.collection().clear();
        info!(removed, "Product list cleared");
        removed
    }

    /// True while at least one lookup is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// The status message, unless it has expired.
    pub fn current_message(&self) -> Option<StatusMessage> {
        let mut slot = self.message_slot();
        if slot.as_ref().is_some_and(|m| m.is_expired_at(Instant::now())) {
            *slot = None;
        }
        slot.clone()
    }

    pub fn dismiss_message(&self) {
        *self.message_slot() = None;
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Builds the CSV document for the current list.
    pub fn export_csv(&self, date: NaiveDate) -> Result<CsvExport, CoreError> {
        let result = CsvExport::build(self.collection().as_slice(), date);
        match result {
            Ok(export) => {
                info!(filename = %export.filename, bytes = export.contents.len(), "CSV export built");
                Ok(export)
            }
            Err(e) => {
                if e.is_informational() {
                    self.set_message(MessageKind::Info, MSG_EXPORT_EMPTY);
                } else {
                    warn!(error = %e, "CSV export failed");
                    self.set_message(MessageKind::Error, e.to_string());
                }
                Err(e)
            }
        }
    }
}

impl<L: ProductLookup + 'static> ScannerApp<L> {
    /// Drains session events until every sender is gone.
    ///
    /// Each scan gets its own task so lookups overlap. The returned handle
    /// completes after the channel closes and the last lookup settles.
    pub fn spawn_ingest(
        self: &Arc<Self>,
        mut events: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let app = Arc::clone(self);

        tokio::spawn(async move {
            let mut lookups = JoinSet::new();

            while let Some(event) = events.recv().await {
                match event {
                    SessionEvent::Scan(scan) => {
                        let app = Arc::clone(&app);
                        lookups.spawn(async move {
                            app.handle_scan(scan.value()).await;
                        });
                    }
                    other => {
                        app.handle_event(other).await;
                    }
                }
                while lookups.try_join_next().is_some() {}
            }

            while lookups.join_next().await.is_some() {}
            debug!("Session event channel closed");
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
