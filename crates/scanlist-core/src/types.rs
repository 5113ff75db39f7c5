//! # Domain Types
//!
//! Core domain types used throughout Scanlist.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ScanEvent     │   │    Product      │   │  CameraDevice   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  value          │   │  id             │   │  id             │       │
//! │  │  timestamp      │   │  name           │   │  label          │       │
//! │  │  source         │   │  average_price  │   └─────────────────┘       │
//! │  └─────────────────┘   │  barcode        │                             │
//! │                        └─────────────────┘                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ScanSource    │   │   Symbology     │   │ CameraSelection │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Camera         │   │  UPC-A, UPC-E   │   │  Device(id)     │       │
//! │  │  Manual         │   │  EAN-13, EAN-8  │   │  Environment    │       │
//! │  └─────────────────┘   │  Code128/Code39 │   └─────────────────┘       │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::DisplayPrice;

// =============================================================================
// Sentinels
// =============================================================================

/// Name used when the lookup result carries no title.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Description used when neither description, brand nor model is known.
pub const NO_DESCRIPTION: &str = "No description available";

/// Category used when the lookup result carries none.
pub const UNCATEGORIZED: &str = "Uncategorized";

// =============================================================================
// Scan Event
// =============================================================================

/// Where a scanned value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    /// Decoded from the camera stream.
    Camera,
    /// Typed by the user.
    Manual,
}

impl std::fmt::Display for ScanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanSource::Camera => write!(f, "camera"),
            ScanSource::Manual => write!(f, "manual"),
        }
    }
}

/// A barcode value accepted for ingestion.
///
/// Immutable once created: fields are private and only exposed by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScanEvent {
    value: String,
    #[ts(as = "String")]
    timestamp: DateTime<Utc>,
    source: ScanSource,
}

impl ScanEvent {
    /// Creates an event stamped with the given time.
    pub fn new(value: impl Into<String>, timestamp: DateTime<Utc>, source: ScanSource) -> Self {
        ScanEvent {
            value: value.into(),
            timestamp,
            source,
        }
    }

    /// Creates an event stamped with the current time.
    pub fn now(value: impl Into<String>, source: ScanSource) -> Self {
        Self::new(value, Utc::now(), source)
    }

    /// The scanned text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// When the value was accepted.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Camera or manual entry.
    pub fn source(&self) -> ScanSource {
        self.source
    }

    /// Consumes the event, returning the scanned text.
    pub fn into_value(self) -> String {
        self.value
    }
}

// =============================================================================
// Symbology
// =============================================================================

/// Barcode encoding standards accepted by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    UpcA,
    UpcE,
    Ean13,
    Ean8,
    Code128,
    Code39,
}

impl Symbology {
    /// The numeric retail symbologies the scanner asks the decoder for.
    pub const RETAIL: [Symbology; 6] = [
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Code128,
        Symbology::Code39,
    ];
}

impl std::fmt::Display for Symbology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::Code128 => "Code128",
            Symbology::Code39 => "Code39",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Camera Device
// =============================================================================

/// Label fragments that mark a camera as rear-facing.
const REAR_FACING_HINTS: [&str; 3] = ["rear", "back", "environment"];

/// A camera enumerated from the host environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
}

impl CameraDevice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        CameraDevice {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Returns true when the label suggests a rear/back/environment camera.
    ///
    /// ## Example
    /// ```rust
    /// use scanlist_core::CameraDevice;
    ///
    /// assert!(CameraDevice::new("1", "Back Camera").hints_rear_facing());
    /// assert!(CameraDevice::new("2", "camera2 0, facing environment").hints_rear_facing());
    /// assert!(!CameraDevice::new("3", "FaceTime HD").hints_rear_facing());
    /// ```
    pub fn hints_rear_facing(&self) -> bool {
        let label = self.label.to_lowercase();
        REAR_FACING_HINTS.iter().any(|hint| label.contains(hint))
    }

    /// Picks the default device: the first rear-facing one, else the first.
    pub fn pick_default(devices: &[CameraDevice]) -> Option<&CameraDevice> {
        devices
            .iter()
            .find(|d| d.hints_rear_facing())
            .or_else(|| devices.first())
    }
}

/// Which camera a session binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraSelection {
    /// A specific enumerated device.
    Device(String),
    /// No explicit device: ask the host for a rear-facing camera.
    FacingEnvironment,
}

impl std::fmt::Display for CameraSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraSelection::Device(id) => write!(f, "device:{}", id),
            CameraSelection::FacingEnvironment => write!(f, "facing:environment"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product resolved from a scanned barcode.
///
/// ## Identity
/// `id` is `<barcode>-<unix millis at discovery>`, so the same barcode
/// scanned twice yields two list entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Formatted price (`$15.00`) or `N/A`.
    pub average_price: String,
    pub category: String,
    pub barcode: String,
}

impl Product {
    /// Builds the id for a product discovered at `discovered_at`.
    pub fn derive_id(barcode: &str, discovered_at: DateTime<Utc>) -> String {
        format!("{}-{}", barcode, discovered_at.timestamp_millis())
    }

    /// Creates a product, deriving its id from barcode and discovery time.
    pub fn new_discovered(
        barcode: impl Into<String>,
        discovered_at: DateTime<Utc>,
        name: impl Into<String>,
        description: impl Into<String>,
        average_price: DisplayPrice,
        category: impl Into<String>,
    ) -> Self {
        let barcode = barcode.into();
        Product {
            id: Self::derive_id(&barcode, discovered_at),
            name: name.into(),
            description: description.into(),
            average_price: average_price.to_string(),
            category: category.into(),
            barcode,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::TimeZone;

    #[test]
    fn test_scan_event_accessors() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let event = ScanEvent::new("012345678905", ts, ScanSource::Camera);

        assert_eq!(event.value(), "012345678905");
        assert_eq!(event.timestamp(), ts);
        assert_eq!(event.source(), ScanSource::Camera);
        assert_eq!(event.into_value(), "012345678905");
    }

    #[test]
    fn test_retail_symbologies() {
        assert_eq!(Symbology::RETAIL.len(), 6);
        assert!(Symbology::RETAIL.contains(&Symbology::Ean13));
        assert_eq!(Symbology::UpcA.to_string(), "UPC-A");
    }

    #[test]
    fn test_pick_default_prefers_rear_camera() {
        let devices = vec![
            CameraDevice::new("front", "Front Camera"),
            CameraDevice::new("rear", "Rear Camera"),
        ];
        assert_eq!(CameraDevice::pick_default(&devices).unwrap().id, "rear");

        let webcams = vec![
            CameraDevice::new("a", "Integrated Webcam"),
            CameraDevice::new("b", "USB Camera"),
        ];
        assert_eq!(CameraDevice::pick_default(&webcams).unwrap().id, "a");

        assert!(CameraDevice::pick_default(&[]).is_none());
    }

    #[test]
    fn test_product_id_derivation() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let product = Product::new_discovered(
            "012345678905",
            ts,
            "Widget",
            "A widget",
            DisplayPrice::Amount(Money::from_cents(1500)),
            "Tools",
        );

        assert_eq!(product.id, "012345678905-1700000000123");
        assert_eq!(product.average_price, "$15.00");
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product {
            id: "1".into(),
            name: "n".into(),
            description: "d".into(),
            average_price: "N/A".into(),
            category: "c".into(),
            barcode: "b".into(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["averagePrice"], "N/A");
    }
}
