//! # CSV Export
//!
//! Formats the product list as a CSV document for download.
//!
//! ## Document Shape
//! ```text
//! Nombre,Descripción,Precio Promedio,Categoría,Código de Barras
//! Widget,"Small, blue",$15.00,Tools,012345678905
//! Gadget,No description available,N/A,Uncategorized,7501234567890
//! ```
//!
//! Rows are joined with `\n` and the document has no trailing newline.

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};
use crate::types::Product;

/// Header row, in column order.
pub const CSV_HEADERS: [&str; 5] = [
    "Nombre",
    "Descripción",
    "Precio Promedio",
    "Categoría",
    "Código de Barras",
];

/// Quotes a field when it contains a comma, quote or line break.
///
/// ## Example
/// ```rust
/// use scanlist_core::export::escape_field;
///
/// assert_eq!(escape_field("plain"), "plain");
/// assert_eq!(escape_field("a,b"), "\"a,b\"");
/// assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the header plus one row per product, in collection order.
pub fn to_csv(products: &[Product]) -> CoreResult<String> {
    if products.is_empty() {
        return Err(CoreError::ExportEmpty);
    }

    let mut lines = Vec::with_capacity(products.len() + 1);
    lines.push(row(CSV_HEADERS));
    for product in products {
        lines.push(row([
            product.name.as_str(),
            product.description.as_str(),
            product.average_price.as_str(),
            product.category.as_str(),
            product.barcode.as_str(),
        ]));
    }

    Ok(lines.join("\n"))
}

/// `productos_YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("productos_{}.csv", date.format("%Y-%m-%d"))
}

/// A finished export: file name plus document contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub contents: String,
}

impl CsvExport {
    pub fn build(products: &[Product], date: NaiveDate) -> CoreResult<Self> {
        Ok(CsvExport {
            filename: export_filename(date),
            contents: to_csv(products)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
