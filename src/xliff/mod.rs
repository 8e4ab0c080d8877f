//! XLIFF 1.2 document model.
//!
//! Catalogs are parsed into a small owned element tree so they can be cloned
//! per locale, edited in place, and written back with normalized indentation.
//!
//! # Architecture
//!
//! - `document`: Element tree and parser (built on `quick-xml` events)
//! - `writer`: Serializer producing the exact declaration and indentation Pontoon expects
//! - `unit`: Typed views over `<trans-unit>` elements and the edits the tools apply
//! - `error`: Parse and I/O errors

mod document;
mod error;
mod unit;
mod writer;

pub use document::{Document, Element, Node};
pub use error::XliffError;
pub use unit::{TransUnit, UnitMut};

/// Namespace declared by XLIFF 1.2 documents.
pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

/// XML declaration written in front of every catalog.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
