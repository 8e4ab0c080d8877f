//! Locale code handling.
//!
//! # Architecture
//!
//! - `registry`: Static remapping tables between locale folders, catalog
//!   `target-language` codes, and Pontoon codes
//!
//! # Example
//!
//! ```rust,ignore
//! use xliff_l10n::i18n::LocaleRegistry;
//!
//! let code = LocaleRegistry::get().catalog_code("sv_SE"); // "sv"
//! ```

mod registry;

pub use registry::{LocaleMapping, LocaleRegistry};
