//! # Reconcile Core
//!
//! A library for reconciling bank-account statement exports against
//! previously stored transaction records, producing a classified diff.
//!
//! ## Features
//!
//! - **Wildcard column mapping**: map unpredictable, user-defined CSV
//!   headers onto semantic record fields with `*`/`?` patterns
//! - **Locale-aware amount parsing**: exact decimals with configurable or
//!   auto-detected `,`/`.` separator conventions
//! - **Scored record matching**: date-bucketed, greedy best-match pairing
//!   between records that share no stable identifier
//! - **Classified diff**: every record ends up in exactly one pair entry
//!   (`New`, `Deleted`, `Modified` or `Unmodified`)
//! - **Storage abstraction**: database-agnostic design with a trait-based
//!   record store
//!
//! ## Quick Start
//!
//! ```rust
//! use reconcile_core::{ImportSettings, ReconciliationEngine};
//!
//! let settings = ImportSettings::new(
//!     [
//!         ("date", "Buchungstag|Datum|Date"),
//!         ("amount", "Betrag*|Amount*"),
//!         ("subject", "Verwendungszweck|Subject"),
//!         ("iban", "IBAN*"),
//!     ],
//!     ["###.##0,0#", "###,##0.0#"],
//! )
//! .unwrap();
//!
//! let engine = ReconciliationEngine::new();
//! // Parse rows with a ColumnMap, then engine.reconcile(&read, &stored).
//! ```

pub mod importer;
pub mod mapping;
pub mod numeric;
pub mod pattern;
pub mod reconcile;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use importer::*;
pub use mapping::*;
pub use numeric::*;
pub use pattern::*;
pub use reconcile::*;
pub use traits::*;
pub use types::*;
