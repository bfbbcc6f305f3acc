//! # card_identifier
//!
//! Card brand identification from a data-driven BIN catalog.
//!
//! ## Features
//!
//! - Brand classification from BIN regexes plus accepted lengths
//! - Deterministic resolution of overlapping brands via `priority_over`
//! - Fine-grained BIN records with issuer metadata
//! - Luhn checksum and per-brand CVV validation
//! - Static conflict detection across the whole catalog
//! - JSON catalog loading with structural validation and lint
//!
//! ## Quick Start
//!
//! ```rust
//! use card_identifier::{luhn_valid, Catalog};
//!
//! let catalog = Catalog::builtin().unwrap();
//!
//! let result = catalog.classify("4012001037141112").unwrap();
//! assert_eq!(result.scheme(), "visa");
//! assert!(luhn_valid("4012001037141112"));
//!
//! // Classification never normalizes its input
//! assert!(catalog.classify("4012-0010-3714-1112").is_none());
//! ```
//!
//! ## Overlapping Brands
//!
//! ```rust
//! use card_identifier::{BinPattern, Brand, CardType, Catalog};
//!
//! let catalog = Catalog::new(vec![
//!     Brand::new("elo", "Elo", CardType::Credit)
//!         .pattern(BinPattern::new("^(506699|5067[0-6]\\d)", &[16], true, 3).unwrap())
//!         .priority_over(["aura"]),
//!     Brand::new("aura", "Aura", CardType::Credit)
//!         .pattern(BinPattern::new("^50", &[16, 19], true, 3).unwrap()),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.classify("5066990000000000").unwrap().scheme(), "elo");
//! assert_eq!(catalog.classify("5000000000000000").unwrap().scheme(), "aura");
//! ```
//!
//! ## CVV Validation
//!
//! ```rust
//! use card_identifier::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! assert!(catalog.validate_cvv("123", "visa"));
//! assert!(catalog.validate_cvv("1234", "amex"));
//! assert!(!catalog.validate_cvv("123", "unknown-scheme"));
//! ```
//!
//! ## Conflict Detection
//!
//! ```rust
//! use card_identifier::conflict::{ConflictReport, DetectorConfig};
//! use card_identifier::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let report = ConflictReport::generate(&catalog, &DetectorConfig::default());
//! assert!(report.conflicts.iter().any(|c| c.shared_bin_prefix == "506699"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `json` | JSON catalog loader and serde support |
//! | `parallel` | Rayon-based batch classification and conflict detection |
//! | `cli` | `cardid` command-line tool |
//! | `full` | `json` + `parallel` |
//!
//! ## Security
//!
//! Card numbers are never logged in full. Every trace event goes through
//! [`mask::mask_number`], and [`cvv::ValidatedCvv`] masks itself in `Debug`
//! and `Display`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
pub mod catalog;
pub mod conflict;
pub mod cvv;
pub mod detail;
pub mod error;
pub mod luhn;
pub mod mask;
pub mod matcher;
pub mod resolve;

// Re-export main types at crate root
pub use batch::BatchClassifier;
#[cfg(feature = "json")]
pub use catalog::JsonCatalogLoader;
pub use catalog::{BinPattern, Brand, CardType, Catalog, CatalogWarning, FineBinRecord};
pub use conflict::{detect_conflicts, Conflict, ConflictReport, DetectorConfig};
pub use error::{CatalogError, CatalogIssue, ValidationError};
pub use luhn::luhn_valid;
pub use resolve::{CardSummary, Classification};
