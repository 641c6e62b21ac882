//! # efactura
//!
//! Jurisdiction-aware e-invoicing engine: per-country compliance rules, VAT
//! calculation, document rendering, and machine-readable e-invoice syntaxes
//! (UBL, CII/Factur-X/ZUGFeRD, FatturaPA, KSeF), with optional embedding of
//! the XML payload inside a PDF/A-3 container.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Everything outside the PDF rasterizer is pure and side-effect-free:
//! configs are resolved from an immutable table built at startup, rules are
//! a function of their inputs, and the only clock involved is supplied by
//! the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use efactura::core::*;
//! use efactura::compliance;
//! use efactura::config;
//! use rust_decimal_macros::dec;
//!
//! let doc = DocumentDataBuilder::new(
//!         DocumentType::Invoice,
//!         "FA-2025-001",
//!         NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
//!     )
//!     .supplier(PartyBuilder::new("ACME SARL", "Paris", "75002", "FR")
//!         .vat_number("FR40123456824")
//!         .company(true)
//!         .build())
//!     .customer(PartyBuilder::new("Client SA", "Lyon", "69001", "FR").build())
//!     .add_line(LineItemBuilder::new("Consulting", dec!(1), dec!(100))
//!         .vat_rate(dec!(20))
//!         .services()
//!         .build())
//!     .build()
//!     .unwrap();
//!
//! let fr = config::get("FR");
//! let ctx = compliance::build_context(&doc.supplier, &doc.customer, &doc.lines);
//! let totals = compliance::calculate_vat(&doc.lines, &fr.vat, Some(&ctx));
//! assert_eq!(totals.total_gross, dec!(120.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Canonical model, country configs, compliance resolver, VAT engine |
//! | `xml` | Format generators (UBL, CII, FatturaPA, KSeF) + builder pipeline |
//! | `pdf` | PDF rasterizer, PDF/A-3 embedding, document service orchestrator |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod config;

#[cfg(feature = "core")]
pub mod compliance;

#[cfg(feature = "xml")]
pub mod formats;

#[cfg(feature = "xml")]
pub mod document;

#[cfg(feature = "pdf")]
pub mod render;

#[cfg(feature = "pdf")]
pub mod service;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
