//! gt-gas: gas mixtures and electron-transport tables for gastable.
//!
//! Provides:
//! - Mixture parsing, validation, normalization and canonical naming
//! - Electric-field set construction (explicit values, linear/log ranges)
//! - `TransportEngine` trait isolating the transport simulation backend
//! - Analytic backend for common detector gases
//! - `TransportTable`: generation, persistence, merge and per-field queries
//! - Exchange report and output file naming
//!
//! # Example
//!
//! ```no_run
//! use gt_gas::{AnalyticEngine, FieldSetSpec, Mixture, TransportTable, build_report};
//!
//! let mixture = Mixture::from_tokens(&["Ar", "97.7", "C4H10"]).unwrap();
//! let fields = FieldSetSpec::explicit(vec![100.0, 500.0, 1000.0]).build().unwrap();
//!
//! let mut table = TransportTable::from_mixture(mixture);
//! table.generate(&AnalyticEngine::new(), fields.values(), 10, false).unwrap();
//! table.write("ar-c4h10.gas").unwrap();
//!
//! let report = build_report(&table, &[]);
//! println!("{}", report.to_json_pretty().unwrap());
//! ```

pub mod analytic;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod fields;
pub mod file;
pub mod mixture;
pub mod naming;
pub mod report;
pub mod table;

// Re-exports for ergonomics
pub use analytic::AnalyticEngine;
pub use catalog::{GasCatalogEntry, lookup_gas};
pub use engine::{FieldPoint, MediumSpec, TransportEngine, TransportSample};
pub use error::{GasError, GasResult};
pub use fields::{FieldRange, FieldSet, FieldSetSpec, MAX_RANGE_POINTS, Spacing};
pub use mixture::{Component, MAX_COMPONENTS, Mixture, TokenKind, classify_token};
pub use naming::output_file_name;
pub use report::{GasReport, ReportComponents, build_report};
pub use table::{Environment, MergeSummary, TableRow, TransportTable};
