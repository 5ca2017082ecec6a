//! Options Trade-History Analyzer
//!
//! Parses brokerage account-statement CSVs, extracts option executions from
//! their free-text descriptions, splits each contract's history into closed
//! round trips and reports realized P&L per round trip and across uploads.
//!
//! ## Architecture
//!
//! ```text
//! Upload (axum) → Ingest (rows) → Extract (description grammar)
//!                      → Pipeline (group → segment → price) → Report
//!                                                                ↓
//!                                             Running totals (shared state)
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod pipeline;
pub mod server;
pub mod types;
