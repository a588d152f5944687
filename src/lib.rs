//! jepx-spot: daily JEPX spot prices
//!
//! This library provides the core components for:
//! - Fetching and parsing the JEPX spot summary CSV
//! - Reshaping tomorrow's rows into area → time → price documents
//! - Storing documents in Firestore and publishing MessagePack files to Cloud Storage
//! - Serving stored prices through a validated HTTP query API
//! - Structured logging and Prometheus metrics

pub mod api;
pub mod area;
pub mod cli;
pub mod config;
pub mod feed;
pub mod ingest;
pub mod price;
pub mod store;
pub mod telemetry;
