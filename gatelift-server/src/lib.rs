#![warn(missing_docs)]
//! Gatelift Server
//!
//! The dashboard binary's library: configuration loading, the analysis
//! pipeline (load → clean → aggregate → test → report), and the axum router
//! serving the single-page dashboard plus the analyze endpoint.

pub mod analysis;
pub mod api;
pub mod config;
mod page;
