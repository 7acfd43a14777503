//! Finvault Connect - aggregation provider integration.
//!
//! This crate implements the core `AssetReportClient` trait against the
//! Plaid asset report API.

pub mod client;

pub use client::{PlaidApiClient, PlaidConfig, PlaidEnvironment, DEFAULT_DAYS_REQUESTED};
