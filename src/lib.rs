// Copyright 2026 Benchscrape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Stateful search client and record extractor for Tyler Benchmark court
//! portals.
//!
//! The pipeline runs landing-page bootstrap (anti-forgery cookie plus form
//! token), form-POST search, response classification, DataTables pagination,
//! and details-page extraction enriched by the portal's XHR fragments.

pub mod cli;
pub mod client;
pub mod error;
pub mod extract;
pub mod http;
pub mod portal;
pub mod search;
pub mod session;
