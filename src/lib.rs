//! Credit scoring dashboard.
//!
//! Collects a loan applicant's attributes, sends them to a remote
//! Prediction API, and shows the default probability against a fixed
//! approval threshold, either through the embedded web dashboard or the
//! command line.

pub mod applicant;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod lookup;
pub mod scoring;
pub mod web;
