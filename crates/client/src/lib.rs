//! # Direct API Client
//!
//! Typed client for the direct API server plus the demonstration flow run
//! by the `direct-api-client` binary.

pub mod client;
pub mod demo;
pub mod error;

pub use client::{DirectClient, Registration, ServerStatus};
pub use demo::{DemoReport, run_demo};
pub use error::{ClientError, Result};
