//! Shared building blocks for the portfolio backend services.
//!
//! Configuration loading, the JSON error envelope, health probes, HTTP middleware
//! and tracing setup.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod tracing;
