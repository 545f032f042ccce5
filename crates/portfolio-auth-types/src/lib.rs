//! Admin session types shared by the portfolio services.
//!
//! Provides session-token validation, the session cookie builders, and the
//! `AdminSession` extractor.

pub mod cookie;
pub mod session;
pub mod token;
