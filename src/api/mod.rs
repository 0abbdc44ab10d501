//! Jira API client and types.
//!
//! This module provides the interface for communicating with the Jira REST
//! API: authentication, the narrow HTTP seam, and the typed endpoints the
//! reports consume.

pub mod auth;
pub mod error;
pub mod fetch;
pub mod types;

mod client;

pub use client::JiraClient;
pub use error::ApiError;
pub use fetch::{HttpFetcher, ReqwestFetcher};
