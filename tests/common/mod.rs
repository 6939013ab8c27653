//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, USER_MINA};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_content_recommendations() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.recommend_content(USER_MINA).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;
