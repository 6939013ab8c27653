//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // System Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Get home request failed")
    }

    /// GET /health
    pub async fn get_health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Get health request failed")
    }

    // ========================================================================
    // Recommendation Endpoints
    // ========================================================================

    /// GET /recommend/content?user={user}
    pub async fn recommend_content(&self, user: &str) -> Response {
        self.client
            .get(format!("{}/recommend/content", self.base_url))
            .query(&[("user", user)])
            .send()
            .await
            .expect("Recommend content request failed")
    }

    /// GET /recommend/content?user={user}&from_year={from}&to_year={to}
    pub async fn recommend_content_in_years(
        &self,
        user: &str,
        from_year: &str,
        to_year: &str,
    ) -> Response {
        self.client
            .get(format!("{}/recommend/content", self.base_url))
            .query(&[("user", user), ("from_year", from_year), ("to_year", to_year)])
            .send()
            .await
            .expect("Recommend content in years request failed")
    }

    /// GET /recommend/collab?user={user}
    pub async fn recommend_collab(&self, user: &str) -> Response {
        self.client
            .get(format!("{}/recommend/collab", self.base_url))
            .query(&[("user", user)])
            .send()
            .await
            .expect("Recommend collab request failed")
    }

    /// GET /recommend/hybrid?user={user}
    pub async fn recommend_hybrid(&self, user: &str) -> Response {
        self.client
            .get(format!("{}/recommend/hybrid", self.base_url))
            .query(&[("user", user)])
            .send()
            .await
            .expect("Recommend hybrid request failed")
    }

    /// GET /recommend/theme?query={query}
    pub async fn recommend_theme(&self, query: &str) -> Response {
        self.client
            .get(format!("{}/recommend/theme", self.base_url))
            .query(&[("query", query)])
            .send()
            .await
            .expect("Recommend theme request failed")
    }

    /// GET an arbitrary path with a raw query string
    pub async fn get_raw(&self, path_and_query: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path_and_query))
            .send()
            .await
            .expect("Raw request failed")
    }
}
