//! HTTP client for the patrol server API.

use anyhow::{Context, Result};
use patrol_core::{EstateStats, Tree};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct CreateEstateBody {
    length: u32,
    width: u32,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Last reachable cell reported when a budget is supplied.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RestPoint {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DronePlan {
    pub distance: u64,
    #[serde(default)]
    pub rest: Option<RestPoint>,
}

/// Client for the estate endpoints of a patrol server.
pub struct PatrolClient {
    base_url: String,
    client: reqwest::Client,
}

impl PatrolClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an estate and return its id.
    pub async fn create_estate(&self, length: u32, width: u32) -> Result<String> {
        let url = format!("{}/estate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&CreateEstateBody { length, width })
            .send()
            .await
            .context("Failed to send create estate request")?;
        let body: IdResponse = Self::parse(response).await?;
        Ok(body.id)
    }

    /// Plant a tree and return its id.
    pub async fn plant_tree(&self, estate_id: &str, tree: &Tree) -> Result<String> {
        let url = format!("{}/estate/{}/tree", self.base_url, estate_id);
        let response = self
            .client
            .post(&url)
            .json(tree)
            .send()
            .await
            .context("Failed to send plant tree request")?;
        let body: IdResponse = Self::parse(response).await?;
        Ok(body.id)
    }

    pub async fn stats(&self, estate_id: &str) -> Result<EstateStats> {
        let url = format!("{}/estate/{}/stats", self.base_url, estate_id);
        let response = self.client.get(&url).send().await?;
        Self::parse(response).await
    }

    /// Fetch the patrol plan, optionally capped at `max_distance`.
    pub async fn drone_plan(
        &self,
        estate_id: &str,
        max_distance: Option<u64>,
    ) -> Result<DronePlan> {
        let url = format!("{}/estate/{}/drone-plan", self.base_url, estate_id);
        let mut builder = self.client.get(&url);
        if let Some(max_distance) = max_distance {
            builder = builder.query(&[("max_distance", max_distance)]);
        }
        let response = builder.send().await?;
        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| "no error body".to_string());
            anyhow::bail!("Server returned {}: {}", status, message);
        }
        Ok(response.json().await?)
    }
}
