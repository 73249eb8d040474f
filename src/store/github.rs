use crate::error::{BuildNumberError, Result};
use crate::store::BuildNumberStore;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};

/// Identifies the GitHub release whose description holds the counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCoordinates {
    pub owner: String,
    pub repo: String,
    pub release_id: u64,
}

#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReleaseBodyUpdate<'a> {
    body: &'a str,
}

/// Uses the description ("body") of a GitHub release as a blob store.
pub struct GitHubReleaseStore {
    client: Client,
    api_url: String,
    token: String,
    coordinates: ReleaseCoordinates,
}

impl GitHubReleaseStore {
    /// Build a store talking to `api_url` (normally `https://api.github.com`).
    pub fn new(
        api_url: &str,
        token: impl Into<String>,
        coordinates: ReleaseCoordinates,
        user_agent: &str,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(GitHubReleaseStore {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            coordinates,
        })
    }

    /// REST endpoint of the storage release
    pub fn release_url(&self) -> String {
        release_url(&self.api_url, &self.coordinates)
    }

    pub fn coordinates(&self) -> &ReleaseCoordinates {
        &self.coordinates
    }
}

fn release_url(api_url: &str, coordinates: &ReleaseCoordinates) -> String {
    format!(
        "{}/repos/{}/{}/releases/{}",
        api_url, coordinates.owner, coordinates.repo, coordinates.release_id
    )
}

fn update_body(payload: &[u8]) -> Result<serde_json::Value> {
    let body = std::str::from_utf8(payload)
        .map_err(|e| BuildNumberError::codec(format!("payload is not UTF-8: {}", e)))?;
    serde_json::to_value(ReleaseBodyUpdate { body })
        .map_err(|e| BuildNumberError::codec(e.to_string()))
}

impl BuildNumberStore for GitHubReleaseStore {
    fn load(&self) -> Result<Vec<u8>> {
        let url = self.release_url();
        debug!("GET {}", url);

        let release: Release = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()?
            .error_for_status()?
            .json()?;

        Ok(release.body.unwrap_or_default().into_bytes())
    }

    fn save(&self, payload: &[u8]) -> Result<()> {
        let url = self.release_url();
        let update = update_body(payload)?;
        debug!("PATCH {} ({} bytes)", url, payload.len());

        self.client
            .patch(&url)
            .bearer_auth(&self.token)
            .json(&update)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "GitHub release {} of {}/{}",
            self.coordinates.release_id, self.coordinates.owner, self.coordinates.repo
        )
    }
}
