// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan exports from the Bamboo REST API

use aeolus_core::{FetchError, PlanGraphFetcher};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches `/rest/api/latest/plan/{key}/specs` from a Bamboo server.
///
/// Authenticates with a personal access token, or with basic auth when a
/// username is given.
#[derive(Clone)]
pub struct BambooRestFetcher {
    url: String,
    username: Option<String>,
    token: String,
    agent: ureq::Agent,
}

impl BambooRestFetcher {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            username: None,
            token: token.into(),
            agent,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn specs_url(&self, plan_key: &str) -> String {
        format!("{}/rest/api/latest/plan/{}/specs?format=yaml", self.url, plan_key)
    }

    fn authorization(&self) -> String {
        match &self.username {
            Some(user) => format!("Basic {}", STANDARD.encode(format!("{}:{}", user, self.token))),
            None => format!("Bearer {}", self.token),
        }
    }
}

impl std::fmt::Debug for BambooRestFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BambooRestFetcher")
            .field("url", &self.url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl PlanGraphFetcher for BambooRestFetcher {
    fn fetch(&self, plan_key: &str) -> Result<String, FetchError> {
        let url = self.specs_url(plan_key);
        let mut response = match self
            .agent
            .get(&url)
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(FetchError::NotFound(plan_key.to_string()))
            }
            Err(e) => return Err(FetchError::Http(format!("GET {}: {}", url, e))),
        };

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Http(format!("failed to read response: {}", e)))?;
        extract_code(&body)
    }
}

/// The plan document is the `spec.code` string of the JSON response
pub fn extract_code(body: &str) -> Result<String, FetchError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    json.pointer("/spec/code")
        .and_then(|code| code.as_str())
        .map(str::to_string)
        .ok_or_else(|| FetchError::InvalidResponse("response has no spec.code".to_string()))
}

#[cfg(test)]
#[path = "bamboo_tests.rs"]
mod tests;
