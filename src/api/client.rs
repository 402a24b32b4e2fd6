//! Blocking HTTP client for the cloud controller.
//!
//! Thin by design: requests carry the bearer token from config, responses
//! deserialize straight into the models, and every failure collapses into an
//! [`ApiError`] with the server's message intact.

use serde::Deserialize;
use tracing::debug;

use crate::api::{ApiError, Buildpack, BuildpackBitsRepository, BuildpackRepository};
use crate::config::CoreConfig;

pub struct CloudController {
    endpoint: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuildpackList {
    resources: Vec<Buildpack>,
}

impl CloudController {
    pub fn from_config(config: &CoreConfig) -> Self {
        CloudController {
            endpoint: config.api_endpoint.clone(),
            token: config.access_token.clone(),
        }
    }

    fn url(&self, path: &str) -> Result<String, ApiError> {
        let endpoint = self.endpoint.as_deref().ok_or(ApiError::NoEndpoint)?;
        Ok(format!("{}{}", endpoint.trim_end_matches('/'), path))
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        debug!(method, url, "cloud controller request");
        let req = ureq::request(method, url).set("Accept", "application/json");
        match self.token.as_deref() {
            Some(token) => req.set("Authorization", &format!("bearer {}", token)),
            None => req,
        }
    }
}

fn remote_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = server_message(&body).unwrap_or(body);
            ApiError::Remote(format!("Server error, status code: {}\n{}", code, message.trim()))
        }
        ureq::Error::Transport(t) => ApiError::Remote(t.to_string()),
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("description")?.as_str().map(str::to_owned)
}

impl BuildpackRepository for CloudController {
    fn list(&self) -> Result<Vec<Buildpack>, ApiError> {
        let url = self.url("/v2/buildpacks")?;
        let list: BuildpackList = self
            .request("GET", &url)
            .call()
            .map_err(remote_error)?
            .into_json()
            .map_err(|e| ApiError::Remote(e.to_string()))?;
        Ok(list.resources)
    }

    fn find_by_name(&self, name: &str) -> Result<Buildpack, ApiError> {
        let url = self.url("/v2/buildpacks")?;
        let list: BuildpackList = self
            .request("GET", &url)
            .query("q", &format!("name:{}", name))
            .call()
            .map_err(remote_error)?
            .into_json()
            .map_err(|e| ApiError::Remote(e.to_string()))?;
        list.resources
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::not_found("Buildpack", name))
    }

    fn update(&self, buildpack: &Buildpack) -> Result<Buildpack, ApiError> {
        let url = self.url(&format!("/v2/buildpacks/{}", buildpack.guid))?;
        self.request("PUT", &url)
            .send_json(serde_json::json!({
                "position": buildpack.position,
                "enabled": buildpack.enabled,
                "locked": buildpack.locked,
            }))
            .map_err(remote_error)?
            .into_json()
            .map_err(|e| ApiError::Remote(e.to_string()))
    }

    fn delete(&self, guid: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/v2/buildpacks/{}", guid))?;
        self.request("DELETE", &url).call().map_err(remote_error)?;
        Ok(())
    }
}

impl BuildpackBitsRepository for CloudController {
    fn upload(&self, buildpack: &Buildpack, path: &str) -> Result<(), ApiError> {
        let bits = std::fs::read(path)
            .map_err(|e| ApiError::Remote(format!("Failed to read '{}': {}", path, e)))?;
        let url = self.url(&format!("/v2/buildpacks/{}/bits", buildpack.guid))?;
        self.request("PUT", &url)
            .set("Content-Type", "application/zip")
            .send_bytes(&bits)
            .map_err(remote_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_endpoint_is_reported_before_any_request() {
        let client = CloudController::from_config(&CoreConfig::default());
        match client.list() {
            Err(ApiError::NoEndpoint) => {}
            other => panic!("expected NoEndpoint, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn server_message_extracts_description() {
        let body = r#"{"code": 10003, "description": "You are not authorized"}"#;
        assert_eq!(server_message(body).as_deref(), Some("You are not authorized"));
        assert_eq!(server_message("not json"), None);
    }
}
