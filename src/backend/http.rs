use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::{Collection, Filter, ResourceStore};
use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::models::Patch;

/// HTTP client for the REST-style sales backend
///
/// Collections live at `{base_url}/{collection}` and single records at
/// `{base_url}/{collection}/{id}`. Listing filters travel as query
/// parameters (`?dealerId=1&agentId=2`).
pub struct HttpDataAccess {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDataAccess {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::Configuration(format!("Invalid api.base_url '{}': {}", config.base_url, e))
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, collection: Collection, id: Option<u32>) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AppError::Configuration(format!("Base URL {} cannot hold a path", self.base_url))
            })?;
            segments.pop_if_empty().push(collection.as_str());
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: Option<&Filter>,
        body: Option<&Value>,
    ) -> AppResult<Value> {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(url.path().trim_start_matches('/').to_string()));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("{} {} failed with status {}: {}", method, url, status, detail);
            return Err(AppError::Backend(format!(
                "{} {} returned {}",
                method, url, status
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ResourceStore for HttpDataAccess {
    async fn list(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Value>> {
        let url = self.url(collection, None)?;
        match self.send(Method::GET, url, Some(filter), None).await? {
            Value::Array(records) => Ok(records),
            other => Err(AppError::Backend(format!(
                "Expected an array from /{}, got {}",
                collection, other
            ))),
        }
    }

    async fn get(&self, collection: Collection, id: u32) -> AppResult<Value> {
        let url = self.url(collection, Some(id))?;
        self.send(Method::GET, url, None, None).await
    }

    async fn create(&self, collection: Collection, body: Value) -> AppResult<Value> {
        let url = self.url(collection, None)?;
        self.send(Method::POST, url, None, Some(&body)).await
    }

    async fn patch(&self, collection: Collection, id: u32, patch: &Patch) -> AppResult<Value> {
        let url = self.url(collection, Some(id))?;
        let body = Value::Object(patch.clone());
        self.send(Method::PATCH, url, None, Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpDataAccess {
        HttpDataAccess::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_collection_urls() {
        let api = client("http://localhost:3000");
        assert_eq!(
            api.url(Collection::Packages, None).unwrap().as_str(),
            "http://localhost:3000/packages"
        );
        assert_eq!(
            api.url(Collection::Applications, Some(7)).unwrap().as_str(),
            "http://localhost:3000/applications/7"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let api = client("https://api.example.co.ke/v1/");
        assert_eq!(
            api.url(Collection::Salesmen, Some(3)).unwrap().as_str(),
            "https://api.example.co.ke/v1/salesmen/3"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpDataAccess::new(&ApiConfig {
            base_url: "localhost".to_string(),
            timeout_secs: 5,
        });
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
