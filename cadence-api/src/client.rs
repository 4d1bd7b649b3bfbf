//! Thin reqwest wrapper over the collection endpoints.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use cadence_store::{Fetch, FetchError, Record};

use crate::routes::ResourceRoutes;

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

/// Shared HTTP client bound to the API base URL.
///
/// Transport failures map to [`FetchError::Network`], non-2xx responses to
/// [`FetchError::Server`]. Nothing is retried here; the stores decide what
/// a failed fetch means.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for an API base URL; a trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Server(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::Network(err.to_string()))
    }

    /// Total record count of a collection.
    pub async fn count(&self, count_path: &str) -> Result<u64, FetchError> {
        let response: CountResponse = self.get_json(self.endpoint(count_path), &[]).await?;
        Ok(response.count)
    }

    /// One page window of a collection.
    pub async fn window<T: DeserializeOwned>(
        &self,
        list_path: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<T>, FetchError> {
        let query = [("page", page.to_string()), ("limit", limit.to_string())];
        self.get_json(self.endpoint(list_path), &query).await
    }

    /// A single record with details expanded.
    pub async fn record<T: DeserializeOwned>(
        &self,
        list_path: &str,
        id: i64,
    ) -> Result<T, FetchError> {
        let query = [("details", "true".to_owned())];
        self.get_json(format!("{}/{id}", self.endpoint(list_path)), &query)
            .await
    }
}

/// One collection's [`Fetch`] implementation over the shared client.
pub struct ResourceClient<T> {
    api: Arc<ApiClient>,
    routes: ResourceRoutes,
    _record: PhantomData<fn() -> T>,
}

impl<T> ResourceClient<T> {
    /// Bind a record type to its route table.
    pub fn new(api: Arc<ApiClient>, routes: ResourceRoutes) -> Self {
        Self {
            api,
            routes,
            _record: PhantomData,
        }
    }

    /// The route table this client serves.
    pub fn routes(&self) -> ResourceRoutes {
        self.routes
    }
}

impl<T> Fetch<T> for ResourceClient<T>
where
    T: Record + DeserializeOwned,
{
    async fn count(&self) -> Result<u64, FetchError> {
        self.api.count(self.routes.count).await
    }

    async fn window(&self, page: u32, limit: u32) -> Result<Vec<T>, FetchError> {
        self.api.window(self.routes.list, page, limit).await
    }

    async fn record(&self, id: i64) -> Result<T, FetchError> {
        self.api.record(self.routes.list, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::ApiClient;

    #[test]
    fn endpoint_joins_base_and_path() {
        let api = ApiClient::new("http://localhost:8000");
        assert_eq!(api.endpoint("/posts"), "http://localhost:8000/posts");
    }

    #[test]
    fn trailing_slash_on_the_base_url_is_tolerated() {
        let api = ApiClient::new("http://localhost:8000/");
        assert_eq!(
            api.endpoint("/posts/process/count"),
            "http://localhost:8000/posts/process/count"
        );
    }
}
