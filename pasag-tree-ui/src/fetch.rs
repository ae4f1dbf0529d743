//! Dataset fetching
//!
//! Loads the family dataset relative to the page with `gloo-net`.

use async_trait::async_trait;
use gloo_net::http::Request;
use pasag_tree::dataset::{DatasetSource, LoadError, LoadResult};

/// Fetches the dataset with the browser's fetch API
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchSource;

#[async_trait(?Send)]
impl DatasetSource for FetchSource {
    async fn fetch(&self, path: &str) -> LoadResult<String> {
        let response = Request::get(path)
            .send()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(LoadError::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| LoadError::Network(e.to_string()))
    }
}
