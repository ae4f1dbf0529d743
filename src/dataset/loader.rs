//! Dataset Loader
//!
//! Fetches the family dataset from a [`DatasetSource`] and parses it into
//! ordered [`FamilyMember`] records. Publishing the snapshot and notifying the
//! views is done by the page session; this module only reads and parses.

use async_trait::async_trait;

use super::error::{LoadError, LoadResult};
use super::types::FamilyMember;

/// Somewhere the dataset text can be fetched from
///
/// Futures are not required to be `Send`: in the browser the fetch runs on
/// the single UI thread.
#[async_trait(?Send)]
pub trait DatasetSource {
    /// Fetch the raw dataset text at `path`
    async fn fetch(&self, path: &str) -> LoadResult<String>;
}

/// Parse dataset text into members, preserving order
pub fn parse_members(text: &str) -> LoadResult<Vec<FamilyMember>> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    match value {
        serde_json::Value::Array(items) => {
            Ok(items.into_iter().map(FamilyMember::from_value).collect())
        }
        serde_json::Value::Object(_) => Err(LoadError::NotAList("an object")),
        serde_json::Value::String(_) => Err(LoadError::NotAList("a string")),
        serde_json::Value::Number(_) => Err(LoadError::NotAList("a number")),
        serde_json::Value::Bool(_) => Err(LoadError::NotAList("a boolean")),
        serde_json::Value::Null => Err(LoadError::NotAList("null")),
    }
}

/// Fetch and parse the dataset at `path`
pub async fn load<S>(source: &S, path: &str) -> LoadResult<Vec<FamilyMember>>
where
    S: DatasetSource + ?Sized,
{
    let text = source.fetch(path).await?;
    let members = parse_members(&text)?;
    tracing::debug!(path, entries = members.len(), "Parsed family dataset");
    Ok(members)
}

/// Dataset held in memory, mostly useful for previews and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait(?Send)]
impl DatasetSource for StaticSource {
    async fn fetch(&self, _path: &str) -> LoadResult<String> {
        Ok(self.text.clone())
    }
}

#[cfg(feature = "native")]
pub use native::{FileSource, HttpSource, NativeSource};

#[cfg(feature = "native")]
mod native {
    use super::*;
    use std::path::PathBuf;

    /// Reads the dataset from the local filesystem, relative to `root`
    #[derive(Debug, Clone, Default)]
    pub struct FileSource {
        root: PathBuf,
    }

    impl FileSource {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    #[async_trait(?Send)]
    impl DatasetSource for FileSource {
        async fn fetch(&self, path: &str) -> LoadResult<String> {
            let full = self.root.join(path);
            Ok(tokio::fs::read_to_string(&full).await?)
        }
    }

    /// Fetches the dataset over HTTP
    #[derive(Debug, Clone, Default)]
    pub struct HttpSource {
        client: reqwest::Client,
    }

    impl HttpSource {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait(?Send)]
    impl DatasetSource for HttpSource {
        async fn fetch(&self, path: &str) -> LoadResult<String> {
            let response = self
                .client
                .get(path)
                .send()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(LoadError::Status {
                    path: path.to_string(),
                    status: response.status().as_u16(),
                });
            }

            response
                .text()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))
        }
    }

    /// Picks HTTP for `http(s)://` paths and the filesystem otherwise
    #[derive(Debug, Clone, Default)]
    pub struct NativeSource {
        file: FileSource,
        http: HttpSource,
    }

    impl NativeSource {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self {
                file: FileSource::new(root),
                http: HttpSource::default(),
            }
        }
    }

    #[async_trait(?Send)]
    impl DatasetSource for NativeSource {
        async fn fetch(&self, path: &str) -> LoadResult<String> {
            if path.starts_with("http://") || path.starts_with("https://") {
                self.http.fetch(path).await
            } else {
                self.file.fetch(path).await
            }
        }
    }
}
