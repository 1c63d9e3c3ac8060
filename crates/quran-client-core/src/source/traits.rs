use async_trait::async_trait;
use serde_json::Value;
use crate::error::Result;

/// Information about a content source
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Human-readable name
    pub name: &'static str,
    /// Base URL requests are resolved against
    pub base_url: String,
}

/// Trait for upstream content backends
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Get information about this source
    fn info(&self) -> SourceInfo;

    /// Get the source name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Issue one GET for `path` with the given query pairs and return the JSON body
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;
}
