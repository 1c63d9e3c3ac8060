mod traits;
mod http;

pub use traits::{ContentSource, SourceInfo};
pub use http::HttpSource;

use crate::config::ApiConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a content source from configuration
pub fn create_source(config: &ApiConfig) -> Result<Arc<dyn ContentSource>> {
    let source = HttpSource::new(config.base_url.clone(), config.timeout())?;

    Ok(Arc::new(source))
}
