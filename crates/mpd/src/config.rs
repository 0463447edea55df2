use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{MpdError, MpdResult};

pub const DEFAULT_ROOT_URL: &str = "http://test.test/test.mpd";

/// A day of one second segments, with room to spare.
pub const DEFAULT_MAX_SEGMENTS: usize = 200_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Where the manifest was (or would be) retrieved from. Every relative BaseURL
    /// chain is resolved against it.
    pub root_url: String,

    /// Let relative references without a query keep the query of their base.
    pub inherit_query: bool,

    /// Derive a missing `Period@duration` from the next period's start or from
    /// `MPD@mediaPresentationDuration`.
    pub duration_fallback: bool,

    /// Upper bound of urls emitted for one representation of one period. Anything
    /// beyond it is dropped and reported as a diagnostic.
    pub max_segments: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            inherit_query: false,
            duration_fallback: true,
            max_segments: DEFAULT_MAX_SEGMENTS,
        }
    }
}

impl ResolverConfig {
    pub fn new<S>(root_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            root_url: root_url.into(),
            ..Default::default()
        }
    }

    pub fn from_toml(data: &str) -> MpdResult<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn load<P>(path: P) -> MpdResult<Self>
    where
        P: AsRef<Path>,
    {
        let data = std::fs::read_to_string(path)?;
        Self::from_toml(&data)
    }

    pub fn root_url(&self) -> MpdResult<Url> {
        Url::parse(&self.root_url)
            .map_err(|e| MpdError::InvalidRootUrl(self.root_url.clone(), e))
    }
}
