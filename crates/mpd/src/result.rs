use indexmap::IndexMap;
use serde::Serialize;
use url::Url;

use crate::error::MpdError;

/// Representation id to its ordered segment urls.
///
/// Ids keep the order in which they first appear in the manifest. A representation
/// id seen in several periods accumulates the urls of every period, in period order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SegmentMap(IndexMap<String, Vec<String>>);

impl SegmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `urls` after everything already collected for `id`.
    ///
    /// The id is registered even when `urls` is empty.
    pub fn append<I>(&mut self, id: &str, urls: I)
    where
        I: IntoIterator<Item = Url>,
    {
        self.0
            .entry(id.to_string())
            .or_default()
            .extend(urls.into_iter().map(String::from));
    }

    pub fn get(&self, id: &str) -> Option<&[String]> {
        self.0.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// An error isolated to one representation of one period.
#[derive(Debug)]
pub struct Diagnostic {
    pub representation_id: String,
    pub period: usize,
    pub error: MpdError,
}

#[derive(Debug, Default)]
pub struct ResolvedManifest {
    pub segments: SegmentMap,
    pub diagnostics: Vec<Diagnostic>,
}
