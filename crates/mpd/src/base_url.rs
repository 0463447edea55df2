use url::Url;

use crate::error::{MpdError, MpdResult};

/// Resolve a BaseURL chain, ordered from the outermost level (MPD) to the innermost
/// (Representation), against the url the manifest was retrieved from.
///
/// Levels without a BaseURL leave the accumulated base unchanged.
pub fn resolve_chain(root: &Url, chain: &[Option<&str>], inherit_query: bool) -> MpdResult<Url> {
    chain
        .iter()
        .flatten()
        .try_fold(root.clone(), |base, reference| {
            merge_baseurls(&base, reference, inherit_query)
        })
}

/// Resolve `new` against `current` following RFC 3986 reference resolution.
///
/// An absolute reference replaces the base outright. With `inherit_query` enabled, a
/// relative reference without a query of its own keeps the query of `current`:
///
/// ```text
/// merge(https://example.com/manifest.mpd?auth=secret, /video42.mp4)
///   => https://example.com/video42.mp4?auth=secret
/// merge(https://example.com/manifest.mpd?auth=old, /video42.mp4?auth=new)
///   => https://example.com/video42.mp4?auth=new
/// ```
pub fn merge_baseurls(current: &Url, new: &str, inherit_query: bool) -> MpdResult<Url> {
    let new = new.trim();
    if is_absolute_url(new) {
        return Url::parse(new).map_err(|source| resolution_error(current, new, source));
    }

    let mut merged = current
        .join(new)
        .map_err(|source| resolution_error(current, new, source))?;
    if inherit_query && merged.query().is_none() {
        merged.set_query(current.query());
    }
    Ok(merged)
}

pub(crate) fn is_absolute_url(s: &str) -> bool {
    s.starts_with("http://")
        || s.starts_with("https://")
        || s.starts_with("file://")
        || s.starts_with("ftp://")
}

fn resolution_error(base: &Url, reference: &str, source: url::ParseError) -> MpdError {
    MpdError::UrlResolution {
        base: base.clone(),
        reference: reference.to_string(),
        source,
    }
}
