//! # MPEG-DASH segment url resolution
//!
//! Turns an MPD manifest into the complete, ordered list of segment urls of every
//! `Representation`, initialization segment first.
//!
//! ```text
//!  bytes ──► mpd::parse ──► Mpd
//!                            │ for each Period / AdaptationSet / Representation
//!                            ▼
//!            base_url::resolve_chain      BaseURL of MPD ► Period ► AdaptationSet ► Representation
//!            InheritedAddressingValues    nearest SegmentList / SegmentTemplate
//!            PeriodDuration               Period@duration, or derived from @start
//!                            │
//!                            ▼
//!            SegmentEnumerator ──► SegmentList │ SegmentTimeline │ @endNumber │ @duration │ BaseURL
//!                            │
//!                            ▼
//!            SegmentMap { id => [url, ...] }   urls of a recurring id concatenated in period order
//! ```
//!
//! Only a malformed document is fatal. Any other failure is reported as a
//! [`Diagnostic`](result::Diagnostic) of the representation it happened in, and the
//! remaining representations are resolved as usual.
//!
//! ```no_run
//! # fn run() -> iori_mpd::MpdResult<()> {
//! let manifest = std::fs::read("manifest.mpd")?;
//! let config = iori_mpd::ResolverConfig::new("https://example.com/vod/manifest.mpd");
//! let resolved = iori_mpd::resolve(&manifest, &config)?;
//! for (id, urls) in resolved.segments.iter() {
//!     println!("{id}: {} segments", urls.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod base_url;
pub mod config;
pub mod duration;
pub mod error;
pub mod mpd;
pub mod result;
pub mod segment;
pub mod template;
pub mod timeline;

pub use config::ResolverConfig;
pub use error::{MpdError, MpdResult};
pub use result::{Diagnostic, ResolvedManifest, SegmentMap};

use url::Url;

use crate::{
    duration::PeriodDuration,
    mpd::Mpd,
    segment::{InheritedAddressingValues, SegmentEnumerator},
};

/// Parse `manifest` and resolve the segment urls of all its representations.
pub fn resolve(manifest: &[u8], config: &ResolverConfig) -> MpdResult<ResolvedManifest> {
    MpdResolver::new(config.clone())?.resolve(manifest)
}

pub struct MpdResolver {
    root_url: Url,
    config: ResolverConfig,
}

impl MpdResolver {
    pub fn new(config: ResolverConfig) -> MpdResult<Self> {
        Ok(Self {
            root_url: config.root_url()?,
            config,
        })
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn resolve(&self, manifest: &[u8]) -> MpdResult<ResolvedManifest> {
        let mpd = mpd::parse(manifest)?;
        Ok(self.resolve_mpd(&mpd))
    }

    pub fn resolve_mpd(&self, mpd: &Mpd) -> ResolvedManifest {
        if mpd.mpd_type.as_deref() == Some("dynamic") {
            tracing::warn!("Dynamic MPD is resolved as a static snapshot");
        }

        let mut resolved = ResolvedManifest::default();

        for (period_index, period) in mpd.periods.iter().enumerate() {
            let period_duration =
                PeriodDuration::of(mpd, period_index, self.config.duration_fallback);
            tracing::debug!(
                period = period_index,
                id = period.id.as_deref().unwrap_or(""),
                ?period_duration,
                "Resolving period"
            );

            for adaptation_set in period.adaptation_sets.iter() {
                for representation in adaptation_set.representations.iter() {
                    let chain = [
                        mpd.base_url(),
                        period.base_url(),
                        adaptation_set.base_url(),
                        representation.base_url(),
                    ];

                    let base_url = match base_url::resolve_chain(
                        &self.root_url,
                        &chain,
                        self.config.inherit_query,
                    ) {
                        Ok(base_url) => base_url,
                        Err(error) => {
                            tracing::warn!(
                                representation = %representation.id,
                                period = period_index,
                                %error,
                                "Failed to resolve BaseURL"
                            );
                            resolved.segments.append(&representation.id, Vec::new());
                            resolved.diagnostics.push(Diagnostic {
                                representation_id: representation.id.clone(),
                                period: period_index,
                                error,
                            });
                            continue;
                        }
                    };

                    let segments = SegmentEnumerator {
                        representation,
                        addressing: InheritedAddressingValues::resolve(
                            period,
                            adaptation_set,
                            representation,
                        ),
                        period_duration,
                        base_url: &base_url,
                        has_base_url: chain.iter().any(Option::is_some),
                        inherit_query: self.config.inherit_query,
                        max_segments: self.config.max_segments,
                    }
                    .enumerate();

                    tracing::debug!(
                        representation = %representation.id,
                        period = period_index,
                        strategy = ?segments.strategy,
                        "{} segments resolved",
                        segments.urls.len()
                    );
                    resolved.segments.append(&representation.id, segments.urls);
                    resolved
                        .diagnostics
                        .extend(segments.errors.into_iter().map(|error| Diagnostic {
                            representation_id: representation.id.clone(),
                            period: period_index,
                            error,
                        }));
                }
            }
        }

        resolved
    }
}
