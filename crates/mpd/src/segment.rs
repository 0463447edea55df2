//! Segment enumeration of a single representation.
//!
//! References:
//! - [DASH-IF implementation guidelines: restricted timing model](https://dashif.org/Guidelines-TimingModel)
//! - https://github.com/emarsden/dash-mpd-rs/blob/main/src/fetch.rs

use url::Url;

use crate::{
    base_url::merge_baseurls,
    duration::PeriodDuration,
    error::{MpdError, MpdResult},
    mpd::{AdaptationSet, Period, Representation, SegmentList, SegmentTemplate},
    template::Template,
    timeline::TimelineSegments,
};

/// Addressing strategy used for a representation, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// `SegmentList`: explicitly listed segment urls.
    SegmentList,
    /// `SegmentTemplate` with `SegmentTimeline`.
    Timeline,
    /// `SegmentTemplate` numbered from `@startNumber` to `@endNumber`.
    NumberRange,
    /// `SegmentTemplate` with `@duration`, counted from the period duration.
    DurationDerived { period_seconds: f64 },
    /// No usable addressing information, the resolved BaseURL is the only segment.
    BaseUrlOnly,
}

/// `SegmentList` and `SegmentTemplate` may appear at Period, AdaptationSet and
/// Representation level. The nearest one is used as a whole, fields are never merged
/// across levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritedAddressingValues<'a> {
    pub segment_list: Option<&'a SegmentList>,
    pub segment_template: Option<&'a SegmentTemplate>,
}

impl<'a> InheritedAddressingValues<'a> {
    pub fn merge(self, alternate: &Self) -> Self {
        InheritedAddressingValues {
            segment_list: self.segment_list.or(alternate.segment_list),
            segment_template: self.segment_template.or(alternate.segment_template),
        }
    }

    pub fn resolve(
        period: &'a Period,
        adaptation_set: &'a AdaptationSet,
        representation: &'a Representation,
    ) -> Self {
        Self::from(representation)
            .merge(&Self::from(adaptation_set))
            .merge(&Self::from(period))
    }
}

macro_rules! impl_inherited_from {
    ($($ty:ty),*) => {
        $(
            impl<'a> From<&'a $ty> for InheritedAddressingValues<'a> {
                fn from(value: &'a $ty) -> Self {
                    Self {
                        segment_list: value.segment_list.as_ref(),
                        segment_template: value.segment_template.as_ref(),
                    }
                }
            }
        )*
    };
}

impl_inherited_from!(Period, AdaptationSet, Representation);

/// Urls of one representation within one period.
#[derive(Debug)]
pub struct RepresentationSegments {
    pub strategy: Strategy,
    /// Initialization segment first, then media segments.
    pub urls: Vec<Url>,
    /// Errors isolated to this representation. When url resolution fails, `urls` holds
    /// the segments emitted before the failure.
    pub errors: Vec<MpdError>,
}

pub struct SegmentEnumerator<'a> {
    pub representation: &'a Representation,
    pub addressing: InheritedAddressingValues<'a>,
    pub period_duration: PeriodDuration<'a>,

    /// Resolved BaseURL chain of the representation.
    pub base_url: &'a Url,
    /// Whether any level declared a BaseURL.
    pub has_base_url: bool,
    pub inherit_query: bool,
    /// Urls beyond this count are dropped with [`MpdError::TooManySegments`].
    pub max_segments: usize,
}

impl SegmentEnumerator<'_> {
    pub fn enumerate(&self) -> RepresentationSegments {
        let mut errors = Vec::new();
        let strategy = self.select_strategy(&mut errors);
        tracing::debug!(representation = %self.representation.id, ?strategy, "Selected addressing strategy");

        let mut urls = Vec::new();
        if let Err(e) = self.emit(strategy, &mut urls) {
            tracing::warn!(
                representation = %self.representation.id,
                error = %e,
                "Stopped emitting segment urls, keeping {} resolved segments",
                urls.len()
            );
            errors.push(e);
        }

        RepresentationSegments {
            strategy,
            urls,
            errors,
        }
    }

    fn select_strategy(&self, errors: &mut Vec<MpdError>) -> Strategy {
        if self.addressing.segment_list.is_some() {
            return Strategy::SegmentList;
        }

        let Some(template) = self.media_template() else {
            return Strategy::BaseUrlOnly;
        };
        if template.segment_timeline.is_some() {
            return Strategy::Timeline;
        }
        if template.end_number.is_some() {
            return Strategy::NumberRange;
        }
        if !template.duration.is_some_and(|d| d > 0) {
            return Strategy::BaseUrlOnly;
        }

        match self.period_duration.seconds() {
            Ok(Some(period_seconds)) => Strategy::DurationDerived { period_seconds },
            Ok(None) => Strategy::BaseUrlOnly,
            Err(e) => {
                tracing::warn!(
                    representation = %self.representation.id,
                    error = %e,
                    "Can not count segments from period duration, falling back to BaseURL"
                );
                errors.push(e);
                Strategy::BaseUrlOnly
            }
        }
    }

    /// A `SegmentTemplate` without `@media` can not address any media segment.
    fn media_template(&self) -> Option<&SegmentTemplate> {
        self.addressing
            .segment_template
            .filter(|t| t.media.is_some())
    }

    fn emit(&self, strategy: Strategy, urls: &mut Vec<Url>) -> MpdResult<()> {
        match strategy {
            Strategy::SegmentList => {
                if let Some(list) = self.addressing.segment_list {
                    self.emit_segment_list(list, urls)?;
                }
            }
            Strategy::Timeline | Strategy::NumberRange | Strategy::DurationDerived { .. } => {
                if let Some(template) = self.media_template() {
                    self.emit_template(strategy, template, urls)?;
                }
            }
            Strategy::BaseUrlOnly => {
                if self.has_base_url {
                    self.push(urls, self.base_url.clone())?;
                } else {
                    tracing::debug!(
                        representation = %self.representation.id,
                        "No addressing information and no BaseURL, no segment emitted"
                    );
                }
            }
        }
        Ok(())
    }

    fn emit_segment_list(&self, list: &SegmentList, urls: &mut Vec<Url>) -> MpdResult<()> {
        if let Some(source_url) = list
            .initialization
            .as_ref()
            .and_then(|i| i.source_url.as_deref())
        {
            self.push(urls, self.join(source_url)?)?;
        }

        for segment_url in list.segment_urls.iter() {
            // A SegmentURL without @media addresses a byte range of the BaseURL itself.
            let url = match segment_url.media.as_deref() {
                Some(media) => self.join(media)?,
                None => self.base_url.clone(),
            };
            self.push(urls, url)?;
        }
        Ok(())
    }

    fn emit_template(
        &self,
        strategy: Strategy,
        template: &SegmentTemplate,
        urls: &mut Vec<Url>,
    ) -> MpdResult<()> {
        let Some(media) = template.media.as_deref() else {
            return Ok(());
        };
        let start_number = template.start_number;
        let params =
            Template::new(&self.representation.id).bandwidth(self.representation.bandwidth);

        if let Some(initialization) = template.initialization.as_deref() {
            let initialization = params
                .number(Some(start_number))
                .time(Some(0))
                .resolve(initialization);
            self.push(urls, self.join(&initialization)?)?;
        }

        match strategy {
            Strategy::Timeline => {
                let entries = template
                    .segment_timeline
                    .as_ref()
                    .map(|t| t.segments.as_slice())
                    .unwrap_or_default();
                let emitted = urls.len();
                let mut segments =
                    TimelineSegments::new(entries, start_number, template.end_number);
                for segment in segments.by_ref() {
                    let filename = params
                        .number(Some(segment.number))
                        .time(Some(segment.time))
                        .resolve(media);
                    tracing::trace!(number = segment.number, time = segment.time, %filename);
                    self.push(urls, self.join(&filename)?)?;
                }
                if segments.overflowed() {
                    let index = urls.len() - emitted;
                    return Err(MpdError::SegmentPositionOverflow(index as u64));
                }
            }
            Strategy::NumberRange => {
                let end_number = template.end_number.unwrap_or(start_number);
                for number in start_number..=end_number {
                    let filename = params.number(Some(number)).resolve(media);
                    self.push(urls, self.join(&filename)?)?;
                }
            }
            Strategy::DurationDerived { period_seconds } => {
                let count = segment_count(period_seconds, template);
                let duration = template.duration.unwrap_or_default();
                for index in 0..count {
                    let (Some(number), Some(time)) = (
                        start_number.checked_add(index),
                        index.checked_mul(duration),
                    ) else {
                        return Err(MpdError::SegmentPositionOverflow(index));
                    };
                    let filename = params
                        .number(Some(number))
                        .time(Some(time))
                        .resolve(media);
                    self.push(urls, self.join(&filename)?)?;
                }
            }
            Strategy::SegmentList | Strategy::BaseUrlOnly => {}
        }
        Ok(())
    }

    fn push(&self, urls: &mut Vec<Url>, url: Url) -> MpdResult<()> {
        if urls.len() >= self.max_segments {
            return Err(MpdError::TooManySegments(self.max_segments));
        }
        urls.push(url);
        Ok(())
    }

    fn join(&self, reference: &str) -> MpdResult<Url> {
        merge_baseurls(self.base_url, reference, self.inherit_query)
    }
}

/// `ceil(period_seconds * timescale / duration)`
fn segment_count(period_seconds: f64, template: &SegmentTemplate) -> u64 {
    let Some(duration) = template.duration.filter(|d| *d > 0) else {
        return 0;
    };

    let count = (period_seconds * template.timescale as f64 / duration as f64).ceil();
    if count.is_finite() && count > 0.0 {
        count as u64
    } else {
        0
    }
}
