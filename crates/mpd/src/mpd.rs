//! Typed view of an MPD document.
//!
//! Only the subset of the MPEG-DASH schema that takes part in segment addressing is
//! modelled here. Unknown elements and attributes are ignored by serde, so manifests
//! carrying DRM descriptors, accessibility info and so on still parse.
//!
//! Optional attributes with a default in ISO/IEC 23009-1 (`@startNumber`, `@timescale`,
//! `S@r`) are filled in while deserializing, so later stages never need to care whether
//! an attribute was written out or not.

use serde::Deserialize;

use crate::error::{MpdError, MpdResult};

/// Parse an MPD manifest from raw bytes.
///
/// The whole document is rejected when it is not well-formed or when a
/// `Representation` lacks its `@id`.
pub fn parse(bytes: &[u8]) -> MpdResult<Mpd> {
    let mpd: Mpd = quick_xml::de::from_reader(bytes)?;
    mpd.validate()?;
    Ok(mpd)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mpd {
    #[serde(rename = "@type")]
    pub mpd_type: Option<String>,
    #[serde(rename = "@mediaPresentationDuration")]
    pub media_presentation_duration: Option<String>,

    /// There may be several BaseURLs for redundancy, only the first one is used.
    #[serde(rename = "BaseURL", default)]
    pub base_urls: Vec<BaseUrl>,
    #[serde(rename = "Period", default)]
    pub periods: Vec<Period>,
}

impl Mpd {
    fn validate(&self) -> MpdResult<()> {
        for (period_index, period) in self.periods.iter().enumerate() {
            for (adaptation_index, adaptation_set) in period.adaptation_sets.iter().enumerate() {
                if adaptation_set
                    .representations
                    .iter()
                    .any(|r| r.id.trim().is_empty())
                {
                    return Err(MpdError::EmptyRepresentationId {
                        period: period_index,
                        adaptation_set: adaptation_index,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn base_url(&self) -> Option<&str> {
        first_base_url(&self.base_urls)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Period {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    #[serde(rename = "@start")]
    pub start: Option<String>,
    #[serde(rename = "@duration")]
    pub duration: Option<String>,

    #[serde(rename = "BaseURL", default)]
    pub base_urls: Vec<BaseUrl>,
    #[serde(rename = "SegmentTemplate")]
    pub segment_template: Option<SegmentTemplate>,
    #[serde(rename = "SegmentList")]
    pub segment_list: Option<SegmentList>,
    #[serde(rename = "AdaptationSet", default)]
    pub adaptation_sets: Vec<AdaptationSet>,
}

impl Period {
    pub fn base_url(&self) -> Option<&str> {
        first_base_url(&self.base_urls)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdaptationSet {
    #[serde(rename = "BaseURL", default)]
    pub base_urls: Vec<BaseUrl>,
    #[serde(rename = "SegmentTemplate")]
    pub segment_template: Option<SegmentTemplate>,
    #[serde(rename = "SegmentList")]
    pub segment_list: Option<SegmentList>,
    #[serde(rename = "Representation", default)]
    pub representations: Vec<Representation>,
}

impl AdaptationSet {
    pub fn base_url(&self) -> Option<&str> {
        first_base_url(&self.base_urls)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Representation {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@bandwidth")]
    pub bandwidth: Option<u64>,

    #[serde(rename = "BaseURL", default)]
    pub base_urls: Vec<BaseUrl>,
    #[serde(rename = "SegmentTemplate")]
    pub segment_template: Option<SegmentTemplate>,
    #[serde(rename = "SegmentList")]
    pub segment_list: Option<SegmentList>,
}

impl Representation {
    pub fn base_url(&self) -> Option<&str> {
        first_base_url(&self.base_urls)
    }
}

/// A URI string that specifies a common location for segments.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseUrl {
    #[serde(rename = "$text", default)]
    pub base: String,
}

fn first_base_url(base_urls: &[BaseUrl]) -> Option<&str> {
    base_urls
        .first()
        .map(|u| u.base.trim())
        .filter(|u| !u.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentTemplate {
    #[serde(rename = "@initialization")]
    pub initialization: Option<String>,
    #[serde(rename = "@media")]
    pub media: Option<String>,
    #[serde(rename = "@startNumber", default = "default_start_number")]
    pub start_number: u64,
    #[serde(rename = "@endNumber")]
    pub end_number: Option<u64>,
    #[serde(rename = "@timescale", default = "default_timescale")]
    pub timescale: u64,
    /// Segment duration in timescale units.
    #[serde(rename = "@duration")]
    pub duration: Option<u64>,

    #[serde(rename = "SegmentTimeline")]
    pub segment_timeline: Option<SegmentTimeline>,
}

fn default_start_number() -> u64 {
    1
}

fn default_timescale() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentTimeline {
    #[serde(rename = "S", default)]
    pub segments: Vec<TimelineEntry>,
}

/// A single `S` element of a `SegmentTimeline`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineEntry {
    #[serde(rename = "@t")]
    pub t: Option<u64>,
    #[serde(rename = "@d")]
    pub d: u64,
    /// Only additional segment references are counted, so `r=5` means 6 segments.
    #[serde(rename = "@r", default)]
    pub r: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentList {
    #[serde(rename = "Initialization")]
    pub initialization: Option<Initialization>,
    #[serde(rename = "SegmentURL", default)]
    pub segment_urls: Vec<SegmentUrl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Initialization {
    #[serde(rename = "@sourceURL")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentUrl {
    #[serde(rename = "@media")]
    pub media: Option<String>,
}
