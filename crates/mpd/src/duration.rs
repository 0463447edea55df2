use regex::Regex;
use std::sync::LazyLock;

use crate::{
    error::{MpdError, MpdResult},
    mpd::Mpd,
};

// Only the time part of an xs:duration is accepted. Calendar components (years, months,
// weeks and days) are not used for period timing in practice.
//
// Examples: "PT0H0M30.030S", "PT1.2S", "PT1004199059S", "PT130S", "PT1H", "PT2M"
static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?$").unwrap()
});

/// Parse a restricted ISO-8601 duration (`PT[<h>H][<m>M][<s>[.<frac>]S]`) into seconds.
///
/// The string must start with `PT` and contain at least one component.
pub fn parse_duration<S>(s: S) -> MpdResult<f64>
where
    S: AsRef<str>,
{
    let s = s.as_ref().trim();
    let invalid = || MpdError::InvalidDurationFormat(s.to_string());

    let caps = DURATION_REGEX.captures(s).ok_or_else(invalid)?;
    if caps.iter().skip(1).all(|c| c.is_none()) {
        return Err(invalid());
    }

    let component = |index: usize| -> MpdResult<f64> {
        caps.get(index)
            .map(|m| m.as_str().parse::<f64>().map_err(|_| invalid()))
            .transpose()
            .map(Option::unwrap_or_default)
    };

    let hours = component(1)?;
    let minutes = component(2)?;
    let seconds = component(3)?;
    Ok(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Where the duration of a period comes from.
///
/// Strings are kept raw and only parsed when a duration-derived segment count is
/// actually needed, so a malformed value only affects the representations relying on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodDuration<'a> {
    /// `Period@duration`
    Explicit(&'a str),
    /// The next period's `@start` minus this period's `@start`.
    UntilNextPeriod {
        start: Option<&'a str>,
        next_start: &'a str,
    },
    /// `MPD@mediaPresentationDuration` minus this period's `@start`.
    UntilPresentationEnd {
        start: Option<&'a str>,
        presentation_duration: &'a str,
    },
    Unknown,
}

impl<'a> PeriodDuration<'a> {
    /// Pick the duration source of `periods[index]`.
    ///
    /// Without `fallback`, only an explicit `Period@duration` is used.
    pub fn of(mpd: &'a Mpd, index: usize, fallback: bool) -> Self {
        let Some(period) = mpd.periods.get(index) else {
            return Self::Unknown;
        };
        if let Some(duration) = period.duration.as_deref() {
            return Self::Explicit(duration);
        }
        if !fallback {
            return Self::Unknown;
        }

        let start = period.start.as_deref();
        if let Some(next_start) = mpd
            .periods
            .get(index + 1)
            .and_then(|next| next.start.as_deref())
        {
            return Self::UntilNextPeriod { start, next_start };
        }
        if let Some(presentation_duration) = mpd.media_presentation_duration.as_deref() {
            return Self::UntilPresentationEnd {
                start,
                presentation_duration,
            };
        }
        Self::Unknown
    }

    /// Duration in seconds. `Ok(None)` when no positive duration can be determined.
    pub fn seconds(&self) -> MpdResult<Option<f64>> {
        let start = |start: Option<&str>| start.map(parse_duration).transpose();

        let seconds = match *self {
            Self::Explicit(duration) => parse_duration(duration)?,
            Self::UntilNextPeriod { start: s, next_start } => {
                parse_duration(next_start)? - start(s)?.unwrap_or_default()
            }
            Self::UntilPresentationEnd {
                start: s,
                presentation_duration,
            } => parse_duration(presentation_duration)? - start(s)?.unwrap_or_default(),
            Self::Unknown => return Ok(None),
        };
        Ok(Some(seconds).filter(|s| *s > 0.0))
    }
}
