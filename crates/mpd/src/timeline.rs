//! Walk of a `SegmentTimeline`, decoupled from url construction.

use std::iter::FusedIterator;

use crate::mpd::TimelineEntry;

/// Position of one media segment described by a `SegmentTimeline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSegment {
    /// `$Number$`
    pub number: u64,
    /// `$Time$`, in timescale units
    pub time: u64,
}

/// Lazily expands `S` elements into segment positions.
///
/// The running clock starts at the first entry's `@t` (or 0) and is reset whenever an
/// entry carries an explicit `@t`. Each entry yields `@r + 1` segments. A negative `@r`
/// is treated as 0. When `end_number` is set, the walk stops before the number exceeds it.
///
/// The walk also stops when the next segment's number or time does not fit in a `u64`,
/// which [`TimelineSegments::overflowed`] reports afterwards.
pub struct TimelineSegments<'a> {
    entries: std::slice::Iter<'a, TimelineEntry>,
    end_number: Option<u64>,

    /// `None` once the counter ran past `u64::MAX`.
    number: Option<u64>,
    time: Option<u64>,
    duration: u64,
    remaining: u64,
    overflowed: bool,
}

impl<'a> TimelineSegments<'a> {
    pub fn new(entries: &'a [TimelineEntry], start_number: u64, end_number: Option<u64>) -> Self {
        Self {
            entries: entries.iter(),
            end_number,
            number: Some(start_number),
            time: Some(0),
            duration: 0,
            remaining: 0,
            overflowed: false,
        }
    }

    /// Whether the walk ended because a segment position overflowed.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    fn exhausted(&self) -> bool {
        match (self.end_number, self.number) {
            (Some(end), Some(number)) => number > end,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl Iterator for TimelineSegments<'_> {
    type Item = TimelineSegment;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.overflowed || self.exhausted() {
                return None;
            }

            if self.remaining > 0 {
                let (Some(number), Some(time)) = (self.number, self.time) else {
                    self.overflowed = true;
                    return None;
                };
                self.remaining -= 1;
                self.number = number.checked_add(1);
                self.time = time.checked_add(self.duration);
                return Some(TimelineSegment { number, time });
            }

            let entry = self.entries.next()?;
            if let Some(t) = entry.t {
                self.time = Some(t);
            }
            if entry.r < 0 {
                // TODO: negative @r on the last S element repeats until the period end,
                // which needs the period duration passed in here.
                tracing::debug!(r = entry.r, "Negative repeat count treated as 0");
            }
            self.duration = entry.d;
            self.remaining = entry.r.max(0) as u64 + 1;
        }
    }
}

impl FusedIterator for TimelineSegments<'_> {}
