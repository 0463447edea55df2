// References:
// 1. https://github.com/clitic/vsd/blob/30ca1985e4a467ea3304b11c08d3176deaafd22a/vsd/src/dash/template.rs
// 2. https://github.com/emarsden/dash-mpd-rs/blob/6ebdfb4759adbda8233b5b3520804e23ff86e7de/src/fetch.rs#L435-L466

use regex::{Captures, Regex, Replacer};
use std::sync::LazyLock;

// From https://dashif.org/docs/DASH-IF-IOP-v4.3.pdf:
// "For the avoidance of doubt, only %0[width]d is permitted and no other identifiers. The reason
// is that such a string replacement can be easily implemented without requiring a specific library."
//
// `$RepresentationID$` takes no format tag. A bare `$$` is an escaped dollar sign.
// Matching runs left to right without backtracking into earlier text, so in "$Foo$$Number$"
// the unknown "$Foo" is skipped and the following "$$" is taken as the escape.
//
// Example template: "$RepresentationID$/$Number%06d$.m4s"
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:(RepresentationID)|(Number|Time|Bandwidth)(?:%0(\d+)d)?)?\$").unwrap()
});

/// Substitution context of a `SegmentTemplate@media` or `@initialization` string.
///
/// Identifiers without a value are left in place verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct Template<'a> {
    representation_id: Option<&'a str>,
    bandwidth: Option<u64>,
    number: Option<u64>,
    time: Option<u64>,
}

impl<'a> Template<'a> {
    pub const REPRESENTATION_ID: &'static str = "RepresentationID";
    pub const NUMBER: &'static str = "Number";
    pub const TIME: &'static str = "Time";
    pub const BANDWIDTH: &'static str = "Bandwidth";

    pub fn new(representation_id: &'a str) -> Self {
        Self {
            representation_id: Some(representation_id),
            ..Default::default()
        }
    }

    pub fn bandwidth(mut self, bandwidth: Option<u64>) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn number(mut self, number: Option<u64>) -> Self {
        self.number = number;
        self
    }

    pub fn time(mut self, time: Option<u64>) -> Self {
        self.time = time;
        self
    }

    pub fn resolve(&self, template: &str) -> String {
        TEMPLATE_REGEX
            .replace_all(template, TemplateReplacer(self))
            .into_owned()
    }

    fn numeric(&self, key: &str) -> Option<u64> {
        match key {
            Self::NUMBER => self.number,
            Self::TIME => self.time,
            Self::BANDWIDTH => self.bandwidth,
            _ => None,
        }
    }
}

/// Expand `template` for one segment of the representation `representation_id`.
pub fn expand(
    template: &str,
    representation_id: &str,
    number: Option<u64>,
    time: Option<u64>,
) -> String {
    Template::new(representation_id)
        .number(number)
        .time(time)
        .resolve(template)
}

struct TemplateReplacer<'a, 'b>(&'b Template<'a>);

impl Replacer for TemplateReplacer<'_, '_> {
    fn replace_append(&mut self, caps: &Captures<'_>, dst: &mut String) {
        let matched = &caps[0];

        if caps.get(1).is_some() {
            match self.0.representation_id {
                Some(id) => dst.push_str(id),
                None => dst.push_str(matched),
            }
            return;
        }

        let Some(key) = caps.get(2) else {
            // $$
            dst.push('$');
            return;
        };
        let Some(value) = self.0.numeric(key.as_str()) else {
            dst.push_str(matched);
            return;
        };

        match caps.get(3).map(|w| w.as_str().parse::<usize>()) {
            None => dst.push_str(&value.to_string()),
            Some(Ok(width)) => dst.push_str(&format!("{value:0width$}")),
            Some(Err(_)) => dst.push_str(matched),
        }
    }
}
