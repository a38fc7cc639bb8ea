//! Letter-grade banding.
//!
//! A grading scale is an ordered list of bands, each carrying its range as
//! human-readable text (`"90-100"`, `"59 and below"`). Bands are tested in
//! declaration order and the first inclusive match wins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBand {
    pub letter: String,
    #[serde(default)]
    pub point: f64,
    pub range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl GradeBand {
    /// Inclusive `(low, high)` bounds parsed from the range text, or `None`
    /// when the text is not a recognised range.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        parse_range(&self.range)
    }

    #[must_use]
    pub fn contains(&self, score: f64) -> bool {
        self.bounds()
            .is_some_and(|(lo, hi)| score >= lo && score <= hi)
    }
}

fn parse_range(raw: &str) -> Option<(f64, f64)> {
    let text = raw.trim().to_ascii_lowercase();

    if let Some(head) = text.strip_suffix("and below") {
        return parse_number(head).map(|hi| (f64::NEG_INFINITY, hi));
    }
    if let Some(head) = text.strip_suffix("and above") {
        return parse_number(head).map(|lo| (lo, f64::INFINITY));
    }
    // A leading '-' would be a sign, not a separator.
    if let Some((lo, hi)) = text.get(1..).and_then(|rest| rest.split_once('-')) {
        let lo = parse_number(&text[..=lo.len()])?;
        let hi = parse_number(hi)?;
        return (lo <= hi).then_some((lo, hi));
    }
    parse_number(&text).map(|n| (n, n))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// First band in `scale` whose range contains `total`.
///
/// Integer ranges leave gaps (`85-89`, `90-100`), so the total is rounded to
/// the nearest whole point before matching.
#[must_use]
pub fn letter_for(scale: &[GradeBand], total: f64) -> Option<&GradeBand> {
    let banded = total.round();
    scale.iter().find(|band| band.contains(banded))
}

#[cfg(test)]
#[path = "scale_test.rs"]
mod tests;
