//! Splits generated text into the vision narrative and the action plan.
//!
//! Three strategies are tried in order:
//!
//! 1. **Sentinel**: both fixed headers are present, narrative header first.
//! 2. **Loose**: a line that looks like an action-plan heading, e.g.
//!    `## Your 12-Month Action Plan`. Only accepted when both sides are
//!    non-empty.
//! 3. **Bisected**: the text is cut at its middle character.
//!
//! [`parse`] is total. It never fails and never panics, whatever the input.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Header that opens the vision narrative document.
pub const NARRATIVE_HEADER: &str = "=== VISION NARRATIVE ===";

/// Header that opens the action plan document.
pub const ACTION_PLAN_HEADER: &str = "=== 12-MONTH ACTION PLAN ===";

static LOOSE_PLAN_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t#=*]*(?:your[ \t]+)?(?:12[- ]month[ \t]+)?action[ \t]+plan[ \t#=*:]*\r?$",
    )
    .expect("regex for action plan heading")
});

static LOOSE_NARRATIVE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A\s*[ \t#=*]*(?:your[ \t]+)?vision[ \t]+narrative[ \t#=*:]*\r?(?:\n|\z)")
        .expect("regex for narrative heading")
});

/// Which strategy produced a [`ParsedVision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseSource {
    Sentinel,
    Loose,
    Bisected,
}

impl ParseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentinel => "sentinel",
            Self::Loose => "loose",
            Self::Bisected => "bisected",
        }
    }
}

impl fmt::Display for ParseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two documents extracted from a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVision {
    pub narrative: String,
    pub action_plan: String,
    pub source: ParseSource,
}

impl ParsedVision {
    /// True when either document came out empty.
    pub fn is_incomplete(&self) -> bool {
        self.narrative.is_empty() || self.action_plan.is_empty()
    }
}

/// Splits `raw` into a narrative and an action plan.
pub fn parse(raw: &str) -> ParsedVision {
    if let Some((narrative, action_plan)) = split_on_sentinels(raw) {
        return ParsedVision {
            narrative: narrative.to_string(),
            action_plan: action_plan.to_string(),
            source: ParseSource::Sentinel,
        };
    }

    if let Some((narrative, action_plan)) = split_on_loose_heading(raw) {
        return ParsedVision {
            narrative: narrative.to_string(),
            action_plan: action_plan.to_string(),
            source: ParseSource::Loose,
        };
    }

    let (narrative, action_plan) = bisect(raw);
    ParsedVision {
        narrative: narrative.to_string(),
        action_plan: action_plan.to_string(),
        source: ParseSource::Bisected,
    }
}

fn split_on_sentinels(raw: &str) -> Option<(&str, &str)> {
    let narrative_start = raw.find(NARRATIVE_HEADER)? + NARRATIVE_HEADER.len();
    let plan_offset = raw[narrative_start..].find(ACTION_PLAN_HEADER)?;
    let plan_header = narrative_start + plan_offset;

    let narrative = raw[narrative_start..plan_header].trim();
    let action_plan = raw[plan_header + ACTION_PLAN_HEADER.len()..].trim();
    Some((narrative, action_plan))
}

fn split_on_loose_heading(raw: &str) -> Option<(&str, &str)> {
    let heading = LOOSE_PLAN_HEADING.find(raw)?;

    let mut before = &raw[..heading.start()];
    if let Some(narrative_heading) = LOOSE_NARRATIVE_HEADING.find(before) {
        before = &before[narrative_heading.end()..];
    }

    let narrative = before.trim();
    let action_plan = raw[heading.end()..].trim();
    if narrative.is_empty() || action_plan.is_empty() {
        return None;
    }
    Some((narrative, action_plan))
}

fn bisect(raw: &str) -> (&str, &str) {
    let midpoint = raw.chars().count() / 2;
    let split_at = raw
        .char_indices()
        .nth(midpoint)
        .map_or(raw.len(), |(index, _)| index);
    (raw[..split_at].trim(), raw[split_at..].trim())
}
