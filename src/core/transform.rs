//! Turns ranked search results into numbered, time-boxed roadmap steps.
//!
//! Effort is estimated per result from a fixed rule table, then spread over
//! the learner's weekly capacity to get a number of weeks.

use crate::domain::model::{RoadmapStep, SearchResult};

pub const MAX_TITLE_CHARS: usize = 50;
pub const DEFAULT_EFFORT_UNITS: u32 = 10;
pub const DEFAULT_WEEKLY_CAPACITY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffortMatcher {
    /// Lower-cased link contains any of the needles.
    LinkContainsAny(&'static [&'static str]),
    /// Snippet is longer than this many characters.
    SnippetLongerThan(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffortRule {
    pub matcher: EffortMatcher,
    pub units: u32,
}

/// Evaluated top to bottom, first match wins.
pub const EFFORT_RULES: &[EffortRule] = &[
    EffortRule {
        matcher: EffortMatcher::LinkContainsAny(&["youtube", "coursera", "udemy"]),
        units: 20,
    },
    EffortRule {
        matcher: EffortMatcher::LinkContainsAny(&["reddit", "stackoverflow"]),
        units: 5,
    },
    EffortRule {
        matcher: EffortMatcher::SnippetLongerThan(200),
        units: 15,
    },
];

impl EffortMatcher {
    fn matches(&self, lowered_link: &str, snippet_chars: usize) -> bool {
        match self {
            Self::LinkContainsAny(needles) => needles.iter().any(|n| lowered_link.contains(n)),
            Self::SnippetLongerThan(limit) => snippet_chars > *limit,
        }
    }
}

pub fn estimate_effort(result: &SearchResult) -> u32 {
    estimate_effort_with(EFFORT_RULES, result)
}

pub fn estimate_effort_with(rules: &[EffortRule], result: &SearchResult) -> u32 {
    let link = result.link.to_lowercase();
    let snippet_chars = result.snippet.chars().count();

    rules
        .iter()
        .find(|rule| rule.matcher.matches(&link, snippet_chars))
        .map(|rule| rule.units)
        .unwrap_or(DEFAULT_EFFORT_UNITS)
}

/// Hours per week from a range such as "5-10 hours" (lower bound wins).
///
/// Only the text before the first hyphen is considered and its leading integer
/// is taken. No leading integer falls back to the default, a huge one saturates,
/// and the result is never below 1.
pub fn weekly_capacity(time_commitment: &str) -> u32 {
    let head = time_commitment.split('-').next().unwrap_or("").trim_start();
    let digits: String = head.chars().take_while(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return DEFAULT_WEEKLY_CAPACITY;
    }
    // Only digits remain, so a parse failure means overflow.
    digits.parse::<u32>().unwrap_or(u32::MAX).max(1)
}

pub fn weeks_to_complete(effort_units: u32, weekly_capacity: u32) -> u32 {
    effort_units.div_ceil(weekly_capacity.max(1)).max(1)
}

pub fn display_title(index: usize, title: &str) -> String {
    let truncated: String = title.chars().take(MAX_TITLE_CHARS).collect();
    format!("Step {}: {}", index + 1, truncated)
}

/// Builds one step per result, preserving the provider's order.
pub fn transform(results: &[SearchResult], time_commitment: &str) -> Vec<RoadmapStep> {
    let capacity = weekly_capacity(time_commitment);
    tracing::debug!(
        "Transforming {} results with weekly capacity {}",
        results.len(),
        capacity
    );

    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let effort = estimate_effort(result);
            RoadmapStep::new(
                index + 1,
                display_title(index, &result.title),
                result.snippet.clone(),
                result.link.clone(),
                effort,
                weeks_to_complete(effort, capacity),
            )
        })
        .collect()
}
