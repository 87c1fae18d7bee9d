use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Used when the provider returns a result without a snippet.
pub const FALLBACK_SNIPPET: &str = "Explore this resource for your learning journey.";

/// What the learner submitted. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearnerProfile {
    pub qualification: String,
    pub skills: String,
    pub interests: String,
    pub job_profile: String,
    pub time_commitment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, snippet: Option<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.unwrap_or_else(|| FALLBACK_SNIPPET.to_string()),
            link: link.into(),
        }
    }
}

/// One step of a roadmap. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    ordinal: usize,
    display_title: String,
    description: String,
    link: String,
    estimated_effort_units: u32,
    weeks_to_complete: u32,
}

impl RoadmapStep {
    pub(crate) fn new(
        ordinal: usize,
        display_title: String,
        description: String,
        link: String,
        estimated_effort_units: u32,
        weeks_to_complete: u32,
    ) -> Self {
        Self {
            ordinal,
            display_title,
            description,
            link,
            estimated_effort_units,
            weeks_to_complete,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn display_title(&self) -> &str {
        &self.display_title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn estimated_effort_units(&self) -> u32 {
        self.estimated_effort_units
    }

    pub fn weeks_to_complete(&self) -> u32 {
        self.weeks_to_complete
    }
}

/// The unit of persistence: the submitted profile and the roadmap generated for it.
///
/// Serialized field names follow the `user_roadmaps` table layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapRecord {
    pub id: Uuid,
    #[serde(rename = "user_input")]
    pub profile: LearnerProfile,
    #[serde(rename = "roadmap")]
    pub steps: Vec<RoadmapStep>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl RoadmapRecord {
    pub fn new(profile: LearnerProfile, steps: Vec<RoadmapStep>) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            steps,
            created_at: Utc::now(),
        }
    }
}

/// Returned by a record store once a record is durably written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub record_id: Uuid,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_snippet_uses_fallback() {
        let result = SearchResult::new("Rust Book", None, "https://doc.rust-lang.org/book/");
        assert_eq!(result.snippet, FALLBACK_SNIPPET);

        let result = SearchResult::new("Rust Book", Some("Learn Rust".to_string()), "https://x.io");
        assert_eq!(result.snippet, "Learn Rust");
    }

    #[test]
    fn test_profile_uses_form_field_names() {
        let profile: LearnerProfile = serde_json::from_value(serde_json::json!({
            "jobProfile": "Software Developer",
            "timeCommitment": "5-10 hours"
        }))
        .unwrap();

        assert_eq!(profile.job_profile, "Software Developer");
        assert_eq!(profile.time_commitment, "5-10 hours");
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn test_record_serializes_table_columns() {
        let record = RoadmapRecord::new(LearnerProfile::default(), vec![]);
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("user_input").is_some());
        assert!(json.get("roadmap").unwrap().as_array().unwrap().is_empty());
        assert!(json.get("timestamp").unwrap().is_string());
    }
}
