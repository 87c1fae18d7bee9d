use crate::domain::model::LearnerProfile;

/// Appended to every query to bias results toward instructional content.
pub const SEARCH_SUFFIX: &str = "tutorial course learn";

/// Joins the non-blank profile fields in job, qualification, skills, interests order.
///
/// Returns an empty string when every field is blank; the caller decides what that means.
pub fn build_query(profile: &LearnerProfile) -> String {
    [
        &profile.job_profile,
        &profile.qualification,
        &profile.skills,
        &profile.interests,
    ]
    .into_iter()
    .filter(|term| !term.trim().is_empty())
    .map(String::as_str)
    .collect::<Vec<_>>()
    .join(" ")
}

pub fn search_terms(query: &str) -> String {
    format!("{} {}", query, SEARCH_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(job: &str, qualification: &str, skills: &str, interests: &str) -> LearnerProfile {
        LearnerProfile {
            qualification: qualification.to_string(),
            skills: skills.to_string(),
            interests: interests.to_string(),
            job_profile: job.to_string(),
            time_commitment: String::new(),
        }
    }

    #[test]
    fn test_fields_joined_in_fixed_order() {
        let p = profile("Data Engineer", "Bachelor's Degree", "SQL, Python", "Cloud");
        assert_eq!(
            build_query(&p),
            "Data Engineer Bachelor's Degree SQL, Python Cloud"
        );
    }

    #[test]
    fn test_blank_fields_are_dropped() {
        let p = profile("", "High School", "   ", "Robotics");
        assert_eq!(build_query(&p), "High School Robotics");

        let p = profile("Software Developer", "", "", "");
        assert_eq!(build_query(&p), "Software Developer");
    }

    #[test]
    fn test_all_blank_profile_gives_empty_query() {
        assert_eq!(build_query(&profile("", " ", "\t", "")), "");
        assert_eq!(build_query(&LearnerProfile::default()), "");
    }

    #[test]
    fn test_search_terms_appends_suffix() {
        assert_eq!(
            search_terms("Software Developer"),
            "Software Developer tutorial course learn"
        );
    }
}
