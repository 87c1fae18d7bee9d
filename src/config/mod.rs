pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::LearnerProfile;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "roadmap-etl")]
#[command(about = "Generate a time-boxed learning roadmap from a learner profile")]
pub struct CliConfig {
    #[arg(long, default_value = "", help = "e.g. \"Bachelor's Degree\"")]
    pub qualification: String,

    #[arg(long, default_value = "", help = "Comma-separated, e.g. \"JavaScript, React\"")]
    pub skills: String,

    #[arg(long, default_value = "", help = "Comma-separated, e.g. \"Technology, Education\"")]
    pub interests: String,

    #[arg(long, default_value = "", help = "Desired job, e.g. \"Software Developer\"")]
    pub job_profile: String,

    #[arg(long, default_value = "", help = "Weekly hours, e.g. \"5-10 hours\"")]
    pub time_commitment: String,

    #[arg(long, help = "TOML config file; environment variables are used when omitted")]
    pub config: Option<String>,

    #[arg(long, help = "Override the local record store directory")]
    pub output_path: Option<String>,

    #[arg(long, help = "Print the roadmap as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn profile(&self) -> LearnerProfile {
        LearnerProfile {
            qualification: self.qualification.clone(),
            skills: self.skills.clone(),
            interests: self.interests.clone(),
            job_profile: self.job_profile.clone(),
            time_commitment: self.time_commitment.clone(),
        }
    }
}
