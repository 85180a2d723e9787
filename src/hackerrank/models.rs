use serde::Deserialize;

/// `status_code` the platform uses for an accepted submission.
pub const ACCEPTED_STATUS_CODE: i64 = 2;
pub const ACCEPTED_STATUS: &str = "Accepted";

#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeRef {
    #[serde(default)]
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionSummary {
    #[serde(alias = "submission_id")]
    pub id: i64,
    pub challenge_id: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub language: String,
    pub challenge: ChallengeRef,
}

impl SubmissionSummary {
    /// Older payloads only set `status`, newer ones only `status_code`; either counts.
    pub fn is_accepted(&self) -> bool {
        self.status == ACCEPTED_STATUS || self.status_code == Some(ACCEPTED_STATUS_CODE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub track_slug: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmissionPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub models: Vec<SubmissionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DetailEnvelope {
    pub model: SubmissionDetail,
}
