use crate::crawler::sync::SubmissionSource;
use crate::error::CrawlError;
use crate::hackerrank::models::{
    DetailEnvelope, SubmissionDetail, SubmissionPage, SubmissionSummary,
};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("hsc/", env!("CARGO_PKG_VERSION"));

/// Blocking session against the HackerRank REST endpoints.
///
/// Every request carries basic auth; the cookie store keeps whatever
/// session the login response hands out.
pub struct HackerRankClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl HackerRankClient {
    pub fn new(base_url: &str, username: &str, password: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .with_context(|| format!("request to {url} failed"))?;
        if !response.status().is_success() {
            return Err(CrawlError::Transport {
                url: url.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get(url)?
            .json::<T>()
            .with_context(|| format!("unexpected response body from {url}"))
    }

    /// Logs in and returns the account's submission count. A zero count is
    /// treated as a failed login; anonymous requests also get an answer.
    pub fn login(&self) -> Result<u64> {
        self.get(&self.url("auth/login"))?;
        let total = self.total_submissions()?;
        if total == 0 {
            return Err(CrawlError::AuthFailed(self.username.clone()).into());
        }
        Ok(total)
    }

    pub fn total_submissions(&self) -> Result<u64> {
        let page: SubmissionPage = self.get_json(&submissions_path(&self.base_url, 0, 0))?;
        Ok(page.total)
    }

    pub fn list_submissions(&self, offset: u64, limit: u64) -> Result<Vec<SubmissionSummary>> {
        let page: SubmissionPage =
            self.get_json(&submissions_path(&self.base_url, offset, limit))?;
        Ok(page.models)
    }
}

impl SubmissionSource for HackerRankClient {
    fn fetch_detail(&self, challenge_slug: &str, submission_id: i64) -> Result<SubmissionDetail> {
        let envelope: DetailEnvelope =
            self.get_json(&detail_path(&self.base_url, challenge_slug, submission_id))?;
        Ok(envelope.model)
    }
}

fn submissions_path(base_url: &str, offset: u64, limit: u64) -> String {
    format!("{base_url}rest/contests/master/submissions/?offset={offset}&limit={limit}")
}

fn detail_path(base_url: &str, challenge_slug: &str, submission_id: i64) -> String {
    format!(
        "{base_url}rest/contests/master/challenges/{challenge_slug}/submissions/{submission_id}"
    )
}
