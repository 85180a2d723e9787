use crate::crawler::paths::CrawlerPaths;
use crate::crawler::util::now_rfc3339;
use crate::crawler::warn;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub at: String,
    pub phase: String,
    pub status: String,
    pub message: String,
}

pub fn append_event(paths: &CrawlerPaths, phase: &str, status: &str, message: &str) -> Result<()> {
    fs::create_dir_all(&paths.logs_dir)
        .with_context(|| format!("failed to create {}", paths.logs_dir.display()))?;
    let event = AuditEvent {
        at: now_rfc3339(),
        phase: phase.to_string(),
        status: status.to_string(),
        message: message.to_string(),
    };

    let line = format!("{}\n", serde_json::to_string(&event)?);
    let path = paths.audit_log();
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Audit logging never aborts a crawl; a failed append becomes a warning.
pub fn record(paths: &CrawlerPaths, phase: &str, status: &str, message: &str) {
    if let Err(err) = append_event(paths, phase, status, message) {
        warn::emit(
            "audit_write_failed",
            phase,
            "continue",
            message,
            &format!("{err:#}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn events_are_appended_as_json_lines() {
        let tmp = tempdir().expect("tempdir");
        let paths = CrawlerPaths::under(tmp.path(), "Hackerrank");

        append_event(&paths, "crawl", "started", "offset=0 limit=10").expect("first");
        append_event(&paths, "store", "saved", "Hackerrank/a.py").expect("second");

        let raw = fs::read_to_string(paths.audit_log()).expect("read");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).expect("json");
        assert_eq!(second["phase"], "store");
        assert_eq!(second["status"], "saved");
        assert!(second["at"].as_str().is_some_and(|at| !at.is_empty()));
    }
}
