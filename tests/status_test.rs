use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const ROOT_README: &str = "## [Hackerrank](https://www.hackerrank.com/)\n\n\
|Domain|Subdomain|Problem Name|Problem Link|Language|Solution Link|\n\
---|---|---|---|---|---\n\
|[Algorithms](./Algorithms)|[Warmup](./Algorithms/Warmup)|A|[Problem](x)|python3|[Solution](./Algorithms/Warmup/a.py)|\n\
|[Others](./Others)|[Miscellaneous](./Others/Miscellaneous)|B|[Problem](y)|cpp|[Solution](./Others/Miscellaneous/b.cpp)|\n";

fn hsc(work_dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("hsc");
    cmd.current_dir(work_dir)
        .env("HOME", work_dir)
        .env("HSC_HOME", work_dir)
        .env_remove("HSC_CONFIG_PATH")
        .env_remove("HSC_BASE_FOLDER");
    cmd
}

#[test]
fn status_counts_tracked_challenges_and_indexed_rows() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("metadata.json"), r#"{"1": "5", "2": "7"}"#).expect("metadata");
    fs::create_dir_all(tmp.path().join("Hackerrank")).expect("mkdir");
    fs::write(tmp.path().join("Hackerrank/README.md"), ROOT_README).expect("readme");

    hsc(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("status: ok"))
        .stdout(contains("tracked_challenges=2 backing=file"))
        .stdout(contains("indexed_solutions=2"));
}

#[test]
fn status_json_report_is_parseable() {
    let tmp = tempdir().expect("tempdir");

    let output = hsc(tmp.path())
        .args(["status", "--json"])
        .output()
        .expect("run status");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["command"], "status");
    assert_eq!(report["ok"], true);
    let details = report["details"].as_array().expect("details");
    assert!(
        details
            .iter()
            .any(|d| d.as_str() == Some("indexed_solutions=0 (no root README yet)"))
    );
}

#[test]
fn status_flags_corrupt_state_as_issues() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("metadata.json"), "not json").expect("metadata");
    fs::create_dir_all(tmp.path().join("Hackerrank")).expect("mkdir");
    fs::write(tmp.path().join("Hackerrank/README.md"), "# hand written\n").expect("readme");

    hsc(tmp.path())
        .arg("status")
        .assert()
        .failure()
        .stdout(contains("metadata store unusable"))
        .stdout(contains("root index unusable"))
        .stderr(contains("status finished with 2 issue(s)"));
}

#[test]
fn status_honors_base_folder_override() {
    let tmp = tempdir().expect("tempdir");

    hsc(tmp.path())
        .env("HSC_BASE_FOLDER", "Mirror")
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Mirror"))
        .stdout(contains("env HSC_BASE_FOLDER=set"))
        .stdout(contains("env HSC_HOME=set"));
}
