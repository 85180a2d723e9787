use assert_cmd::Command;
use fs2::FileExt;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn hsc(work_dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("hsc");
    cmd.current_dir(work_dir)
        .env("HOME", work_dir)
        .env("HSC_HOME", work_dir)
        .env_remove("HSC_USERNAME")
        .env_remove("HSC_PASSWORD")
        .env_remove("HSC_CONFIG_PATH")
        .env_remove("HSC_BASE_URL");
    cmd
}

#[test]
fn crawl_refuses_corrupt_metadata_before_any_request() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("metadata.json"), "{\"42\": ").expect("write metadata");

    hsc(tmp.path())
        .args(["crawl", "--username", "alice", "--password", "secret", "--quiet"])
        .assert()
        .failure()
        .stderr(contains("E004_STATE_CORRUPT"))
        .stderr(contains("phase=metadata"));

    assert!(!tmp.path().join("Hackerrank").exists());
}

#[test]
fn crawl_requires_credentials() {
    let tmp = tempdir().expect("tempdir");

    hsc(tmp.path())
        .args(["crawl", "--quiet"])
        .assert()
        .failure()
        .stderr(contains("phase=config"))
        .stderr(contains("username is required"));
}

#[test]
fn crawl_fails_fast_while_another_run_holds_the_lock() {
    let tmp = tempdir().expect("tempdir");
    let lock_path = tmp.path().join(".hsc/crawl.lock");
    fs::create_dir_all(lock_path.parent().expect("parent")).expect("mkdir");
    let held = fs::File::create(&lock_path).expect("create lock");
    held.lock_exclusive().expect("hold lock");

    hsc(tmp.path())
        .args(["crawl", "-u", "alice", "-p", "secret", "-q"])
        .assert()
        .failure()
        .stderr(contains("E001_LOCKED"))
        .stderr(contains("phase=lock"));

    FileExt::unlock(&held).expect("unlock");
}

#[test]
fn unreachable_remote_reports_login_phase() {
    let tmp = tempdir().expect("tempdir");

    hsc(tmp.path())
        .env("HSC_BASE_URL", "http://127.0.0.1:9")
        .env("HSC_TIMEOUT_SECS", "2")
        .args(["crawl", "-u", "alice", "-p", "secret", "-q"])
        .assert()
        .failure()
        .stderr(contains("phase=login user=alice"));

    let audit = tmp.path().join(".hsc/logs/audit.log");
    assert!(!audit.exists() || !fs::read_to_string(audit).expect("read").contains("started"));
}

#[test]
fn invalid_config_file_is_reported_with_code() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("hsc.toml"), "[layout]\nbase_folder = 3\n").expect("write config");

    hsc(tmp.path())
        .args(["crawl", "-u", "alice", "-p", "secret", "-q"])
        .assert()
        .failure()
        .stderr(contains("E006_CONFIG_INVALID"))
        .stderr(contains("phase=config"));
}
