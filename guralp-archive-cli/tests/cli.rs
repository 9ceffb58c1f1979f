//! End-to-end tests for the `guralp-archive` binary.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Binary with config lookup pinned to an empty temp home.
fn guralp_archive(home: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("guralp-archive").expect("binary");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("GURALP_ARCHIVE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(home: &assert_fs::TempDir, body: &str) -> std::path::PathBuf {
    let file = home.child("config.yaml");
    file.write_str(body).expect("write config");
    file.path().to_path_buf()
}

// ---------------------------------------------------------------------------
// relocate
// ---------------------------------------------------------------------------

#[test]
fn relocate_moves_a_day_into_the_archive() {
    let home = assert_fs::TempDir::new().expect("home");
    let cache = assert_fs::TempDir::new().expect("cache");
    let archive = assert_fs::TempDir::new().expect("archive");
    cache.child("miniseed/2024/NN.STA01.00.HHZ.2024.045").write_str("z").expect("seed");
    cache.child("miniseed/2024/STA01.SOH.2024.045").write_str("s").expect("seed");
    cache.child("latency/NN_STA01_00_HHZ_2024_045.csv").write_str("l").expect("seed");

    guralp_archive(&home)
        .arg("relocate")
        .arg("--cache-dir")
        .arg(cache.path())
        .arg("--archive-dir")
        .arg(archive.path())
        .args(["--date", "2024-02-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("soh 2024-02-14 (1 moved, 0 skipped)"));

    archive.child("miniseed/2024/02/14/NN.STA01.00.HHZ.2024.045").assert("z");
    archive.child("soh/2024/02/14/STA01.SOH.2024.045").assert("s");
    archive.child("latency/2024/02/14/NN_STA01_00_HHZ_2024_045.csv").assert("l");
    cache.child("miniseed/2024/STA01.SOH.2024.045").assert(predicate::path::missing());
}

#[test]
fn relocate_json_dry_run_reports_would_move() {
    let home = assert_fs::TempDir::new().expect("home");
    let cache = assert_fs::TempDir::new().expect("cache");
    let archive = assert_fs::TempDir::new().expect("archive");
    cache.child("miniseed/2024/STA01.SOH.2024.045").write_str("s").expect("seed");

    let output = guralp_archive(&home)
        .arg("relocate")
        .arg("-c")
        .arg(cache.path())
        .arg("-a")
        .arg(archive.path())
        .args(["-d", "2024-02-14", "--dry-run", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["date"], "2024-02-14");
    assert_eq!(report["categories"][0]["category"], "soh");
    assert_eq!(report["categories"][0]["moves"][0]["result"], "would_move");
    cache.child("miniseed/2024/STA01.SOH.2024.045").assert(predicate::path::exists());
}

#[test]
fn relocate_takes_directories_from_config() {
    let home = assert_fs::TempDir::new().expect("home");
    let cache = assert_fs::TempDir::new().expect("cache");
    let archive = assert_fs::TempDir::new().expect("archive");
    cache.child("latency/A_B_C_D_2024_45.csv").write_str("old").expect("seed");
    let config = write_config(
        &home,
        &format!(
            "cache_dir: {}\narchive_dir: {}\nday_padding: lenient\n",
            cache.path().display(),
            archive.path().display()
        ),
    );

    guralp_archive(&home)
        .arg("--config")
        .arg(&config)
        .args(["relocate", "--date", "2024-02-14"])
        .assert()
        .success();

    archive.child("latency/2024/02/14/A_B_C_D_2024_45.csv").assert("old");
}

#[test]
fn bulk_dry_run_logs_request_without_assuming_rsync() {
    let home = assert_fs::TempDir::new().expect("home");
    let cache = assert_fs::TempDir::new().expect("cache");
    let archive = assert_fs::TempDir::new().expect("archive");
    cache.child("latency/A_B_C_D_2024_045.csv").write_str("l").expect("seed");
    let config = write_config(&home, "rsync_program: \"/opt/bin/rsync3\"\n");

    guralp_archive(&home)
        .arg("--config")
        .arg(&config)
        .arg("relocate")
        .arg("-c")
        .arg(cache.path())
        .arg("-a")
        .arg(archive.path())
        .args(["-d", "2024-02-14", "--bulk", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("would transfer: -a --remove-source-files"))
        .stderr(predicate::str::contains("rsync -a").not());

    cache.child("latency/A_B_C_D_2024_045.csv").assert("l");
    archive.child("latency").assert(predicate::path::missing());
}

#[test]
fn invalid_date_is_rejected() {
    let home = assert_fs::TempDir::new().expect("home");
    guralp_archive(&home)
        .args(["relocate", "--date", "2024-02-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn missing_explicit_config_is_fatal() {
    let home = assert_fs::TempDir::new().expect("home");
    guralp_archive(&home)
        .args(["--config", "/nonexistent/guralp.yaml", "relocate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config not found"));
}

// ---------------------------------------------------------------------------
// mirror
// ---------------------------------------------------------------------------

#[test]
fn mirror_without_destination_directory_fails() {
    let home = assert_fs::TempDir::new().expect("home");
    guralp_archive(&home)
        .args(["mirror", "-s", "acq01", "-a", "/nonexistent/archive", "-t", "2024-02-14"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory not found"));
}

#[cfg(unix)]
#[test]
fn mirror_failures_are_soft_unless_strict() {
    let home = assert_fs::TempDir::new().expect("home");
    let destination = assert_fs::TempDir::new().expect("destination");
    let config = write_config(&home, "rsync_program: \"false\"\n");

    let soft = guralp_archive(&home)
        .arg("--config")
        .arg(&config)
        .args(["mirror", "-s", "acq01", "-a", "/data/archive", "-t", "2024-02-14"])
        .arg("-d")
        .arg(destination.path())
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&soft.get_output().stdout).to_string();
    for category in ["miniseed", "latency", "soh"] {
        assert!(stdout.contains(category), "missing {category} in: {stdout}");
    }

    guralp_archive(&home)
        .arg("--config")
        .arg(&config)
        .args(["mirror", "-s", "acq01", "-a", "/data/archive", "-t", "2024-02-14", "--strict"])
        .arg("-d")
        .arg(destination.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("3 categor(ies) failed"));
}

// ---------------------------------------------------------------------------
// fix-cache
// ---------------------------------------------------------------------------

#[test]
fn fix_cache_renames_into_year_directory() {
    let home = assert_fs::TempDir::new().expect("home");
    let cache = assert_fs::TempDir::new().expect("cache");
    cache
        .child("miniseed/NN_STA01_00_HHZ_2024_045.mseed")
        .write_str("w")
        .expect("seed");

    guralp_archive(&home)
        .arg("fix-cache")
        .arg("--cache-dir")
        .arg(cache.path())
        .args(["--date", "2024-02-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 miniseed file(s)"));

    cache.child("miniseed/2024/NN.STA01.00.HHZ.2024.045").assert("w");
}
