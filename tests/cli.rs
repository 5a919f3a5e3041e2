use assert_cmd::Command;
use image::{ImageBuffer, Rgb};
use predicates::prelude::*;
use tempfile::TempDir;

fn photo_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    ImageBuffer::from_pixel(1600, 1200, Rgb([10u8, 20, 30]))
        .save(dir.path().join("a.jpg"))
        .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
    dir
}

#[test]
fn resizes_directory_given_as_argument() {
    let dir = photo_dir();

    Command::cargo_bin("photoresize")
        .unwrap()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing Summary"))
        .stdout(predicate::str::contains("1 scaled down"))
        .stdout(predicate::str::contains("Written"));

    let output = dir.path().join("Resized").join("a.jpg");
    assert_eq!(image::image_dimensions(output).unwrap(), (800, 600));
    assert!(!dir.path().join("Resized").join("notes.txt").exists());
}

#[test]
fn json_report() {
    let dir = photo_dir();

    let assert = Command::cargo_bin("photoresize")
        .unwrap()
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["total_entries"], 2);
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 2);
}

#[test]
fn verbose_lists_skipped_files() {
    let dir = photo_dir();

    Command::cargo_bin("photoresize")
        .unwrap()
        .arg(dir.path())
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt"));
}

#[test]
fn missing_directory_fails() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("photoresize")
        .unwrap()
        .arg(dir.path().join("nope"))
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read the directory"));
}

#[test]
fn cancelled_prompt_does_nothing() {
    Command::cargo_bin("photoresize")
        .unwrap()
        .arg("--no-dialog")
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("No directory selected"));
}

#[cfg(target_os = "linux")]
#[test]
fn headless_session_falls_back_to_terminal_prompt() {
    Command::cargo_bin("photoresize")
        .unwrap()
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY")
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("Choose Directory"));
}

#[test]
fn json_report_survives_non_utf8_file_names() {
    let dir = photo_dir();
    if !write_non_utf8_file(dir.path()) {
        return;
    }

    let assert = Command::cargo_bin("photoresize")
        .unwrap()
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["total_entries"], 3);
    assert!(stdout.contains('\u{FFFD}'));
}

#[cfg(unix)]
fn write_non_utf8_file(dir: &std::path::Path) -> bool {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    // some filesystems refuse names that are not valid UTF-8
    std::fs::write(dir.join(OsStr::from_bytes(b"caf\xe9.txt")), "x").is_ok()
}

#[cfg(not(unix))]
fn write_non_utf8_file(_dir: &std::path::Path) -> bool {
    false
}

#[test]
fn rejects_bad_config_extension() {
    let dir = photo_dir();
    let config = dir.path().join("settings.ini");
    std::fs::write(&config, "level = debug").unwrap();

    Command::cargo_bin("photoresize")
        .unwrap()
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
