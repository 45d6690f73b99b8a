//! Integration tests for the aves binary.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use image::{ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Command isolated from the user's real configuration.
fn aves(config_home: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("aves"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("AVES_MODEL_PATH")
        .env_remove("AVES_BIND")
        .env_remove("AVES_DEVICE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_species_lists_all_labels() {
    let home = TempDir::new().expect("tempdir");

    aves(home.path())
        .arg("species")
        .assert()
        .success()
        .stdout(predicate::str::contains("10 species:"))
        .stdout(predicate::str::contains("CHIPE CELESTE"))
        .stdout(predicate::str::contains(
            "CHIPE DE CONNECTICUT LORES NEGROS DE PECHERA",
        ))
        .stdout(predicate::str::contains("MASCARITA EQUINOCCIAL"))
        .stdout(predicate::str::contains("PAVITO MIGRATORIO"));
}

#[test]
fn test_species_json_envelope() {
    let home = TempDir::new().expect("tempdir");

    let output = aves(home.path())
        .args(["species", "--output-mode", "json"])
        .output()
        .expect("run aves");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["event"], "result");
    assert_eq!(json["payload"]["result_type"], "species_list");
    assert_eq!(json["payload"]["species_count"], 10);
    assert_eq!(json["payload"]["species"][9]["name"], "PAVITO MIGRATORIO");
}

#[test]
fn test_classify_with_missing_model_fails() {
    let home = TempDir::new().expect("tempdir");
    let images = TempDir::new().expect("tempdir");
    let image_path = images.path().join("ave.png");
    RgbImage::from_pixel(32, 32, Rgb([10, 120, 200]))
        .save_with_format(&image_path, ImageFormat::Png)
        .expect("write png");

    aves(home.path())
        .arg("classify")
        .arg(&image_path)
        .arg("--model-path")
        .arg(images.path().join("missing.onnx"))
        .arg("--no-progress")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load model"));
}

#[test]
fn test_classify_without_images_fails() {
    let home = TempDir::new().expect("tempdir");
    let empty = TempDir::new().expect("tempdir");
    std::fs::write(empty.path().join("notas.txt"), "no images here").expect("write");

    aves(home.path())
        .arg("classify")
        .arg(empty.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid image files"));
}

#[test]
fn test_json_mode_reports_errors_on_stdout() {
    let home = TempDir::new().expect("tempdir");
    let empty = TempDir::new().expect("tempdir");

    let output = aves(home.path())
        .args(["classify", "--output-mode", "json"])
        .arg(empty.path())
        .output()
        .expect("run aves");
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["event"], "error");
    assert_eq!(json["payload"]["code"], "no_valid_image_files");
}

#[test]
fn test_config_path_and_init() {
    let home = TempDir::new().expect("tempdir");

    aves(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    aves(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    aves(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains("show_confidence = true"));
}

#[test]
fn test_invalid_bind_is_rejected_before_loading_model() {
    let home = TempDir::new().expect("tempdir");

    aves(home.path())
        .args(["serve", "--bind", "localhost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration validation failed"));
}
