use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn dircmp(home: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("dircmp")?;
    cmd.env("HOME", home.path())
        .env_remove("DIRCMP_CONFIG")
        .env_remove("DIRCMP_LOG");
    Ok(cmd)
}

#[test]
fn test_missing_left_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let right = temp_dir.path().join("right");
    fs::create_dir(&right)?;

    dircmp(&temp_dir)?
        .arg(temp_dir.path().join("nope"))
        .arg(&right)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Left directory"))
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}

#[test]
fn test_missing_right_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let left = temp_dir.path().join("left");
    fs::create_dir(&left)?;

    dircmp(&temp_dir)?
        .arg(&left)
        .arg(temp_dir.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Right directory"));
    Ok(())
}

#[test]
fn test_file_instead_of_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let left = temp_dir.path().join("left");
    let file = temp_dir.path().join("file.txt");
    fs::create_dir(&left)?;
    fs::write(&file, "x")?;

    dircmp(&temp_dir)?
        .arg(&left)
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));
    Ok(())
}

#[test]
fn test_missing_arguments_is_usage_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    dircmp(&temp_dir)?
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn test_explicit_config_must_exist() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let left = temp_dir.path().join("left");
    let right = temp_dir.path().join("right");
    fs::create_dir(&left)?;
    fs::create_dir(&right)?;

    dircmp(&temp_dir)?
        .arg(&left)
        .arg(&right)
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
    Ok(())
}

#[test]
fn test_invalid_config_from_env() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let left = temp_dir.path().join("left");
    let right = temp_dir.path().join("right");
    fs::create_dir(&left)?;
    fs::create_dir(&right)?;
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[editor]\ncommand = \"\"\n")?;

    dircmp(&temp_dir)?
        .env("DIRCMP_CONFIG", &config)
        .arg(&left)
        .arg(&right)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config file"))
        .stderr(predicate::str::contains("Editor command cannot be empty"));
    Ok(())
}

#[test]
fn test_log_file_is_created_when_requested() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let log = temp_dir.path().join("dircmp.log");

    dircmp(&temp_dir)?
        .env("DIRCMP_LOG", &log)
        .arg(temp_dir.path().join("a"))
        .arg(temp_dir.path().join("b"))
        .assert()
        .code(1);

    assert!(log.exists());
    Ok(())
}

#[test]
fn test_version_flag() -> Result<()> {
    let temp_dir = TempDir::new()?;
    dircmp(&temp_dir)?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}
