#![cfg(unix)]

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use regex::Regex;
use scantool::core::ImagingOrchestrator;
use tempfile::TempDir;

fn find_binary(name: &str) -> Option<PathBuf> {
    ["/bin", "/usr/bin"]
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .find(|path| path.is_file())
}

/// Executable shell script in `dir`
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(format!("#!/bin/sh\n{}\n", body).as_bytes()).unwrap();
    file.sync_all().unwrap();
    drop(file);
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_successful_tool_reports_image_path() {
    let Some(tool) = find_binary("true") else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();

    let outcome = ImagingOrchestrator::new()
        .create_disk_image(&tool, temp_dir.path())
        .await;

    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.message.starts_with("Disk image created successfully at "));
    let pattern = Regex::new(r"DiskImage_\d{8}_\d{6}\.raw$").unwrap();
    assert!(pattern.is_match(&outcome.message), "{}", outcome.message);
}

#[tokio::test]
async fn test_output_directory_is_created() {
    let Some(tool) = find_binary("true") else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("cases").join("incident-7");

    let outcome = ImagingOrchestrator::new()
        .create_disk_image(&tool, &output_dir)
        .await;

    assert!(outcome.success);
    assert!(output_dir.is_dir());
}

#[tokio::test]
async fn test_nonzero_exit_is_reported() {
    let Some(tool) = find_binary("false") else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();

    let outcome = ImagingOrchestrator::new()
        .create_disk_image(&tool, temp_dir.path())
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Imaging process exited with code 1");
}

#[tokio::test]
async fn test_chatty_tool_output_is_drained() {
    let Some(tool) = find_binary("echo") else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();

    let outcome = ImagingOrchestrator::new()
        .create_disk_image(&tool, temp_dir.path())
        .await;

    assert!(outcome.success, "{}", outcome.message);
}

#[tokio::test]
async fn test_deadline_kills_hung_tool() {
    let Some(tool) = find_binary("yes") else {
        return;
    };
    let temp_dir = TempDir::new().unwrap();

    let outcome = ImagingOrchestrator::new()
        .with_deadline(Duration::from_millis(200))
        .create_disk_image(&tool, temp_dir.path())
        .await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("timed out"), "{}", outcome.message);
}

#[tokio::test]
async fn test_deadline_holds_when_tool_leaves_output_open() {
    if !Path::new("/bin/sh").is_file() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    // `sleep` inherits the pipes and outlives the killed shell
    let tool = write_script(temp_dir.path(), "imager.sh", "echo started\nsleep 6");

    let started = Instant::now();
    let outcome = ImagingOrchestrator::new()
        .with_deadline(Duration::from_millis(300))
        .create_disk_image(&tool, &temp_dir.path().join("out"))
        .await;
    let elapsed = started.elapsed();

    assert!(!outcome.success);
    assert!(outcome.message.contains("timed out after 300ms"), "{}", outcome.message);
    assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_missing_tool_is_reported_before_launch() {
    let temp_dir = TempDir::new().unwrap();
    let tool = temp_dir.path().join("DumpIt.exe");
    let output_dir = temp_dir.path().join("Output");

    let outcome = ImagingOrchestrator::new()
        .create_disk_image(&tool, &output_dir)
        .await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("DumpIt.exe"));
    assert!(!output_dir.exists());
}
