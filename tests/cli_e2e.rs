use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::prelude::*;
use std::path::Path;

fn bookmap(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bookmap").unwrap();
    cmd.env_remove("BOOKMAP_HOME")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
fn test_add_list_delete() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookmap(temp_dir.path())
        .args(["add", "Cafe Noir", "--lat", "37.55", "--lon", "126.92"])
        .args(["-c", "cafe", "-d", "good espresso"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmark saved: Cafe Noir"));

    bookmap(temp_dir.path())
        .args(["add", "Seoul Forest", "--lat", "37.544", "--lon", "127.037"])
        .args(["-c", "travel-spot"])
        .assert()
        .success();

    bookmap(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cafe Noir").and(predicate::str::contains("Seoul Forest")));

    bookmap(temp_dir.path())
        .args(["ls", "espresso"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cafe Noir").and(predicate::str::contains("Seoul Forest").not()));

    bookmap(temp_dir.path())
        .args(["delete", "Cafe Noir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookmark deleted: Cafe Noir"));

    bookmap(temp_dir.path())
        .args(["rm", "Cafe Noir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookmark named"));

    let contents = std::fs::read_to_string(temp_dir.path().join("bookmarks.csv")).unwrap();
    assert!(!contents.contains("Cafe Noir"));
    assert!(contents.contains("Seoul Forest"));
}

#[test]
fn test_empty_store_lists_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookmap(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No bookmarks found."));
}

#[test]
fn test_markers_feed_is_json() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookmap(temp_dir.path())
        .args(["add", "Noodle Bar", "--lat", "35.1", "--lon", "129.0", "-c", "restaurant"])
        .args(["-d", "spicy"])
        .assert()
        .success();

    let output = bookmap(temp_dir.path())
        .arg("markers")
        .output()
        .unwrap();
    assert!(output.status.success());

    let feed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(feed["center"]["latitude"], 35.1);
    assert_eq!(feed["markers"][0]["name"], "Noodle Bar");
    assert_eq!(feed["markers"][0]["color"], "red");
    assert_eq!(feed["markers"][0]["popup"], "<b>Noodle Bar</b><br>spicy");
}

#[test]
fn test_center_prefers_click() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookmap(temp_dir.path())
        .arg("center")
        .assert()
        .success()
        .stdout(predicate::str::contains("37.566500").and(predicate::str::contains("default center")));

    bookmap(temp_dir.path())
        .args(["center", "--click", "-33.8568,151.2153"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-33.856800").and(predicate::str::contains("last map click")));
}

#[test]
fn test_photo_is_copied_into_data_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    let image = temp_dir.path().join("view.png");
    std::fs::write(&image, b"\x89PNG fake").unwrap();

    bookmap(&data_dir)
        .args(["add", "Lookout", "--lat", "37.0", "--lon", "127.0"])
        .arg("--photo")
        .arg(&image)
        .assert()
        .success();

    bookmap(&data_dir)
        .args(["photo", "Lookout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lookout_view.png"));

    assert_eq!(
        std::fs::read(data_dir.join("photos").join("Lookout_view.png")).unwrap(),
        b"\x89PNG fake"
    );
}

#[test]
fn test_invalid_input_exits_with_error() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookmap(temp_dir.path())
        .args(["add", "Nowhere", "--lat", "95", "--lon", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    bookmap(temp_dir.path())
        .args(["ls", "-c", "bar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    assert!(!temp_dir.path().join("bookmarks.csv").exists());
}

#[test]
fn test_config_set_changes_fallback_center() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookmap(temp_dir.path()).arg("init").assert().success();

    bookmap(temp_dir.path())
        .args(["config", "fallback-center", "35.1796,129.0756"])
        .assert()
        .success();

    bookmap(temp_dir.path())
        .arg("center")
        .assert()
        .success()
        .stdout(predicate::str::contains("35.179600"));
}

#[test]
fn test_load_warnings_keep_markers_parseable() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("bookmarks.csv"),
        "name,latitude,longitude\nA,1,1\nB,x,2\n",
    )
    .unwrap();

    let output = bookmap(temp_dir.path()).arg("markers").output().unwrap();
    assert!(output.status.success());

    let feed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(feed["markers"].as_array().unwrap().len(), 1);
    assert_eq!(feed["markers"][0]["name"], "A");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Skipped 1 unreadable row(s)"));
}
