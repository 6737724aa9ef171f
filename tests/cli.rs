use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn vizdeploy_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("vizdeploy"))
}

fn write_project(root: &Path) {
    fs::create_dir_all(root.join("js")).unwrap();
    fs::create_dir_all(root.join("css")).unwrap();
    fs::write(root.join("index.html"), "<html><head></head><body></body></html>").unwrap();
    fs::write(root.join("js/main.js"), "console.log('tower');").unwrap();
    fs::write(root.join("css/style.css"), "body { margin: 0; }").unwrap();
    fs::write(root.join("README.md"), "# notes").unwrap();
    fs::write(root.join("deploy-config.yml"), "project_name: tower\n").unwrap();
}

#[test]
fn help_lists_commands() {
    vizdeploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn build_without_entry_page_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("app.js"), "x").unwrap();

    vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("build")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("index.html"));

    assert!(!temp_dir.path().join("dist").exists());
}

#[test]
fn build_writes_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    vizdeploy_cmd()
        .arg("--source")
        .arg(temp_dir.path())
        .arg("build")
        .assert()
        .success();

    let dist = temp_dir.path().join("dist");
    assert!(dist.join("index.html").is_file());
    assert!(dist.join("Dockerfile").is_file());
    assert!(!dist.join("README.md").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dist.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "tower");
    let paths: Vec<&str> = manifest["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"js/main.js"));
    assert!(paths.contains(&"css/style.css"));
}

#[test]
fn deploy_package_creates_zip() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["deploy", "package"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Static package"));

    assert!(temp_dir.path().join("tower-static.zip").is_file());
}

#[test]
fn deploy_json_output_is_parseable() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    let output = vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["deploy", "package", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["target"], "Static package");
    assert_eq!(results[0]["succeeded"], true);
}

#[test]
fn verbose_json_keeps_stdout_clean() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    // Verbose mode echoes command output; none of it may land on stdout.
    let output = vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["-v", "deploy", "github-pages", "--json"])
        .output()
        .unwrap();

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["target"], "GitHub Pages");
}

#[test]
fn dry_run_package_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .args(["deploy", "package", "--dry-run"])
        .assert()
        .success();

    assert!(!temp_dir.path().join("tower-static.zip").exists());
}

#[test]
fn invalid_config_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());
    fs::write(
        temp_dir.path().join("deploy-config.yml"),
        "project_name: Not Valid\n",
    )
    .unwrap();

    vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("build")
        .assert()
        .code(1);
}

#[test]
fn menu_reads_numbered_choices_from_stdin() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    // Static package, acknowledge the results, then exit.
    vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .write_stdin("5\n\n10\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deploy to all"));

    assert!(temp_dir.path().join("tower-static.zip").is_file());
}

#[test]
fn menu_exits_on_end_of_input() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .write_stdin("")
        .assert()
        .success();
}

#[test]
fn status_reports_project_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    write_project(temp_dir.path());

    vizdeploy_cmd()
        .current_dir(temp_dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("js/main.js"))
        .stdout(predicate::str::contains("deploy-config.yml"));
}
