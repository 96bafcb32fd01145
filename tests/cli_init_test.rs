//! Integration tests for `penlab init`

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_init_creates_project_tree() {
    let env = TestEnv::with_default_template();
    env.write_config("your-ip: 10.10.14.9\nauthor: alice\n");

    env.cmd()
        .args(["init", "htb-lame", "--target", "10.10.10.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recon/"))
        .stdout(predicate::str::contains("notes.md"))
        .stdout(predicate::str::contains("Project created at"));

    assert_eq!(
        env.read("htb-lame/recon/notes.md"),
        "Target: 10.10.10.3\nAttacker: 10.10.14.9\n"
    );
    assert_eq!(env.read("htb-lame/README.md"), "# htb-lame\nBy alice\n");
    assert!(env.project("htb-lame/recon/nmap").is_dir());

    let metadata = env.read("htb-lame/.penlab.yaml");
    assert!(metadata.contains("template: default"));
    assert!(metadata.contains("your-ip: 10.10.14.9"));
}

#[cfg(unix)]
#[test]
fn test_init_marks_scripts_executable() {
    use std::os::unix::fs::PermissionsExt;

    let env = TestEnv::with_default_template();
    env.cmd().args(["init", "box"]).assert().success();

    let mode = fs::metadata(env.project("box/exploit/run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_ne!(mode & 0o111, 0);
}

#[test]
fn test_init_uses_fallbacks_and_var_overrides() {
    let env = TestEnv::with_default_template();
    env.write_config("author: alice\n");
    env.install_template(
        "custom",
        "variables:\n  os: linux\nglobal_files:\n  - name: info.txt\n    content: \"{target} {your-ip} {os} {date}\"\n",
    );

    env.cmd()
        .args(["init", "box", "-t", "custom", "--var", "os=windows"])
        .assert()
        .success();

    let info = env.read("box/info.txt");
    assert!(info.starts_with("TARGET_IP 10.10.x.x windows "), "got {info:?}");
    assert_eq!(info.len(), "TARGET_IP 10.10.x.x windows 2025-01-01".len());
}

#[test]
fn test_init_uses_default_template_from_config() {
    let env = TestEnv::new();
    env.install_template("web", "structure:\n  - dir: webapp\n");
    env.write_config("default_template: web\n");

    env.cmd().args(["init", "site"]).assert().success();

    assert!(env.project("site/webapp").is_dir());
}

#[test]
fn test_init_dry_run_writes_nothing() {
    let env = TestEnv::with_default_template();

    env.cmd()
        .args(["init", "box", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("run.sh (executable)"))
        .stdout(predicate::str::contains("README.md"));

    assert!(!env.project("box").exists());
}

#[test]
fn test_init_rejects_traversal_in_project_name() {
    let env = TestEnv::with_default_template();

    env.cmd()
        .args(["init", "../escape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project name"));

    assert!(fs::read_dir(&env.workdir).unwrap().next().is_none());
}

#[test]
fn test_init_invalid_template_touches_nothing() {
    let env = TestEnv::new();
    env.install_template("bad", "structure:\n  - dir: [a, b]\n  - 7\n");

    env.cmd()
        .args(["init", "box", "-t", "bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template \"bad\" is invalid:"))
        .stderr(predicate::str::contains("  - structure[0].dir must be a string or number."))
        .stderr(predicate::str::contains("  - structure[1] must be a mapping."));

    assert!(!env.project("box").exists());
}

#[test]
fn test_init_missing_template() {
    let env = TestEnv::new();

    env.cmd()
        .args(["init", "box", "-t", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found: nope"));
}

#[test]
fn test_init_existing_project_requires_force() {
    let env = TestEnv::with_default_template();
    fs::create_dir(env.project("box")).unwrap();

    env.cmd()
        .args(["init", "box"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_without_confirmation_is_cancelled() {
    let env = TestEnv::with_default_template();
    fs::create_dir(env.project("box")).unwrap();
    fs::write(env.project("box/keep.txt"), "loot").unwrap();

    env.cmd()
        .args(["init", "box", "--force"])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Operation cancelled"));

    assert!(env.project("box/keep.txt").is_file());
}

#[test]
fn test_init_force_yes_replaces_project() {
    let env = TestEnv::with_default_template();
    fs::create_dir(env.project("box")).unwrap();
    fs::write(env.project("box/stale.txt"), "old").unwrap();

    env.cmd()
        .args(["init", "box", "--force", "--yes"])
        .assert()
        .success();

    assert!(!env.project("box/stale.txt").exists());
    assert!(env.project("box/recon/notes.md").is_file());
}

#[test]
fn test_init_rejected_entries_are_reported() {
    let env = TestEnv::new();
    env.install_template(
        "evil",
        "structure:\n  - dir: \"..\"\n    files:\n      - name: pwned.txt\n  - dir: ok\n",
    );

    env.cmd()
        .args(["init", "box", "-t", "evil"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rejected"))
        .stdout(predicate::str::contains("1 entries rejected"));

    assert!(!env.workdir.join("pwned.txt").exists());
    assert!(env.project("box/ok").is_dir());
}

#[test]
fn test_init_verbose_logs_to_stderr() {
    let env = TestEnv::with_default_template();

    env.cmd()
        .args(["--verbose", "init", "box"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Created directory"))
        .stdout(predicate::str::contains("Created directory").not());
}
