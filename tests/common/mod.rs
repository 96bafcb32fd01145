//! Shared fixtures for CLI integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DEFAULT_TEMPLATE: &str = r##"
name: default
version: "1.2"
author: h3ll
description: Generic pentest layout
tags: [htb, general]
variables:
  target: ""
  os: Target operating system
structure:
  - dir: recon
    subdirs:
      - dir: nmap
    files:
      - name: notes.md
        content: "Target: {target}\nAttacker: {your-ip}\n"
  - dir: exploit
    files:
      - name: run.sh
        content: "#!/bin/sh\necho {target}\n"
        executable: true
global_files:
  - name: README.md
    content: "# {project-name}\nBy {author}\n"
"##;

/// Isolated penlab home plus a working directory
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub workdir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("penlab-home");
        let workdir = tmp.path().join("work");
        fs::create_dir_all(&workdir).expect("create workdir");

        Self {
            _tmp: tmp,
            home,
            workdir,
        }
    }

    /// Environment with the default template installed
    pub fn with_default_template() -> Self {
        let env = Self::new();
        env.install_template("default", DEFAULT_TEMPLATE);
        env
    }

    pub fn install_template(&self, name: &str, content: &str) -> PathBuf {
        let templates = self.home.join("templates");
        fs::create_dir_all(&templates).expect("create templates dir");
        let path = templates.join(format!("{name}.yaml"));
        fs::write(&path, content).expect("write template");
        path
    }

    pub fn write_config(&self, content: &str) {
        fs::create_dir_all(&self.home).expect("create home");
        fs::write(self.home.join("config.yaml"), content).expect("write config");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("penlab").unwrap();
        cmd.env("PENLAB_HOME", &self.home)
            .env_remove("RUST_LOG")
            .current_dir(&self.workdir);
        cmd
    }

    pub fn project(&self, name: &str) -> PathBuf {
        self.workdir.join(name)
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        fs::read_to_string(self.workdir.join(path)).expect("read generated file")
    }
}
