// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles repository plus a fake
// home directory and cache file, so each integration test runs the
// engine in an isolated environment without touching the real system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::PathBuf;

use doot::config::Config;
use doot::engine::{self, RunOutcome, RunParams};
use doot::paths::AbsolutePath;
use doot::prompt::ScriptedInput;

/// An isolated dotfiles repository, target directory, and cache file,
/// all inside one [`tempfile::TempDir`].
pub struct TestRepo {
    tmp: tempfile::TempDir,
    pub root: PathBuf,
    pub home: PathBuf,
    pub cache: PathBuf,
}

impl TestRepo {
    /// Create the directory layout with a config pointing the target
    /// at the fake home directory.
    pub fn new() -> Self {
        Self::with_config_body("")
    }

    /// Like [`TestRepo::new`], appending extra TOML to the generated
    /// config file.
    pub fn with_config_body(extra: &str) -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = tmp.path().join("dotfiles");
        let home = tmp.path().join("home");
        let cache = tmp.path().join("cache").join("doot-cache.bin");
        std::fs::create_dir_all(root.join("doot")).expect("create repo dirs");
        std::fs::create_dir_all(&home).expect("create home dir");

        let config = format!("target_dir = {:?}\n{extra}", home.display().to_string());
        std::fs::write(root.join("doot").join("config.toml"), config)
            .expect("write config.toml");

        Self {
            tmp,
            root,
            home,
            cache,
        }
    }

    /// Write a dotfile into the repository, creating parent directories.
    pub fn write_dotfile(&self, rel: &str, contents: &str) {
        let path = self.root.join(rel);
        std::fs::create_dir_all(path.parent().expect("dotfile has a parent"))
            .expect("create dotfile parents");
        std::fs::write(path, contents).expect("write dotfile");
    }

    /// Remove a dotfile from the repository.
    pub fn remove_dotfile(&self, rel: &str) {
        std::fs::remove_file(self.root.join(rel)).expect("remove dotfile");
    }

    /// Path of a file in the fake home directory.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Path of a file in the repository.
    pub fn repo_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Write an executable hook script.
    #[cfg(unix)]
    pub fn write_hook(&self, stage: &str, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        let dir = self.root.join("doot").join("hooks").join(stage);
        std::fs::create_dir_all(&dir).expect("create hook dir");
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write hook");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod hook");
    }

    fn params<'a>(
        &'a self,
        config: &'a Config,
        input: &'a ScriptedInput,
        full_clean: bool,
    ) -> RunParams<'a> {
        RunParams {
            root: AbsolutePath::new(self.root.clone()).expect("absolute root"),
            config,
            cache_path: &self.cache,
            full_clean,
            input,
        }
    }

    /// Run the install flow, answering prompts from `answers`.
    pub fn install(&self, answers: &[&str]) -> anyhow::Result<RunOutcome> {
        self.install_full(answers, false)
    }

    /// Run the install flow with control over `--full-clean`.
    pub fn install_full(
        &self,
        answers: &[&str],
        full_clean: bool,
    ) -> anyhow::Result<RunOutcome> {
        let config = self.load_config();
        let input = ScriptedInput::new(answers.iter().copied());
        engine::install(&self.params(&config, &input, full_clean))
    }

    /// Run the clean flow.
    pub fn clean(&self) -> anyhow::Result<RunOutcome> {
        let config = self.load_config();
        let input = ScriptedInput::default();
        engine::clean(&self.params(&config, &input, false))
    }

    /// The links recorded in the cache for this repository.
    pub fn recorded_links(&self) -> Vec<doot::cache::LinkEntry> {
        let root = AbsolutePath::new(self.root.clone()).expect("absolute root");
        let target = AbsolutePath::new(self.home.clone()).expect("absolute home");
        engine::recorded_links(&self.cache, &root, &target)
    }

    /// Assert that `home_rel` is a symlink to `repo_rel`.
    pub fn assert_linked(&self, home_rel: &str, repo_rel: &str) {
        let dest = std::fs::read_link(self.home_path(home_rel))
            .unwrap_or_else(|e| panic!("{home_rel} is not a symlink: {e}"));
        assert_eq!(dest, self.repo_path(repo_rel), "wrong destination for {home_rel}");
    }

    fn load_config(&self) -> Config {
        Config::load(&AbsolutePath::new(self.root.clone()).expect("absolute root"))
            .expect("load config")
    }
}
