#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

fn config_dir() -> &'static Path {
    static CONFIG_DIR: OnceLock<TempDir> = OnceLock::new();
    CONFIG_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create config dir for tests"))
        .path()
}

/// A `clipfetch` command isolated from the user's config, without colors.
#[allow(dead_code)]
pub fn clipfetch_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("clipfetch"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("CLIPFETCH_CONFIG");
    cmd.env_remove("CLIPFETCH_BASE_URL");
    cmd.env("CLIPFETCH_CONFIG_DIR", config_dir());
    cmd.env("NO_COLOR", "1");
    cmd
}
