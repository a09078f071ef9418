use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated token file in a scratch directory.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn token_file(&self) -> PathBuf {
        self.dir.path().join("tokens.json")
    }

    /// Run the CLI against `api_url` with this sandbox's token file.
    pub fn run(&self, args: &[&str], api_url: &str) -> Output {
        run_cli(args, &self.token_file(), api_url)
    }

    /// Run the CLI and expect success.
    pub fn run_success(&self, args: &[&str], api_url: &str) -> String {
        let output = self.run(args, api_url);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Store a token pair through `scribe auth login`.
    pub fn login(&self, access: &str, refresh: &str) {
        self.run_success(
            &[
                "auth",
                "login",
                "--access-token",
                access,
                "--refresh-token",
                refresh,
            ],
            OFFLINE_API,
        );
    }
}

/// An API URL for commands that never touch the network.
pub const OFFLINE_API: &str = "http://127.0.0.1:1";

/// Run the CLI binary with an explicit token file and API URL.
pub fn run_cli(args: &[&str], token_file: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scribe"));
    cmd.args(args);
    cmd.env("SCRIBE_TOKEN_FILE", token_file);
    cmd.env("SCRIBE_API_URL", api_url);
    cmd.env("SCRIBE_TIMEOUT_SECS", "5");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("SCRIBE_ACCESS_TOKEN");
    cmd.env_remove("SCRIBE_REFRESH_TOKEN");
    cmd.output().expect("Failed to execute CLI")
}
