//! Build script for medoc-ingest
//!
//! Sets GIT_HASH, BUILD_TIMESTAMP and BUILD_PROFILE for the startup log line.
//! No rerun-if-changed directives, so the values are refreshed on every build.

use std::process::Command;

const UNKNOWN: &str = "unknown";

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_owned())
}

fn main() {
    let build_env = [
        ("GIT_HASH", git_short_hash().unwrap_or_else(|| UNKNOWN.to_owned())),
        (
            "BUILD_TIMESTAMP",
            chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
        ),
        ("BUILD_PROFILE", std::env::var("PROFILE").unwrap_or_else(|_| UNKNOWN.to_owned())),
    ];

    for (key, value) in build_env {
        println!("cargo:rustc-env={key}={value}");
    }
}
