//! Default provenance metadata lookups.
//!
//! Resolves the manifest fields the user did not supply: git revision and
//! branch, host name, platform description, build timestamp, and user name.
//! Lookups spawn short-lived subprocesses with a timeout so a wedged `git`
//! cannot hang the build; any non-zero exit, launch failure, or timeout
//! degrades to `None` and the caller falls back to a default with a
//! warning. These lookups are never fatal.

use chrono::Local;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Timeout for metadata subprocess calls.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Run a command and return its trimmed stdout, or `None` on any failure.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    match child.wait_timeout(LOOKUP_TIMEOUT) {
        Ok(Some(status)) if status.success() => {
            let stdout = child.stdout.take().map(std::io::read_to_string)?.ok()?;
            let trimmed = stdout.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Ok(Some(_)) => None,
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
            None
        }
    }
}

/// Short git revision of HEAD, for the default build id.
#[must_use]
pub fn git_revision() -> Option<String> {
    command_stdout("git", &["rev-parse", "--short=10", "HEAD"])
}

/// Current git branch name, for the default build branch.
#[must_use]
pub fn git_branch() -> Option<String> {
    command_stdout("git", &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Host name of the build machine.
#[must_use]
pub fn host_name() -> Option<String> {
    command_stdout("hostname", &[]).or_else(|| std::env::var("HOSTNAME").ok())
}

/// Short platform name, e.g. `Linux`.
#[must_use]
pub fn platform_os() -> String {
    command_stdout("uname", &["-s"]).unwrap_or_else(|| std::env::consts::OS.to_owned())
}

/// Fuller platform description (system, release, version, machine).
#[must_use]
pub fn platform_description() -> Option<String> {
    command_stdout("uname", &["-srvm"])
}

/// Local username of the person running the build.
#[must_use]
pub fn current_user() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
}

/// Current local time in the traditional ctime layout, e.g.
/// `Fri Aug 28 12:00:00 2026`.
#[must_use]
pub fn build_timestamp() -> String {
    Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}
