//! Helpers for probing external tools.

use std::process::{Command, Stdio};

/// Run `<binary> <flag>` and return the first line of its output when the
/// tool exits successfully. `None` means the tool is missing or broken.
pub fn tool_version(binary: &str, flag: &str) -> Option<String> {
    let output = Command::new(binary)
        .arg(flag)
        .stdin(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!(binary, status = %output.status, "Version query failed");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next().unwrap_or_default().trim().to_string();
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_has_no_version() {
        assert_eq!(tool_version("chatvid-definitely-not-installed", "--version"), None);
    }
}
