//! ADB command runner.
//!
//! Every interaction with the device goes through [`Adb::run`]: build the
//! argument list, execute with a bounded timeout, hand back stdout as text.
//! Failures degrade to an empty string so a broken probe never aborts the
//! rest of a scan; callers treat empty output as "no data".

use std::process::Command;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Default per-command timeout.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle for issuing commands to one device (or the default device).
#[derive(Debug, Clone)]
pub struct Adb {
    selector: Option<String>,
    timeout: Duration,
}

impl Adb {
    pub fn new(selector: Option<String>) -> Self {
        Self {
            selector,
            timeout: COMMAND_TIMEOUT,
        }
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Run an adb command and return its stdout, trimmed.
    ///
    /// Timeouts, a missing executable, and spawn failures all return an
    /// empty string after logging; a non-zero exit still yields whatever
    /// stdout was captured. No retries.
    pub async fn run(&self, command: &str) -> String {
        let argv = build_argv(self.selector(), command);
        run_command(argv, self.timeout).await
    }

    /// List connected device identifiers via `adb devices`.
    pub async fn list_devices() -> Vec<String> {
        let output = Adb::new(None).run("devices").await;
        parse_devices(&output)
    }
}

/// Assemble the adb argument list: base executable, optional `-s <selector>`,
/// then the whitespace-tokenized command.
fn build_argv(selector: Option<&str>, command: &str) -> Vec<String> {
    let mut argv = vec!["adb".to_string()];
    if let Some(id) = selector {
        argv.push("-s".to_string());
        argv.push(id.to_string());
    }
    argv.extend(command.split_whitespace().map(String::from));
    argv
}

/// Parse `adb devices` output: skip the header, keep lines in the
/// "<id>\tdevice" state.
fn parse_devices(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter(|line| line.contains("\tdevice"))
        .filter_map(|line| line.split('\t').next())
        .map(String::from)
        .collect()
}

/// Execute an argument list with a timeout, degrading to empty output.
pub(crate) async fn run_command(argv: Vec<String>, limit: Duration) -> String {
    let display_cmd = argv.join(" ");
    let result = timeout(
        limit,
        tokio::task::spawn_blocking(move || Command::new(&argv[0]).args(&argv[1..]).output()),
    )
    .await;

    match result {
        Ok(Ok(Ok(output))) => String::from_utf8_lossy(&output.stdout).trim().to_string(),
        Ok(Ok(Err(e))) => {
            warn!("Failed to run '{}': {}", display_cmd, e);
            String::new()
        }
        Ok(Err(e)) => {
            warn!("Task error for '{}': {}", display_cmd, e);
            String::new()
        }
        Err(_) => {
            warn!("Command timed out: {}", display_cmd);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argv_includes_selector_when_present() {
        assert_eq!(
            build_argv(Some("emulator-5554"), "shell dumpsys battery"),
            vec!["adb", "-s", "emulator-5554", "shell", "dumpsys", "battery"]
        );
    }

    #[test]
    fn argv_without_selector_targets_default_device() {
        assert_eq!(build_argv(None, "devices"), vec!["adb", "devices"]);
    }

    #[test]
    fn parse_devices_skips_header_and_offline_entries() {
        let output = "List of devices attached\n\
                      emulator-5554\tdevice\n\
                      192.168.1.44:5555\tdevice\n\
                      0A241FDD4002\toffline";
        assert_eq!(
            parse_devices(output),
            vec!["emulator-5554", "192.168.1.44:5555"]
        );
    }

    #[test]
    fn parse_devices_handles_empty_output() {
        assert!(parse_devices("").is_empty());
        assert!(parse_devices("List of devices attached").is_empty());
    }

    #[tokio::test]
    async fn missing_executable_degrades_to_empty_output() {
        let output = run_command(
            vec!["droidpulse-no-such-binary".to_string()],
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(output, "");
    }
}
