//! Parser for error-priority logcat output.

use crate::record::ErrorLog;

/// The dashboard and report only carry this many recent lines.
const RECENT_ERROR_LINES: usize = 30;

/// Count error lines and keep the last 30 verbatim (all of them if fewer).
pub fn parse_error_log(output: &str) -> ErrorLog {
    let lines: Vec<&str> = output.lines().collect();
    let total_errors = lines.len();
    let start = total_errors.saturating_sub(RECENT_ERROR_LINES);
    ErrorLog {
        total_errors,
        recent_errors: lines[start..].iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_logs_are_kept_whole() {
        let output = "03-02 10:00:01.123  1234  1234 E AndroidRuntime: FATAL EXCEPTION\n\
                      03-02 10:00:01.125  1234  1234 E AndroidRuntime: java.lang.NullPointerException";
        let log = parse_error_log(output);
        assert_eq!(log.total_errors, 2);
        assert_eq!(log.recent_errors.len(), 2);
        assert!(log.recent_errors[0].contains("FATAL EXCEPTION"));
    }

    #[test]
    fn long_logs_keep_only_the_last_thirty() {
        let output: String = (0..45)
            .map(|i| format!("E line {}\n", i))
            .collect();
        let log = parse_error_log(&output);
        assert_eq!(log.total_errors, 45);
        assert_eq!(log.recent_errors.len(), 30);
        assert_eq!(log.recent_errors[0], "E line 15");
        assert_eq!(log.recent_errors[29], "E line 44");
    }

    #[test]
    fn empty_output_is_zero_errors() {
        let log = parse_error_log("");
        assert_eq!(log.total_errors, 0);
        assert!(log.recent_errors.is_empty());
    }
}
