//! Parser for `pm list packages` output.

use crate::record::Apps;

/// Strip the "package:" prefix from each non-empty line.
pub fn parse_package_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.replace("package:", ""))
        .collect()
}

/// Assemble counts from the full and third-party package lists.
/// Third-party identifiers are sorted lexicographically.
pub fn build_apps(all: Vec<String>, third_party: Vec<String>) -> Apps {
    let mut third_party = third_party;
    third_party.sort();
    Apps {
        total_packages: all.len(),
        system_count: all.len().saturating_sub(third_party.len()),
        third_party_count: third_party.len(),
        third_party_apps: third_party,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_prefix_is_stripped() {
        let output = "package:com.android.settings\npackage:org.mozilla.firefox\n";
        assert_eq!(
            parse_package_list(output),
            vec!["com.android.settings", "org.mozilla.firefox"]
        );
    }

    #[test]
    fn counts_and_sorted_third_party_list() {
        let all = vec![
            "com.android.settings".to_string(),
            "com.android.phone".to_string(),
            "org.mozilla.firefox".to_string(),
            "com.spotify.music".to_string(),
        ];
        let third = vec![
            "org.mozilla.firefox".to_string(),
            "com.spotify.music".to_string(),
        ];
        let apps = build_apps(all, third);
        assert_eq!(apps.total_packages, 4);
        assert_eq!(apps.system_count, 2);
        assert_eq!(apps.third_party_count, 2);
        assert_eq!(
            apps.third_party_apps,
            vec!["com.spotify.music", "org.mozilla.firefox"]
        );
    }

    #[test]
    fn empty_lists_are_fine() {
        let apps = build_apps(Vec::new(), Vec::new());
        assert_eq!(apps.total_packages, 0);
        assert_eq!(apps.system_count, 0);
        assert!(apps.third_party_apps.is_empty());
    }
}
