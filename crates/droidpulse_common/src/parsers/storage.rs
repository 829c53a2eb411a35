//! Parser for `df -h` output from the device shell.

use crate::record::StorageEntry;

/// Mount points worth reporting; everything else is silently dropped.
const MOUNT_ALLOW_LIST: &[&str] = &["/data", "/storage/emulated"];

/// Parse `df -h` output into storage entries, keeping report order.
/// Duplicate mount paths are not deduplicated.
pub fn parse_df(output: &str) -> Vec<StorageEntry> {
    output.lines().skip(1).filter_map(parse_df_row).collect()
}

fn parse_df_row(line: &str) -> Option<StorageEntry> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 6 {
        return None;
    }
    let mounted_on = parts[5];
    if !MOUNT_ALLOW_LIST.contains(&mounted_on) {
        return None;
    }
    let use_percent = parts[4].trim_end_matches('%').parse().unwrap_or(0);
    Some(StorageEntry {
        filesystem: parts[0].to_string(),
        size: parts[1].to_string(),
        used: parts[2].to_string(),
        available: parts[3].to_string(),
        use_percent,
        mounted_on: mounted_on.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DF_OUTPUT: &str = "\
Filesystem            Size  Used Avail Use% Mounted on
/dev/block/dm-5        11G  8.1G  2.5G  77% /
tmpfs                 2.8G  1.1M  2.8G   1% /dev
/dev/block/dm-37      107G   99G  8.0G  93% /data
/dev/fuse             107G   99G  8.0G  93% /storage/emulated";

    #[test]
    fn golden_parse_df_filters_to_relevant_mounts() {
        let entries = parse_df(DF_OUTPUT);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].mounted_on, "/data");
        assert_eq!(entries[0].filesystem, "/dev/block/dm-37");
        assert_eq!(entries[0].size, "107G");
        assert_eq!(entries[0].used, "99G");
        assert_eq!(entries[0].available, "8.0G");
        assert_eq!(entries[0].use_percent, 93);

        assert_eq!(entries[1].mounted_on, "/storage/emulated");
    }

    #[test]
    fn short_rows_are_skipped() {
        let output = "Filesystem Size Used Avail Use% Mounted on\n/dev/block/dm-37 107G 99G";
        assert!(parse_df(output).is_empty());
    }

    #[test]
    fn duplicate_mounts_are_kept_in_order() {
        let output = "\
Filesystem Size Used Avail Use% Mounted on
/dev/a 10G 5G 5G 50% /data
/dev/b 20G 2G 18G 10% /data";
        let entries = parse_df(output);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].use_percent, 50);
        assert_eq!(entries[1].use_percent, 10);
    }

    #[test]
    fn unparsable_percent_defaults_to_zero() {
        let output = "Filesystem Size Used Avail Use% Mounted on\n/dev/a 10G 5G 5G - /data";
        let entries = parse_df(output);
        assert_eq!(entries[0].use_percent, 0);
    }
}
