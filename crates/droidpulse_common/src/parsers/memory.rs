//! Parsers for `/proc/meminfo` and `dumpsys meminfo`.

use super::{capture_u64, round1, MAX_TOP_CONSUMERS};
use crate::record::{Memory, MemoryConsumer};
use regex::Regex;

/// Extract memory totals from `/proc/meminfo` and derive usage figures.
///
/// Derived fields are computed only when their inputs are present: used
/// kilobytes and percentage need both MemTotal and MemAvailable, and every
/// kilobyte figure is mirrored into megabytes at one decimal.
pub fn parse_meminfo(output: &str) -> Memory {
    let mut memory = Memory {
        total_kb: capture_u64(output, r"MemTotal:\s+(\d+)"),
        free_kb: capture_u64(output, r"MemFree:\s+(\d+)"),
        available_kb: capture_u64(output, r"MemAvailable:\s+(\d+)"),
        buffers_kb: capture_u64(output, r"Buffers:\s+(\d+)"),
        cached_kb: capture_u64(output, r"Cached:\s+(\d+)"),
        ..Memory::default()
    };

    if let (Some(total), Some(available)) = (memory.total_kb, memory.available_kb) {
        if total > 0 {
            let used = total.saturating_sub(available);
            memory.used_kb = Some(used);
            memory.used_percent = Some(round1(used as f64 / total as f64 * 100.0));
        }
    }

    memory.total_mb = memory.total_kb.map(kb_to_mb);
    memory.free_mb = memory.free_kb.map(kb_to_mb);
    memory.available_mb = memory.available_kb.map(kb_to_mb);
    memory.buffers_mb = memory.buffers_kb.map(kb_to_mb);
    memory.cached_mb = memory.cached_kb.map(kb_to_mb);
    memory.used_mb = memory.used_kb.map(kb_to_mb);
    memory
}

fn kb_to_mb(kb: u64) -> f64 {
    round1(kb as f64 / 1024.0)
}

/// Extract per-process totals from the `dumpsys meminfo` PSS section.
/// Stops accepting entries at the cap, preserving source order; no sorting.
pub fn parse_meminfo_consumers(output: &str) -> Vec<MemoryConsumer> {
    let re = match Regex::new(r"^\s+([\d,]+)K:\s+(.+?)(?:\s+\(pid.*)?$") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut consumers = Vec::new();
    for line in output.lines() {
        if consumers.len() >= MAX_TOP_CONSUMERS {
            break;
        }
        if let Some(caps) = re.captures(line) {
            let memory_kb = caps[1].replace(',', "").parse().unwrap_or(0);
            consumers.push(MemoryConsumer {
                memory_kb,
                process: caps[2].trim().to_string(),
            });
        }
    }
    consumers
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMINFO: &str = "\
MemTotal:        7811596 kB
MemFree:          301660 kB
MemAvailable:    2523776 kB
Buffers:            7180 kB
Cached:          2612708 kB
SwapCached:        41304 kB";

    #[test]
    fn golden_parse_meminfo() {
        let memory = parse_meminfo(MEMINFO);
        assert_eq!(memory.total_kb, Some(7_811_596));
        assert_eq!(memory.free_kb, Some(301_660));
        assert_eq!(memory.available_kb, Some(2_523_776));
        assert_eq!(memory.buffers_kb, Some(7_180));
        assert_eq!(memory.cached_kb, Some(2_612_708));

        assert_eq!(memory.used_kb, Some(5_287_820));
        assert_eq!(memory.used_percent, Some(67.7));
        assert_eq!(memory.total_mb, Some(7628.5));
        assert_eq!(memory.used_mb, Some(5163.9));
    }

    #[test]
    fn derived_fields_need_their_inputs() {
        let memory = parse_meminfo("MemTotal:        7811596 kB");
        assert_eq!(memory.total_kb, Some(7_811_596));
        assert_eq!(memory.used_kb, None);
        assert_eq!(memory.used_percent, None);
        assert_eq!(memory.total_mb, Some(7628.5));
        assert_eq!(memory.used_mb, None);
    }

    const MEMINFO_CONSUMERS: &str = "\
Total PSS by process:
    285,143K: com.google.android.gms (pid 10234)
    180,002K: system (pid 987)
     95,441K: com.android.systemui (pid 1456)";

    #[test]
    fn golden_parse_consumers_strips_pid_suffix() {
        let consumers = parse_meminfo_consumers(MEMINFO_CONSUMERS);
        assert_eq!(consumers.len(), 3);
        assert_eq!(consumers[0].memory_kb, 285_143);
        assert_eq!(consumers[0].process, "com.google.android.gms");
        assert_eq!(consumers[2].memory_kb, 95_441);
        assert_eq!(consumers[2].process, "com.android.systemui");
    }

    #[test]
    fn consumers_cap_at_ten_preserving_source_order() {
        let mut output = String::from("Total PSS by process:\n");
        for i in 0..15 {
            output.push_str(&format!("    {},000K: process.{} (pid {})\n", 15 - i, i, i));
        }
        let consumers = parse_meminfo_consumers(&output);
        assert_eq!(consumers.len(), 10);
        // Source order, not sorted.
        assert_eq!(consumers[0].process, "process.0");
        assert_eq!(consumers[9].process, "process.9");
    }

    #[test]
    fn empty_output_has_no_consumers() {
        assert!(parse_meminfo_consumers("").is_empty());
    }
}
