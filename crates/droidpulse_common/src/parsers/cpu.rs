//! Parser for `dumpsys cpuinfo` output.

use super::MAX_TOP_CONSUMERS;
use crate::record::{Cpu, CpuConsumer};
use regex::Regex;

/// Extract load averages and top consumers from a `dumpsys cpuinfo` dump.
pub fn parse_cpuinfo(output: &str) -> Cpu {
    let mut cpu = Cpu::default();

    if let Some(caps) = Regex::new(r"Load:\s+([\d.]+)\s*/\s*([\d.]+)\s*/\s*([\d.]+)")
        .ok()
        .and_then(|re| re.captures(output))
    {
        cpu.load_1min = caps[1].parse().ok();
        cpu.load_5min = caps[2].parse().ok();
        cpu.load_15min = caps[3].parse().ok();
    }

    let re = match Regex::new(r"^\s+([\d.]+)%\s+(\d+)/(.+?):\s+(.*)$") {
        Ok(re) => re,
        Err(_) => return cpu,
    };
    for line in output.lines() {
        if cpu.top_consumers.len() >= MAX_TOP_CONSUMERS {
            break;
        }
        if let Some(caps) = re.captures(line) {
            let Ok(cpu_percent) = caps[1].parse::<f64>() else {
                continue;
            };
            let Ok(pid) = caps[2].parse::<u32>() else {
                continue;
            };
            cpu.top_consumers.push(CpuConsumer {
                cpu_percent,
                pid,
                process: caps[3].trim().to_string(),
                details: caps[4].trim().to_string(),
            });
        }
    }
    cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "\
Load: 9.85 / 9.92 / 10.01
CPU usage from 305042ms to 5042ms ago (2024-03-02 10:00:00 to 10:05:00):
  102% 1656/system_server: 57% user + 45% kernel / faults: 12345 minor
  12% 2416/com.android.systemui: 8.9% user + 3.5% kernel
  0.5% 812/surfaceflinger: 0.3% user + 0.2% kernel";

    #[test]
    fn golden_parse_cpuinfo() {
        let cpu = parse_cpuinfo(CPUINFO);
        assert_eq!(cpu.load_1min, Some(9.85));
        assert_eq!(cpu.load_5min, Some(9.92));
        assert_eq!(cpu.load_15min, Some(10.01));

        assert_eq!(cpu.top_consumers.len(), 3);
        let top = &cpu.top_consumers[0];
        assert_eq!(top.cpu_percent, 102.0);
        assert_eq!(top.pid, 1656);
        assert_eq!(top.process, "system_server");
        assert_eq!(top.details, "57% user + 45% kernel / faults: 12345 minor");

        assert_eq!(cpu.top_consumers[2].cpu_percent, 0.5);
        assert_eq!(cpu.top_consumers[2].process, "surfaceflinger");
    }

    #[test]
    fn consumers_cap_at_ten() {
        let mut output = String::from("Load: 1.0 / 1.0 / 1.0\n");
        for i in 0..14 {
            output.push_str(&format!("  1.{i}% {i}/proc.{i}: details\n"));
        }
        let cpu = parse_cpuinfo(&output);
        assert_eq!(cpu.top_consumers.len(), 10);
        assert_eq!(cpu.top_consumers[0].process, "proc.0");
        assert_eq!(cpu.top_consumers[9].process, "proc.9");
    }

    #[test]
    fn missing_load_line_leaves_loads_absent() {
        let cpu = parse_cpuinfo("CPU usage from 1ms to 2ms ago:");
        assert_eq!(cpu.load_1min, None);
        assert!(cpu.top_consumers.is_empty());
    }
}
