//! Parsers for ping-utility summaries and DNS resolution probes.

use super::{capture, capture_f64};
use crate::record::{DnsTest, PingStats};
use regex::Regex;

/// Parse the summary of a standard ping run (packet counts, loss, RTT).
/// Returns `None` when neither the packet nor the RTT line was found.
pub fn parse_ping_stats(output: &str) -> Option<PingStats> {
    let mut stats = PingStats::default();

    if let Some(caps) = Regex::new(r"(\d+) packets transmitted, (\d+) received.+?(\d+)% packet loss")
        .ok()
        .and_then(|re| re.captures(output))
    {
        stats.packets_sent = caps[1].parse().ok();
        stats.packets_received = caps[2].parse().ok();
        stats.packet_loss = Some(format!("{}%", &caps[3]));
    }

    if let Some(caps) = Regex::new(r"rtt min/avg/max/mdev = ([\d.]+)/([\d.]+)/([\d.]+)/([\d.]+)")
        .ok()
        .and_then(|re| re.captures(output))
    {
        stats.rtt_min_ms = caps[1].parse().ok();
        stats.rtt_avg_ms = caps[2].parse().ok();
        stats.rtt_max_ms = caps[3].parse().ok();
        stats.rtt_mdev_ms = caps[4].parse().ok();
    }

    if stats.packets_sent.is_none() && stats.rtt_avg_ms.is_none() {
        return None;
    }
    Some(stats)
}

/// Interpret a single-packet device ping against `host` as a DNS probe:
/// resolution succeeded when one reply came back.
pub fn parse_dns_probe(host: &str, output: &str) -> DnsTest {
    let resolved = output.contains("1 received") || output.contains("1 packets received");
    if !resolved {
        return DnsTest {
            host: host.to_string(),
            resolved: false,
            ip: None,
            latency_ms: None,
        };
    }
    DnsTest {
        host: host.to_string(),
        resolved: true,
        ip: capture(output, r"\((\d+\.\d+\.\d+\.\d+)\)"),
        latency_ms: capture_f64(output, r"time[=<]([\d.]+)\s*ms"),
    }
}
