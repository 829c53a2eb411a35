//! Network diagnostics and bridge mode switching.
//!
//! The diagnostic suite is read-only: WiFi decode, gateway, host-to-device
//! latency, DNS probes. The mode switches are fire-and-forget with no
//! rollback; a failure leaves the device link in an ambiguous state that
//! the operator resolves manually.

use crate::adb::{self, Adb};
use crate::error::PulseError;
use crate::parsers;
use crate::record::{DnsTest, NetworkDiagnostics, PingStats, Transport, WifiDetails};
use std::time::Duration;
use tracing::{info, warn};

/// Hosts probed for DNS resolution.
const DNS_PROBE_HOSTS: &[&str] = &["google.com", "github.com"];

/// Default port for the wireless bridge link.
pub const DEFAULT_WIRELESS_PORT: u16 = 5555;

/// Reachability probes get a shorter budget than general commands.
const PING_TIMEOUT: Duration = Duration::from_secs(15);

/// A selector containing a colon is a network address, so the bridge is
/// already wireless.
pub fn transport_for(selector: Option<&str>) -> Transport {
    match selector {
        Some(id) if id.contains(':') => Transport::Wireless,
        _ => Transport::Usb,
    }
}

/// The phone's WiFi IP address, if it has one.
pub async fn phone_ip(adb: &Adb) -> Option<String> {
    let output = adb.run("shell ip addr show wlan0").await;
    parsers::network::parse_wlan_ip(&output)
}

/// Detailed WiFi decode plus default gateway.
pub async fn wifi_details(adb: &Adb) -> WifiDetails {
    let mut wifi = parsers::wifi_detail::parse_wifi_details(&adb.run("shell dumpsys wifi").await);
    wifi.gateway = parsers::wifi_detail::parse_gateway(&adb.run("shell ip route").await);
    wifi
}

/// Ping the device from the host to measure round-trip latency.
pub async fn ping_device(ip: &str) -> Option<PingStats> {
    let argv = vec![
        "ping".to_string(),
        "-c".to_string(),
        "5".to_string(),
        "-W".to_string(),
        "2".to_string(),
        ip.to_string(),
    ];
    let output = adb::run_command(argv, PING_TIMEOUT).await;
    parsers::ping::parse_ping_stats(&output)
}

/// DNS resolution probes run on the device against fixed hostnames.
pub async fn dns_tests(adb: &Adb) -> Vec<DnsTest> {
    let mut tests = Vec::new();
    for host in DNS_PROBE_HOSTS {
        let output = adb.run(&format!("shell ping -c 1 -W 2 {}", host)).await;
        tests.push(parsers::ping::parse_dns_probe(host, &output));
    }
    tests
}

/// Run the full diagnostic suite.
pub async fn collect_diagnostics(adb: &Adb) -> NetworkDiagnostics {
    info!("Running network diagnostics");

    let connection_type = transport_for(adb.selector());
    let wifi = wifi_details(adb).await;
    let phone_ip = phone_ip(adb).await;

    let ping = match phone_ip.as_deref() {
        Some(ip) => {
            info!("Pinging {}", ip);
            ping_device(ip).await
        }
        None => {
            warn!("No phone IP found; skipping latency measurement");
            None
        }
    };

    let dns_tests = dns_tests(adb).await;
    for test in &dns_tests {
        info!(
            "DNS {}: {}",
            test.host,
            if test.resolved { "OK" } else { "FAIL" }
        );
    }

    info!("Network diagnostics complete");
    NetworkDiagnostics {
        connection_type,
        wifi,
        phone_ip,
        ping,
        dns_tests,
    }
}

/// Reconfigure the bridge to listen on TCP and reconnect over the network.
///
/// Fire-and-forget: on failure the device may be left in TCP mode without
/// a connection. Returns the wireless target ("ip:port") on success.
pub async fn switch_to_wireless(adb: &Adb, port: u16) -> Result<String, PulseError> {
    info!("Switching to wireless mode on port {}", port);

    // The IP must be read while the wired link still works.
    let ip = phone_ip(adb).await.ok_or(PulseError::NoPhoneIp)?;

    let output = adb.run(&format!("tcpip {}", port)).await;
    info!("TCP/IP mode enabled: {}", output);

    // Give the bridge a moment to restart in TCP mode.
    tokio::time::sleep(Duration::from_secs(2)).await;

    let target = format!("{}:{}", ip, port);
    let output = Adb::new(None).run(&format!("connect {}", target)).await;
    info!("Wireless connection: {}", output);

    if output.to_lowercase().contains("connected") {
        Ok(target)
    } else {
        Err(PulseError::WirelessConnectFailed(output))
    }
}

/// Revert the bridge to the direct USB link. Returns the command output
/// for operator display; no rollback on failure.
pub async fn switch_to_wired(adb: &Adb) -> String {
    info!("Switching back to USB mode");
    if let Some(selector) = adb.selector() {
        if selector.contains(':') {
            Adb::new(None)
                .run(&format!("disconnect {}", selector))
                .await;
        }
    }
    let output = adb.run("usb").await;
    if output.is_empty() {
        warn!("usb mode switch returned no output");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_with_colon_is_wireless() {
        assert_eq!(transport_for(Some("192.168.1.44:5555")), Transport::Wireless);
        assert_eq!(transport_for(Some("emulator-5554")), Transport::Usb);
        assert_eq!(transport_for(None), Transport::Usb);
    }
}
