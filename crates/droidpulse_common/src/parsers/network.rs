//! Parsers for WiFi state, IP configuration, and connectivity class.

use super::capture;
use crate::record::{ConnectionType, Network, SignalQuality};
use regex::Regex;

/// Classify RSSI into signal quality. Thresholds are fixed: the analyzer
/// relies on them for consistent health classification.
pub fn signal_quality(rssi: i64) -> SignalQuality {
    if rssi >= -50 {
        SignalQuality::Excellent
    } else if rssi >= -60 {
        SignalQuality::Good
    } else if rssi >= -70 {
        SignalQuality::Fair
    } else {
        SignalQuality::Poor
    }
}

/// Frequency band label: 5GHz at or above 5000 MHz, 2.4GHz below.
pub fn band(frequency_mhz: i64) -> &'static str {
    if frequency_mhz >= 5000 {
        "5GHz"
    } else {
        "2.4GHz"
    }
}

/// Extract the active WiFi link from a `dumpsys wifi` dump.
/// Returns a `Network` with only the link fields populated.
pub fn parse_wifi_info(output: &str) -> Network {
    let mut network = Network::default();

    let re = Regex::new(
        r#"mWifiInfo SSID: "([^"]+)".*?RSSI: (-?\d+).*?Link speed: (\d+)Mbps.*?Frequency: (\d+)MHz"#,
    );
    if let Some(caps) = re.ok().and_then(|re| re.captures(output)) {
        network.ssid = Some(caps[1].to_string());
        network.rssi = caps[2].parse().ok();
        network.link_speed_mbps = caps[3].parse().ok();
        network.frequency_mhz = caps[4].parse().ok();
        network.band = network.frequency_mhz.map(|f| band(f).to_string());
        network.signal_quality = network.rssi.map(signal_quality);
    }
    network
}

/// IPv4 address and prefix length from `ip addr show wlan0`.
pub fn parse_inet(output: &str) -> (Option<String>, Option<String>) {
    let re = Regex::new(r"inet (\d+\.\d+\.\d+\.\d+)/(\d+)");
    match re.ok().and_then(|re| re.captures(output)) {
        Some(caps) => (Some(caps[1].to_string()), Some(caps[2].to_string())),
        None => (None, None),
    }
}

/// Global-scope IPv6 address, skipping link-local entries.
pub fn parse_inet6_global(output: &str) -> Option<String> {
    capture(output, r"inet6 ([\da-f:]+)/\d+ scope global")
}

/// Connectivity class from a `dumpsys connectivity` dump.
pub fn classify_connection(output: &str) -> ConnectionType {
    if output.contains("WIFI") {
        ConnectionType::WiFi
    } else if output.contains("MOBILE") {
        ConnectionType::MobileData
    } else {
        ConnectionType::Unknown
    }
}

/// Bare IPv4 address of the wlan interface, without the prefix.
pub fn parse_wlan_ip(output: &str) -> Option<String> {
    capture(output, r"inet (\d+\.\d+\.\d+\.\d+)/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIFI_DUMP: &str = r#"mWifiInfo SSID: "HomeNet-5G", BSSID: aa:bb:cc:dd:ee:ff, MAC: 02:00:00:00:00:00, Security type: 2, Supplicant state: COMPLETED, Wi-Fi standard: 5, RSSI: -55, Link speed: 433Mbps, Tx Link speed: 433Mbps, Max Supported Tx Link speed: 433Mbps, Rx Link speed: 433Mbps, Frequency: 5180MHz, Net ID: 1"#;

    #[test]
    fn golden_parse_wifi_info() {
        let network = parse_wifi_info(WIFI_DUMP);
        assert_eq!(network.ssid.as_deref(), Some("HomeNet-5G"));
        assert_eq!(network.rssi, Some(-55));
        assert_eq!(network.link_speed_mbps, Some(433));
        assert_eq!(network.frequency_mhz, Some(5180));
        assert_eq!(network.band.as_deref(), Some("5GHz"));
        assert_eq!(network.signal_quality, Some(SignalQuality::Good));
    }

    #[test]
    fn wifi_info_absent_when_not_connected() {
        let network = parse_wifi_info("mWifiInfo SSID: <unknown ssid>");
        assert_eq!(network.ssid, None);
        assert_eq!(network.signal_quality, None);
    }

    #[test]
    fn signal_quality_boundaries() {
        assert_eq!(signal_quality(-40), SignalQuality::Excellent);
        assert_eq!(signal_quality(-50), SignalQuality::Excellent);
        assert_eq!(signal_quality(-51), SignalQuality::Good);
        assert_eq!(signal_quality(-60), SignalQuality::Good);
        assert_eq!(signal_quality(-61), SignalQuality::Fair);
        assert_eq!(signal_quality(-70), SignalQuality::Fair);
        assert_eq!(signal_quality(-71), SignalQuality::Poor);
        assert_eq!(signal_quality(-80), SignalQuality::Poor);
    }

    #[test]
    fn band_boundary_is_5000_mhz() {
        assert_eq!(band(5000), "5GHz");
        assert_eq!(band(5180), "5GHz");
        assert_eq!(band(4999), "2.4GHz");
        assert_eq!(band(2437), "2.4GHz");
    }

    const IP_ADDR: &str = "\
30: wlan0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc mq state UP
    link/ether 02:00:00:00:00:00 brd ff:ff:ff:ff:ff:ff
    inet 192.168.1.42/24 brd 192.168.1.255 scope global wlan0
       valid_lft forever preferred_lft forever
    inet6 fe80::1234:5678:9abc:def0/64 scope link
    inet6 2001:db8:85a3::8a2e:370:7334/64 scope global dynamic";

    #[test]
    fn golden_parse_ip_addr() {
        let (ip, mask) = parse_inet(IP_ADDR);
        assert_eq!(ip.as_deref(), Some("192.168.1.42"));
        assert_eq!(mask.as_deref(), Some("24"));
        assert_eq!(
            parse_inet6_global(IP_ADDR).as_deref(),
            Some("2001:db8:85a3::8a2e:370:7334")
        );
        assert_eq!(parse_wlan_ip(IP_ADDR).as_deref(), Some("192.168.1.42"));
    }

    #[test]
    fn link_local_ipv6_is_not_global() {
        let output = "    inet6 fe80::1234:5678:9abc:def0/64 scope link";
        assert_eq!(parse_inet6_global(output), None);
    }

    #[test]
    fn connection_classification() {
        assert_eq!(
            classify_connection("NetworkAgentInfo [WIFI () - 102]"),
            ConnectionType::WiFi
        );
        assert_eq!(
            classify_connection("NetworkAgentInfo [MOBILE (LTE) - 101]"),
            ConnectionType::MobileData
        );
        assert_eq!(classify_connection(""), ConnectionType::Unknown);
    }
}
