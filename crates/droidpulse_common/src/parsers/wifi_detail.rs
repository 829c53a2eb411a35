//! Detailed WiFi decode from `dumpsys wifi` and `ip route`.

use super::capture;
use crate::parsers::network::{band, signal_quality};
use crate::record::WifiDetails;
use regex::Regex;

/// Extract the full WiFi link description, including security and standard
/// code tables. Code tables are fixed; unmapped codes resolve to
/// "Unknown (<code>)" so a new Android release never breaks the decode.
pub fn parse_wifi_details(output: &str) -> WifiDetails {
    let mut wifi = WifiDetails::default();

    let re = Regex::new(
        r#"mWifiInfo SSID: "([^"]+)".*?Security type: (\d+).*?Wi-Fi standard: (\d+).*?RSSI: (-?\d+).*?Link speed: (\d+)Mbps.*?Tx Link speed: (\d+)Mbps.*?Rx Link speed: (\d+)Mbps.*?Frequency: (\d+)MHz"#,
    );
    if let Some(caps) = re.ok().and_then(|re| re.captures(output)) {
        wifi.ssid = Some(caps[1].to_string());
        wifi.security_type = caps[2].parse().ok();
        wifi.wifi_standard = caps[3].parse().ok();
        wifi.rssi = caps[4].parse().ok();
        wifi.link_speed_mbps = caps[5].parse().ok();
        wifi.tx_speed_mbps = caps[6].parse().ok();
        wifi.rx_speed_mbps = caps[7].parse().ok();
        wifi.frequency_mhz = caps[8].parse().ok();

        wifi.band = wifi.frequency_mhz.map(|f| band(f).to_string());
        wifi.security_name = wifi.security_type.map(security_name);
        wifi.wifi_standard_name = wifi.wifi_standard.map(standard_name);
        wifi.signal_quality = wifi.rssi.map(signal_quality);
        wifi.signal_percent = wifi.rssi.map(signal_percent);
    }
    wifi
}

/// Security type code table.
pub fn security_name(code: i64) -> String {
    match code {
        0 => "Open".to_string(),
        1 => "WEP".to_string(),
        2 => "WPA-PSK".to_string(),
        3 => "WPA-EAP".to_string(),
        4 => "WPA3-SAE".to_string(),
        5 => "WPA3-Suite-B".to_string(),
        6 => "OWE".to_string(),
        _ => format!("Unknown ({})", code),
    }
}

/// Wi-Fi standard code table.
pub fn standard_name(code: i64) -> String {
    match code {
        4 => "WiFi 4 (802.11n)".to_string(),
        5 => "WiFi 5 (802.11ac)".to_string(),
        6 => "WiFi 6 (802.11ax)".to_string(),
        _ => format!("Unknown ({})", code),
    }
}

/// Linear dBm → percent mapping, clamped at both ends.
pub fn signal_percent(rssi: i64) -> i64 {
    (2 * (rssi + 100)).clamp(0, 100)
}

/// Default gateway from `ip route` output.
pub fn parse_gateway(output: &str) -> Option<String> {
    capture(output, r"default via (\d+\.\d+\.\d+\.\d+)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SignalQuality;

    const WIFI_DUMP: &str = r#"mWifiInfo SSID: "HomeNet-5G", BSSID: aa:bb:cc:dd:ee:ff, MAC: 02:00:00:00:00:00, Security type: 4, Supplicant state: COMPLETED, Wi-Fi standard: 6, RSSI: -48, Link speed: 1200Mbps, Tx Link speed: 1200Mbps, Max Supported Tx Link speed: 2402Mbps, Rx Link speed: 960Mbps, Frequency: 5955MHz, Net ID: 3"#;

    #[test]
    fn golden_parse_wifi_details() {
        let wifi = parse_wifi_details(WIFI_DUMP);
        assert_eq!(wifi.ssid.as_deref(), Some("HomeNet-5G"));
        assert_eq!(wifi.security_type, Some(4));
        assert_eq!(wifi.security_name.as_deref(), Some("WPA3-SAE"));
        assert_eq!(wifi.wifi_standard, Some(6));
        assert_eq!(wifi.wifi_standard_name.as_deref(), Some("WiFi 6 (802.11ax)"));
        assert_eq!(wifi.rssi, Some(-48));
        assert_eq!(wifi.link_speed_mbps, Some(1200));
        assert_eq!(wifi.tx_speed_mbps, Some(1200));
        assert_eq!(wifi.rx_speed_mbps, Some(960));
        assert_eq!(wifi.frequency_mhz, Some(5955));
        assert_eq!(wifi.band.as_deref(), Some("5GHz"));
        assert_eq!(wifi.signal_quality, Some(SignalQuality::Excellent));
        assert_eq!(wifi.signal_percent, Some(100));
    }

    #[test]
    fn unmapped_codes_keep_the_code_visible() {
        assert_eq!(security_name(9), "Unknown (9)");
        assert_eq!(standard_name(11), "Unknown (11)");
    }

    #[test]
    fn signal_percent_is_clamped() {
        assert_eq!(signal_percent(-100), 0);
        assert_eq!(signal_percent(-120), 0);
        assert_eq!(signal_percent(-55), 90);
        assert_eq!(signal_percent(-50), 100);
        assert_eq!(signal_percent(-30), 100);
    }

    #[test]
    fn golden_parse_gateway() {
        let route = "default via 192.168.1.1 dev wlan0 proto dhcp metric 600\n\
                     192.168.1.0/24 dev wlan0 proto kernel scope link src 192.168.1.42";
        assert_eq!(parse_gateway(route).as_deref(), Some("192.168.1.1"));
        assert_eq!(parse_gateway("192.168.1.0/24 dev wlan0"), None);
    }
}
