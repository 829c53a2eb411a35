//! Typed device records assembled from one scan.
//!
//! Every sub-record is built once by the collector and never mutated
//! afterwards. Fields the device did not report stay `None`; consumers must
//! handle absent data instead of assuming defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete snapshot of one device scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_info: DeviceIdentity,
    pub battery: Battery,
    pub storage: Vec<StorageEntry>,
    pub memory: Memory,
    pub cpu: Cpu,
    pub network: Network,
    pub apps: Apps,
    pub error_logs: ErrorLog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<NetworkDiagnostics>,
}

/// Identity properties read via `getprop`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub model: Option<String>,
    pub brand: Option<String>,
    pub device: Option<String>,
    pub android_version: Option<String>,
    pub sdk_level: Option<String>,
    pub build_number: Option<String>,
    pub serial: Option<String>,
    pub hardware: Option<String>,
    pub timestamp: String,
}

/// Battery state from `dumpsys battery`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Battery {
    pub level: Option<i64>,
    pub scale: Option<i64>,
    pub voltage: Option<i64>,
    /// Raw value in tenths of a degree Celsius.
    pub temperature: Option<i64>,
    pub temperature_celsius: Option<f64>,
    pub technology: Option<String>,
    pub status: Option<i64>,
    pub health: Option<i64>,
    pub status_text: Option<BatteryStatus>,
    pub health_text: Option<BatteryHealth>,
    pub ac_powered: Option<bool>,
    pub usb_powered: Option<bool>,
    pub wireless_powered: Option<bool>,
    pub present: Option<bool>,
}

impl Battery {
    /// Active power source label. The device reports independent flags;
    /// USB wins over AC, AC over wireless, otherwise the battery itself.
    pub fn power_source(&self) -> &'static str {
        if self.usb_powered == Some(true) {
            "USB"
        } else if self.ac_powered == Some(true) {
            "AC"
        } else if self.wireless_powered == Some(true) {
            "Wireless"
        } else {
            "Battery"
        }
    }
}

/// Battery charge status codes from the battery service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryStatus {
    Unknown,
    Charging,
    Discharging,
    #[serde(rename = "Not Charging")]
    NotCharging,
    Full,
}

impl BatteryStatus {
    /// Map the raw status code; anything unmapped is `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => BatteryStatus::Charging,
            3 => BatteryStatus::Discharging,
            4 => BatteryStatus::NotCharging,
            5 => BatteryStatus::Full,
            _ => BatteryStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryStatus::Unknown => "Unknown",
            BatteryStatus::Charging => "Charging",
            BatteryStatus::Discharging => "Discharging",
            BatteryStatus::NotCharging => "Not Charging",
            BatteryStatus::Full => "Full",
        }
    }
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Battery health codes from the battery service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryHealth {
    Unknown,
    Good,
    Overheat,
    Dead,
    #[serde(rename = "Over Voltage")]
    OverVoltage,
    Failure,
    Cold,
}

impl BatteryHealth {
    /// Map the raw health code; anything unmapped is `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => BatteryHealth::Good,
            3 => BatteryHealth::Overheat,
            4 => BatteryHealth::Dead,
            5 => BatteryHealth::OverVoltage,
            6 => BatteryHealth::Failure,
            7 => BatteryHealth::Cold,
            _ => BatteryHealth::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatteryHealth::Unknown => "Unknown",
            BatteryHealth::Good => "Good",
            BatteryHealth::Overheat => "Overheat",
            BatteryHealth::Dead => "Dead",
            BatteryHealth::OverVoltage => "Over Voltage",
            BatteryHealth::Failure => "Failure",
            BatteryHealth::Cold => "Cold",
        }
    }
}

impl fmt::Display for BatteryHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mount point from `df -h`, sizes kept as reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEntry {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub available: String,
    pub use_percent: u8,
    pub mounted_on: String,
}

/// Memory totals from `/proc/meminfo` plus top consumers from
/// `dumpsys meminfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Memory {
    pub total_kb: Option<u64>,
    pub free_kb: Option<u64>,
    pub available_kb: Option<u64>,
    pub buffers_kb: Option<u64>,
    pub cached_kb: Option<u64>,
    pub used_kb: Option<u64>,
    pub used_percent: Option<f64>,
    pub total_mb: Option<f64>,
    pub free_mb: Option<f64>,
    pub available_mb: Option<f64>,
    pub buffers_mb: Option<f64>,
    pub cached_mb: Option<f64>,
    pub used_mb: Option<f64>,
    pub top_consumers: Vec<MemoryConsumer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConsumer {
    pub memory_kb: u64,
    pub process: String,
}

/// CPU load and top consumers from `dumpsys cpuinfo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cpu {
    pub load_1min: Option<f64>,
    pub load_5min: Option<f64>,
    pub load_15min: Option<f64>,
    pub top_consumers: Vec<CpuConsumer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuConsumer {
    pub cpu_percent: f64,
    pub pid: u32,
    pub process: String,
    pub details: String,
}

/// WiFi link, addressing, and connectivity classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Network {
    pub ssid: Option<String>,
    pub rssi: Option<i64>,
    pub link_speed_mbps: Option<i64>,
    pub frequency_mhz: Option<i64>,
    pub band: Option<String>,
    pub signal_quality: Option<SignalQuality>,
    pub ip_address: Option<String>,
    pub subnet_mask: Option<String>,
    pub ipv6_address: Option<String>,
    pub dns: Vec<String>,
    pub connection_type: ConnectionType,
}

/// RSSI classification; thresholds are fixed and shared with the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SignalQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalQuality::Excellent => "Excellent",
            SignalQuality::Good => "Good",
            SignalQuality::Fair => "Fair",
            SignalQuality::Poor => "Poor",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionType {
    WiFi,
    #[serde(rename = "Mobile Data")]
    MobileData,
    #[default]
    Unknown,
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionType::WiFi => "WiFi",
            ConnectionType::MobileData => "Mobile Data",
            ConnectionType::Unknown => "Unknown",
        })
    }
}

/// Installed package counts from `pm list packages`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Apps {
    pub total_packages: usize,
    pub system_count: usize,
    pub third_party_count: usize,
    pub third_party_apps: Vec<String>,
}

/// Error-priority logcat summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorLog {
    pub total_errors: usize,
    pub recent_errors: Vec<String>,
}

/// How the bridge currently reaches the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    Usb,
    Wireless,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::Usb => "USB",
            Transport::Wireless => "WiFi",
        })
    }
}

/// Full diagnostic suite result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDiagnostics {
    pub connection_type: Transport,
    pub wifi: WifiDetails,
    pub phone_ip: Option<String>,
    pub ping: Option<PingStats>,
    pub dns_tests: Vec<DnsTest>,
}

/// Detailed WiFi decode from `dumpsys wifi`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WifiDetails {
    pub ssid: Option<String>,
    pub security_type: Option<i64>,
    pub security_name: Option<String>,
    pub wifi_standard: Option<i64>,
    pub wifi_standard_name: Option<String>,
    pub rssi: Option<i64>,
    pub link_speed_mbps: Option<i64>,
    pub tx_speed_mbps: Option<i64>,
    pub rx_speed_mbps: Option<i64>,
    pub frequency_mhz: Option<i64>,
    pub band: Option<String>,
    pub signal_quality: Option<SignalQuality>,
    pub signal_percent: Option<i64>,
    pub gateway: Option<String>,
}

/// Parsed summary of a host-side `ping` run against the device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PingStats {
    pub packets_sent: Option<u32>,
    pub packets_received: Option<u32>,
    pub packet_loss: Option<String>,
    pub rtt_min_ms: Option<f64>,
    pub rtt_avg_ms: Option<f64>,
    pub rtt_max_ms: Option<f64>,
    pub rtt_mdev_ms: Option<f64>,
}

/// One DNS resolution probe run on the device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsTest {
    pub host: String,
    pub resolved: bool,
    pub ip: Option<String>,
    pub latency_ms: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_status_codes_map_to_labels() {
        assert_eq!(BatteryStatus::from_code(2), BatteryStatus::Charging);
        assert_eq!(BatteryStatus::from_code(5), BatteryStatus::Full);
        assert_eq!(BatteryStatus::from_code(0), BatteryStatus::Unknown);
        assert_eq!(BatteryStatus::from_code(99), BatteryStatus::Unknown);
        assert_eq!(BatteryStatus::NotCharging.to_string(), "Not Charging");
    }

    #[test]
    fn battery_health_codes_map_to_labels() {
        assert_eq!(BatteryHealth::from_code(2), BatteryHealth::Good);
        assert_eq!(BatteryHealth::from_code(5), BatteryHealth::OverVoltage);
        assert_eq!(BatteryHealth::from_code(7), BatteryHealth::Cold);
        // Unmapped codes always resolve to Unknown, never an error.
        assert_eq!(BatteryHealth::from_code(-1), BatteryHealth::Unknown);
        assert_eq!(BatteryHealth::from_code(42), BatteryHealth::Unknown);
        assert_eq!(BatteryHealth::OverVoltage.to_string(), "Over Voltage");
    }

    #[test]
    fn power_source_prefers_usb_then_ac_then_wireless() {
        let mut battery = Battery {
            usb_powered: Some(true),
            ac_powered: Some(true),
            wireless_powered: Some(true),
            ..Battery::default()
        };
        assert_eq!(battery.power_source(), "USB");
        battery.usb_powered = Some(false);
        assert_eq!(battery.power_source(), "AC");
        battery.ac_powered = Some(false);
        assert_eq!(battery.power_source(), "Wireless");
        battery.wireless_powered = None;
        assert_eq!(battery.power_source(), "Battery");
    }

    #[test]
    fn enum_labels_serialize_like_the_report_format() {
        let json = serde_json::to_string(&BatteryHealth::OverVoltage).unwrap();
        assert_eq!(json, "\"Over Voltage\"");
        let json = serde_json::to_string(&ConnectionType::MobileData).unwrap();
        assert_eq!(json, "\"Mobile Data\"");
    }
}
