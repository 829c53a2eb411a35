//! Parser for `dumpsys battery` output.

use super::{capture, capture_bool, capture_i64};
use crate::record::{Battery, BatteryHealth, BatteryStatus};

/// Extract battery state from a `dumpsys battery` dump.
///
/// Missing fields stay `None`; derived fields (Celsius temperature, mapped
/// status/health labels) are computed only when their raw inputs matched.
pub fn parse_battery(output: &str) -> Battery {
    let mut battery = Battery {
        level: capture_i64(output, r"level:\s*(\d+)"),
        scale: capture_i64(output, r"scale:\s*(\d+)"),
        voltage: capture_i64(output, r"voltage:\s*(\d+)"),
        temperature: capture_i64(output, r"temperature:\s*(\d+)"),
        technology: capture(output, r"technology:\s*(.+)"),
        status: capture_i64(output, r"status:\s*(\d+)"),
        health: capture_i64(output, r"health:\s*(\d+)"),
        ac_powered: capture_bool(output, r"AC powered:\s*(\w+)"),
        usb_powered: capture_bool(output, r"USB powered:\s*(\w+)"),
        wireless_powered: capture_bool(output, r"Wireless powered:\s*(\w+)"),
        present: capture_bool(output, r"present:\s*(\w+)"),
        ..Battery::default()
    };

    // The service reports tenths of a degree.
    battery.temperature_celsius = battery.temperature.map(|t| t as f64 / 10.0);
    battery.status_text = battery.status.map(BatteryStatus::from_code);
    battery.health_text = battery.health.map(BatteryHealth::from_code);
    battery
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATTERY_DUMP: &str = "\
Current Battery Service state:
  AC powered: false
  USB powered: true
  Wireless powered: false
  Charge counter: 2814000
  status: 2
  health: 2
  present: true
  level: 42
  scale: 100
  voltage: 3785
  temperature: 305
  technology: Li-ion";

    #[test]
    fn golden_parse_battery() {
        let battery = parse_battery(BATTERY_DUMP);
        assert_eq!(battery.level, Some(42));
        assert_eq!(battery.scale, Some(100));
        assert_eq!(battery.voltage, Some(3785));
        assert_eq!(battery.temperature, Some(305));
        assert_eq!(battery.temperature_celsius, Some(30.5));
        assert_eq!(battery.technology.as_deref(), Some("Li-ion"));
        assert_eq!(battery.status_text, Some(BatteryStatus::Charging));
        assert_eq!(battery.health_text, Some(BatteryHealth::Good));
        assert_eq!(battery.ac_powered, Some(false));
        assert_eq!(battery.usb_powered, Some(true));
        assert_eq!(battery.present, Some(true));
        assert_eq!(battery.power_source(), "USB");
    }

    #[test]
    fn unmapped_health_code_is_unknown() {
        let battery = parse_battery("  health: 42\n  status: 17");
        assert_eq!(battery.health_text, Some(BatteryHealth::Unknown));
        assert_eq!(battery.status_text, Some(BatteryStatus::Unknown));
    }

    #[test]
    fn missing_fields_stay_absent() {
        let battery = parse_battery("Current Battery Service state:\n  level: 80");
        assert_eq!(battery.level, Some(80));
        assert_eq!(battery.voltage, None);
        assert_eq!(battery.temperature, None);
        assert_eq!(battery.temperature_celsius, None);
        assert_eq!(battery.health_text, None);
        assert_eq!(battery.ac_powered, None);
    }

    #[test]
    fn empty_output_yields_empty_record() {
        let battery = parse_battery("");
        assert_eq!(battery.level, None);
        assert_eq!(battery.power_source(), "Battery");
    }
}
