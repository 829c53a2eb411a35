//! Device data collection.
//!
//! Runs every probe in a fixed sequence against the same device and
//! assembles one [`DeviceRecord`]. A probe that returns no data degrades
//! only its own sub-record; the rest of the scan continues.

use crate::adb::Adb;
use crate::parsers;
use crate::record::{Apps, DeviceIdentity, DeviceRecord, Memory, Network};
use chrono::Local;
use tracing::info;

/// Collect all device data into one record.
pub async fn collect_all(adb: &Adb) -> DeviceRecord {
    info!(
        "Collecting data from device: {}",
        adb.selector().unwrap_or("default")
    );

    let record = DeviceRecord {
        device_info: collect_identity(adb).await,
        battery: parsers::battery::parse_battery(&adb.run("shell dumpsys battery").await),
        storage: parsers::storage::parse_df(&adb.run("shell df -h").await),
        memory: collect_memory(adb).await,
        cpu: parsers::cpu::parse_cpuinfo(&adb.run("shell dumpsys cpuinfo").await),
        network: collect_network(adb).await,
        apps: collect_apps(adb).await,
        error_logs: parsers::logcat::parse_error_log(&adb.run("logcat -d *:E").await),
        diagnostics: None,
    };

    info!("Data collection complete");
    record
}

async fn prop(adb: &Adb, name: &str) -> Option<String> {
    let value = adb.run(&format!("shell getprop {}", name)).await;
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

async fn collect_identity(adb: &Adb) -> DeviceIdentity {
    DeviceIdentity {
        model: prop(adb, "ro.product.model").await,
        brand: prop(adb, "ro.product.brand").await,
        device: prop(adb, "ro.product.device").await,
        android_version: prop(adb, "ro.build.version.release").await,
        sdk_level: prop(adb, "ro.build.version.sdk").await,
        build_number: prop(adb, "ro.build.display.id").await,
        serial: prop(adb, "ro.serialno").await,
        hardware: prop(adb, "ro.hardware").await,
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

async fn collect_memory(adb: &Adb) -> Memory {
    let mut memory = parsers::memory::parse_meminfo(&adb.run("shell cat /proc/meminfo").await);
    memory.top_consumers =
        parsers::memory::parse_meminfo_consumers(&adb.run("shell dumpsys meminfo").await);
    memory
}

async fn collect_network(adb: &Adb) -> Network {
    let mut network = parsers::network::parse_wifi_info(&adb.run("shell dumpsys wifi").await);

    let ip_output = adb.run("shell ip addr show wlan0").await;
    let (ip_address, subnet_mask) = parsers::network::parse_inet(&ip_output);
    network.ip_address = ip_address;
    network.subnet_mask = subnet_mask;
    network.ipv6_address = parsers::network::parse_inet6_global(&ip_output);

    for server in [
        adb.run("shell getprop net.dns1").await,
        adb.run("shell getprop net.dns2").await,
    ] {
        if !server.is_empty() {
            network.dns.push(server);
        }
    }

    network.connection_type =
        parsers::network::classify_connection(&adb.run("shell dumpsys connectivity").await);
    network
}

async fn collect_apps(adb: &Adb) -> Apps {
    let all = parsers::apps::parse_package_list(&adb.run("shell pm list packages").await);
    let third_party = parsers::apps::parse_package_list(&adb.run("shell pm list packages -3").await);
    parsers::apps::build_apps(all, third_party)
}
