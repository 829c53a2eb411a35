//! Terminal dashboard - clean, ASCII-only output.
//!
//! Pure presentation of the device record and analysis verdict; all
//! decision logic lives in the analysis engine.

use droidpulse_common::analysis::{AnalysisResult, Severity, SubsystemStatus};
use droidpulse_common::record::{
    Apps, Battery, Cpu, DeviceIdentity, DeviceRecord, Memory, Network, NetworkDiagnostics,
    SignalQuality, StorageEntry,
};
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Display the full dashboard.
pub fn render(record: &DeviceRecord, analysis: &AnalysisResult) {
    println!();
    render_header(&record.device_info);
    render_health(analysis);
    render_battery(&record.battery, analysis);
    render_storage(&record.storage, analysis);
    render_memory(&record.memory, analysis);
    render_cpu(&record.cpu);
    render_network(&record.network, analysis);
    render_apps(&record.apps);
    render_issues(analysis);
    render_recommendations(analysis);
    println!();
    println!("{}", "Report generated by DroidPulse".dimmed());
    println!();
}

fn na<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// ASCII usage meter, `width` characters wide.
fn meter(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn status_badge(status: SubsystemStatus) -> String {
    match status {
        SubsystemStatus::Good => "[GOOD]".green().to_string(),
        SubsystemStatus::Warning => "[WARNING]".yellow().to_string(),
        SubsystemStatus::Critical => "[CRITICAL]".red().to_string(),
    }
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::Critical => "CRITICAL".red().to_string(),
        Severity::Warning => "WARNING".yellow().to_string(),
        Severity::Info => "INFO".cyan().to_string(),
    }
}

fn render_header(identity: &DeviceIdentity) {
    println!("{}", "DroidPulse - Device Health Dashboard".cyan().bold());
    println!();
    println!("[DEVICE]");
    println!(
        "  Device:     {} {} ({})",
        na(&identity.brand),
        na(&identity.device),
        na(&identity.model)
    );
    println!(
        "  Android:    {} (SDK {})",
        na(&identity.android_version),
        na(&identity.sdk_level)
    );
    println!("  Build:      {}", na(&identity.build_number));
    println!("  Serial:     {}", na(&identity.serial));
    println!("  Hardware:   {}", na(&identity.hardware));
    println!("  Scanned:    {}", identity.timestamp);
    println!();
}

fn render_health(analysis: &AnalysisResult) {
    let score = analysis.health_score;
    let bar = meter(score as f64 * 10.0, 10);
    let score_str = format!("{}/10", score);
    let colored_score = if score >= 8 {
        score_str.green().bold().to_string()
    } else if score >= 5 {
        score_str.yellow().bold().to_string()
    } else {
        score_str.red().bold().to_string()
    };

    println!("[HEALTH]");
    println!("  Score:      {}  {}", colored_score, bar);
    println!("  {}", analysis.summary);
    println!();
}

fn render_battery(battery: &Battery, analysis: &AnalysisResult) {
    let level = battery.level.unwrap_or(0);
    let level_str = format!("{}%", level);
    let colored_level = if level > 50 {
        level_str.green().to_string()
    } else if level > 20 {
        level_str.yellow().to_string()
    } else {
        level_str.red().to_string()
    };

    println!("[BATTERY] {}", status_badge(analysis.battery_analysis.status));
    println!(
        "  Level:        {}  {}",
        colored_level,
        meter(level as f64, 20)
    );
    println!("  Health:       {}", na(&battery.health_text));
    println!("  Status:       {}", na(&battery.status_text));
    println!("  Temperature:  {}C", na(&battery.temperature_celsius));
    println!("  Voltage:      {}mV", na(&battery.voltage));
    println!("  Technology:   {}", na(&battery.technology));
    println!("  Power:        {}", battery.power_source());
    println!("  {}", analysis.battery_analysis.detail.dimmed());
    println!();
}

fn render_storage(storage: &[StorageEntry], analysis: &AnalysisResult) {
    println!("[STORAGE] {}", status_badge(analysis.storage_analysis.status));
    if storage.is_empty() {
        println!("  No storage data collected");
    }
    for entry in storage {
        let pct = entry.use_percent;
        let pct_str = format!("{}%", pct);
        let colored_pct = if pct < 75 {
            pct_str.green().to_string()
        } else if pct < 90 {
            pct_str.yellow().to_string()
        } else {
            pct_str.red().to_string()
        };
        println!(
            "  {:<20} {:>6} used of {:>6} ({} available)  {} {}",
            entry.mounted_on,
            entry.used,
            entry.size,
            entry.available,
            meter(pct as f64, 10),
            colored_pct
        );
    }
    println!("  {}", analysis.storage_analysis.detail.dimmed());
    println!();
}

fn render_memory(memory: &Memory, analysis: &AnalysisResult) {
    let used_pct = memory.used_percent.unwrap_or(0.0);
    let pct_str = format!("{}%", used_pct);
    let colored_pct = if used_pct < 75.0 {
        pct_str.green().to_string()
    } else if used_pct < 90.0 {
        pct_str.yellow().to_string()
    } else {
        pct_str.red().to_string()
    };

    println!("[MEMORY] {}", status_badge(analysis.memory_analysis.status));
    println!("  RAM Usage:  {}  {}", colored_pct, meter(used_pct, 20));
    println!("  Total:      {} MB", na(&memory.total_mb));
    println!("  Used:       {} MB", na(&memory.used_mb));
    println!("  Available:  {} MB", na(&memory.available_mb));

    if !memory.top_consumers.is_empty() {
        println!("  Top Memory Consumers:");
        for consumer in memory.top_consumers.iter().take(5) {
            let mb = (consumer.memory_kb as f64 / 1024.0 * 10.0).round() / 10.0;
            println!(
                "    {:>8.1} MB  {}",
                mb,
                consumer.process
            );
        }
    }
    println!("  {}", analysis.memory_analysis.detail.dimmed());
    println!();
}

fn render_cpu(cpu: &Cpu) {
    println!("[CPU]");
    println!(
        "  Load Average:  {} / {} / {}  (1m / 5m / 15m)",
        na(&cpu.load_1min),
        na(&cpu.load_5min),
        na(&cpu.load_15min)
    );

    if !cpu.top_consumers.is_empty() {
        println!("  Top CPU Consumers:");
        for consumer in cpu.top_consumers.iter().take(5) {
            let pct_str = format!("{:>5.1}%", consumer.cpu_percent);
            let colored = if consumer.cpu_percent > 20.0 {
                pct_str.red().to_string()
            } else if consumer.cpu_percent > 10.0 {
                pct_str.yellow().to_string()
            } else {
                pct_str
            };
            println!("    {}  {}", colored, consumer.process);
        }
    }
    println!();
}

fn signal_colored(quality: &Option<SignalQuality>, rssi: &Option<i64>) -> String {
    let text = format!("{} ({} dBm)", na(quality), na(rssi));
    match quality {
        Some(SignalQuality::Excellent) | Some(SignalQuality::Good) => text.green().to_string(),
        Some(SignalQuality::Fair) => text.yellow().to_string(),
        Some(SignalQuality::Poor) => text.red().to_string(),
        None => text,
    }
}

fn render_network(network: &Network, analysis: &AnalysisResult) {
    println!("[NETWORK] {}", status_badge(analysis.network_analysis.status));
    println!("  SSID:        {}", na(&network.ssid));
    println!(
        "  Signal:      {}",
        signal_colored(&network.signal_quality, &network.rssi)
    );
    println!("  Band:        {}", na(&network.band));
    println!("  Link Speed:  {} Mbps", na(&network.link_speed_mbps));
    println!("  Frequency:   {} MHz", na(&network.frequency_mhz));
    println!(
        "  IP Address:  {}/{}",
        na(&network.ip_address),
        na(&network.subnet_mask)
    );
    println!("  IPv6:        {}", na(&network.ipv6_address));
    println!("  Connection:  {}", network.connection_type);
    let dns = if network.dns.is_empty() {
        "Not configured".to_string()
    } else {
        network.dns.join(", ")
    };
    println!("  DNS:         {}", dns);
    println!("  {}", analysis.network_analysis.detail.dimmed());
    println!();
}

fn render_apps(apps: &Apps) {
    println!("[APPS]");
    println!("  Total Packages:    {}", apps.total_packages);
    println!("  System Apps:       {}", apps.system_count);
    println!("  Third-Party Apps:  {}", apps.third_party_count);
    println!();
}

fn render_issues(analysis: &AnalysisResult) {
    println!("[ISSUES]");
    if analysis.critical_issues.is_empty() {
        println!("  {}", "No critical issues found".green());
        println!();
        return;
    }
    for issue in &analysis.critical_issues {
        println!(
            "  {} {} - {}",
            severity_label(issue.severity),
            issue.category.to_string().to_uppercase(),
            issue.description
        );
        println!("    -> {}", issue.recommendation);
    }
    println!();
}

fn render_recommendations(analysis: &AnalysisResult) {
    if analysis.recommendations.is_empty() {
        return;
    }
    println!("[RECOMMENDATIONS]");
    for (i, rec) in analysis.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }
}

/// Display the network diagnostics suite.
pub fn render_diagnostics(diag: &NetworkDiagnostics) {
    println!();
    println!("{}", "DroidPulse - Network Diagnostics".cyan().bold());
    println!();
    println!("[CONNECTION]");
    println!("  Transport:  {}", diag.connection_type);
    println!("  Phone IP:   {}", na(&diag.phone_ip));
    println!();

    println!("[WIFI]");
    println!("  SSID:        {}", na(&diag.wifi.ssid));
    println!("  Security:    {}", na(&diag.wifi.security_name));
    println!("  Standard:    {}", na(&diag.wifi.wifi_standard_name));
    println!(
        "  Signal:      {}  ({}%)",
        signal_colored(&diag.wifi.signal_quality, &diag.wifi.rssi),
        na(&diag.wifi.signal_percent)
    );
    println!("  Band:        {}", na(&diag.wifi.band));
    println!(
        "  Link Speed:  {} Mbps (tx {} / rx {})",
        na(&diag.wifi.link_speed_mbps),
        na(&diag.wifi.tx_speed_mbps),
        na(&diag.wifi.rx_speed_mbps)
    );
    println!("  Gateway:     {}", na(&diag.wifi.gateway));
    println!();

    println!("[LATENCY]");
    match &diag.ping {
        Some(ping) => {
            println!(
                "  Packets:  {} sent, {} received, {} loss",
                na(&ping.packets_sent),
                na(&ping.packets_received),
                na(&ping.packet_loss)
            );
            println!(
                "  RTT:      min {} / avg {} / max {} / mdev {} ms",
                na(&ping.rtt_min_ms),
                na(&ping.rtt_avg_ms),
                na(&ping.rtt_max_ms),
                na(&ping.rtt_mdev_ms)
            );
        }
        None => println!("  No latency data (phone IP unreachable)"),
    }
    println!();

    println!("[DNS]");
    for test in &diag.dns_tests {
        if test.resolved {
            println!(
                "  {}  {} ({}, {} ms)",
                "OK  ".green(),
                test.host,
                na(&test.ip),
                na(&test.latency_ms)
            );
        } else {
            println!("  {}  {}", "FAIL".red(), test.host);
        }
    }
    println!();
}
