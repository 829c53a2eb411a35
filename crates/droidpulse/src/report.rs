//! HTML report generator.
//!
//! Builds one self-contained document embedding every collected section and
//! the analysis verdict, then writes it to the reports directory with a
//! timestamped filename.

use chrono::Local;
use droidpulse_common::analysis::AnalysisResult;
use droidpulse_common::error::PulseError;
use droidpulse_common::record::DeviceRecord;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background: #0f172a;
    color: #e2e8f0;
    padding: 2rem;
    line-height: 1.6;
}
.container { max-width: 900px; margin: 0 auto; }
.header {
    text-align: center;
    padding: 2rem;
    background: linear-gradient(135deg, #1e293b, #334155);
    border-radius: 12px;
    margin-bottom: 1.5rem;
    border: 1px solid #475569;
}
.header h1 { font-size: 2rem; color: #38bdf8; margin-bottom: 0.5rem; }
.header .subtitle { color: #94a3b8; font-size: 0.95rem; }
.device-badge {
    display: inline-block;
    background: #1e293b;
    padding: 0.3rem 0.8rem;
    border-radius: 20px;
    font-size: 0.85rem;
    color: #38bdf8;
    border: 1px solid #38bdf8;
    margin-top: 0.8rem;
}
.card {
    background: #1e293b;
    border-radius: 12px;
    padding: 1.5rem;
    margin-bottom: 1.5rem;
    border: 1px solid #334155;
}
.card h2 {
    font-size: 1.1rem;
    margin-bottom: 1rem;
    padding-bottom: 0.5rem;
    border-bottom: 1px solid #334155;
}
.score-section { text-align: center; padding: 2rem; }
.score-circle {
    width: 120px;
    height: 120px;
    border-radius: 50%;
    display: inline-flex;
    align-items: center;
    justify-content: center;
    font-size: 2.5rem;
    font-weight: bold;
    margin-bottom: 1rem;
}
.score-good { background: linear-gradient(135deg, #065f46, #059669); color: #6ee7b7; border: 3px solid #34d399; }
.score-warning { background: linear-gradient(135deg, #713f12, #a16207); color: #fde047; border: 3px solid #facc15; }
.score-critical { background: linear-gradient(135deg, #7f1d1d, #b91c1c); color: #fca5a5; border: 3px solid #f87171; }
.summary { color: #94a3b8; margin-top: 0.8rem; max-width: 600px; margin-left: auto; margin-right: auto; }
.info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 0.6rem; }
.info-item { display: flex; justify-content: space-between; padding: 0.4rem 0; }
.info-label { color: #64748b; }
.info-value { color: #e2e8f0; font-weight: 500; }
.progress-container {
    background: #0f172a;
    border-radius: 8px;
    height: 24px;
    overflow: hidden;
    margin: 0.4rem 0;
}
.progress-bar {
    height: 100%;
    border-radius: 8px;
    display: flex;
    align-items: center;
    padding-left: 8px;
    font-size: 0.75rem;
    font-weight: bold;
    color: white;
}
.bar-green { background: linear-gradient(90deg, #059669, #34d399); }
.bar-yellow { background: linear-gradient(90deg, #a16207, #facc15); }
.bar-red { background: linear-gradient(90deg, #b91c1c, #f87171); }
.status-badge {
    display: inline-block;
    padding: 0.2rem 0.6rem;
    border-radius: 12px;
    font-size: 0.8rem;
    font-weight: 600;
}
.badge-good { background: #065f46; color: #6ee7b7; }
.badge-warning { background: #713f12; color: #fde047; }
.badge-critical { background: #7f1d1d; color: #fca5a5; }
.badge-info { background: #1e3a5f; color: #7dd3fc; }
table { width: 100%; border-collapse: collapse; margin-top: 0.8rem; }
th {
    text-align: left;
    padding: 0.6rem;
    background: #0f172a;
    color: #38bdf8;
    font-size: 0.85rem;
    border-bottom: 2px solid #334155;
}
td { padding: 0.6rem; border-bottom: 1px solid #1e293b; font-size: 0.9rem; }
.issue-row { border-left: 3px solid; padding: 0.8rem; margin-bottom: 0.8rem; border-radius: 0 8px 8px 0; }
.issue-critical { border-color: #f87171; background: #1a0505; }
.issue-warning { border-color: #facc15; background: #1a1505; }
.issue-info { border-color: #38bdf8; background: #051a2a; }
.issue-title { font-weight: 600; margin-bottom: 0.3rem; }
.issue-rec { color: #94a3b8; font-size: 0.9rem; }
.rec-list { list-style: none; }
.rec-list li {
    padding: 0.6rem 0.8rem;
    margin-bottom: 0.5rem;
    background: #0f172a;
    border-radius: 8px;
    border-left: 3px solid #38bdf8;
}
.rec-number { color: #38bdf8; font-weight: bold; margin-right: 0.5rem; }
.footer {
    text-align: center;
    padding: 1.5rem;
    color: #475569;
    font-size: 0.85rem;
    border-top: 1px solid #334155;
    margin-top: 1rem;
}
.two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
@media (max-width: 700px) {
    .two-col, .info-grid { grid-template-columns: 1fr; }
    body { padding: 1rem; }
}
"#;

/// Write the HTML report to the reports directory (overridable via
/// `DROIDPULSE_REPORTS_DIR`) and return the file path.
pub fn write_report(
    record: &DeviceRecord,
    analysis: &AnalysisResult,
) -> Result<PathBuf, PulseError> {
    let dir = std::env::var("DROIDPULSE_REPORTS_DIR").unwrap_or_else(|_| "reports".to_string());
    write_report_to(Path::new(&dir), record, analysis)
}

fn write_report_to(
    dir: &Path,
    record: &DeviceRecord,
    analysis: &AnalysisResult,
) -> Result<PathBuf, PulseError> {
    info!("Generating HTML report");
    fs::create_dir_all(dir)?;

    let device_name = record
        .device_info
        .device
        .clone()
        .unwrap_or_else(|| "unknown".to_string());
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("droidpulse_{}_{}.html", device_name, timestamp));

    fs::write(&path, render_html(record, analysis))?;
    info!("Report saved: {}", path.display());
    Ok(path)
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn na<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| escape(&v.to_string()))
        .unwrap_or_else(|| "N/A".to_string())
}

fn info_item(label: &str, value: &str) -> String {
    format!(
        "<div class=\"info-item\"><span class=\"info-label\">{}</span><span class=\"info-value\">{}</span></div>\n",
        label, value
    )
}

fn progress_bar(percent: f64) -> String {
    let color = if percent > 90.0 {
        "bar-red"
    } else if percent > 75.0 {
        "bar-yellow"
    } else {
        "bar-green"
    };
    let width = percent.clamp(0.0, 100.0);
    format!(
        "<div class=\"progress-container\"><div class=\"progress-bar {}\" style=\"width: {}%\">{}%</div></div>\n",
        color, width, percent
    )
}

fn status_badge(status: impl Display) -> String {
    let status = status.to_string();
    format!(
        "<span class=\"status-badge badge-{}\">{}</span>\n",
        status,
        status.to_uppercase()
    )
}

/// Assemble the full document.
pub fn render_html(record: &DeviceRecord, analysis: &AnalysisResult) -> String {
    let identity = &record.device_info;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!(
        "<title>DroidPulse Report - {} {}</title>\n",
        na(&identity.brand),
        na(&identity.device)
    ));
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    html.push_str("<div class=\"container\">\n");

    // Header
    html.push_str("<div class=\"header\">\n<h1>DroidPulse</h1>\n");
    html.push_str("<div class=\"subtitle\">AI-Powered Android Device Health Report</div>\n");
    html.push_str(&format!(
        "<div class=\"device-badge\">{} {} ({}) - Android {}</div>\n</div>\n",
        na(&identity.brand),
        na(&identity.device),
        na(&identity.model),
        na(&identity.android_version)
    ));

    // Health score
    let score = analysis.health_score;
    let score_class = if score >= 8 {
        "score-good"
    } else if score >= 5 {
        "score-warning"
    } else {
        "score-critical"
    };
    html.push_str("<div class=\"card score-section\">\n");
    html.push_str(&format!(
        "<div class=\"score-circle {}\">{}/10</div>\n",
        score_class, score
    ));
    html.push_str("<h2 style=\"border: none; text-align: center;\">Device Health Score</h2>\n");
    html.push_str(&format!(
        "<div class=\"summary\">{}</div>\n</div>\n",
        escape(&analysis.summary)
    ));

    html.push_str("<div class=\"two-col\">\n");

    // Battery
    let battery = &record.battery;
    html.push_str("<div class=\"card\">\n<h2>Battery</h2>\n");
    html.push_str(&status_badge(analysis.battery_analysis.status));
    let level = battery.level.unwrap_or(0);
    html.push_str("<div style=\"margin-top: 1rem;\">\n");
    html.push_str(&progress_bar(level as f64));
    html.push_str("</div>\n<div class=\"info-grid\" style=\"margin-top: 0.8rem;\">\n");
    html.push_str(&info_item("Health", &na(&battery.health_text)));
    html.push_str(&info_item("Status", &na(&battery.status_text)));
    html.push_str(&info_item(
        "Temperature",
        &format!("{}&deg;C", na(&battery.temperature_celsius)),
    ));
    html.push_str(&info_item("Technology", &na(&battery.technology)));
    html.push_str(&info_item("Power Source", battery.power_source()));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<div class=\"issue-rec\" style=\"margin-top: 0.5rem;\">{}</div>\n</div>\n",
        escape(&analysis.battery_analysis.detail)
    ));

    // Network
    let network = &record.network;
    html.push_str("<div class=\"card\">\n<h2>Network</h2>\n");
    html.push_str(&status_badge(analysis.network_analysis.status));
    html.push_str("<div class=\"info-grid\" style=\"margin-top: 1rem;\">\n");
    html.push_str(&info_item("SSID", &na(&network.ssid)));
    html.push_str(&info_item(
        "Signal",
        &format!("{} ({} dBm)", na(&network.signal_quality), na(&network.rssi)),
    ));
    html.push_str(&info_item("Band", &na(&network.band)));
    html.push_str(&info_item(
        "Speed",
        &format!("{} Mbps", na(&network.link_speed_mbps)),
    ));
    html.push_str(&info_item(
        "Frequency",
        &format!("{} MHz", na(&network.frequency_mhz)),
    ));
    html.push_str(&info_item(
        "IP",
        &format!("{}/{}", na(&network.ip_address), na(&network.subnet_mask)),
    ));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<div class=\"issue-rec\" style=\"margin-top: 0.5rem;\">{}</div>\n</div>\n",
        escape(&analysis.network_analysis.detail)
    ));

    html.push_str("</div>\n");

    // Storage
    html.push_str("<div class=\"card\">\n<h2>Storage</h2>\n");
    html.push_str(&status_badge(analysis.storage_analysis.status));
    html.push_str(
        "<table>\n<thead><tr><th>Partition</th><th>Size</th><th>Used</th><th>Available</th><th>Usage</th></tr></thead>\n<tbody>\n",
    );
    for entry in &record.storage {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&entry.mounted_on),
            escape(&entry.size),
            escape(&entry.used),
            escape(&entry.available),
            progress_bar(entry.use_percent as f64)
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html.push_str(&format!(
        "<div class=\"issue-rec\" style=\"margin-top: 0.5rem;\">{}</div>\n</div>\n",
        escape(&analysis.storage_analysis.detail)
    ));

    html.push_str("<div class=\"two-col\">\n");

    // Memory
    let memory = &record.memory;
    html.push_str("<div class=\"card\">\n<h2>Memory</h2>\n");
    html.push_str(&status_badge(analysis.memory_analysis.status));
    html.push_str("<div style=\"margin-top: 1rem;\">\n");
    html.push_str(&progress_bar(memory.used_percent.unwrap_or(0.0)));
    html.push_str("<div class=\"info-grid\" style=\"margin-top: 0.5rem;\">\n");
    html.push_str(&info_item("Total", &format!("{} MB", na(&memory.total_mb))));
    html.push_str(&info_item(
        "Available",
        &format!("{} MB", na(&memory.available_mb)),
    ));
    html.push_str("</div>\n</div>\n");
    if !memory.top_consumers.is_empty() {
        html.push_str("<div style=\"margin-top: 0.8rem;\">\n<strong style=\"font-size: 0.85rem; color: #64748b;\">Top Consumers</strong>\n");
        for consumer in memory.top_consumers.iter().take(5) {
            let mb = (consumer.memory_kb as f64 / 1024.0 * 10.0).round() / 10.0;
            html.push_str(&info_item(&escape(&consumer.process), &format!("{} MB", mb)));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");

    // CPU
    let cpu = &record.cpu;
    html.push_str("<div class=\"card\">\n<h2>CPU</h2>\n");
    html.push_str("<div class=\"info-grid\" style=\"margin-top: 0.5rem;\">\n");
    html.push_str(&info_item("Load 1m", &na(&cpu.load_1min)));
    html.push_str(&info_item("Load 5m", &na(&cpu.load_5min)));
    html.push_str(&info_item("Load 15m", &na(&cpu.load_15min)));
    html.push_str("</div>\n");
    if !cpu.top_consumers.is_empty() {
        html.push_str("<div style=\"margin-top: 0.8rem;\">\n<strong style=\"font-size: 0.85rem; color: #64748b;\">Top Consumers</strong>\n");
        for consumer in cpu.top_consumers.iter().take(5) {
            html.push_str(&info_item(
                &escape(&consumer.process),
                &format!("{}%", consumer.cpu_percent),
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</div>\n");

    // Apps
    let apps = &record.apps;
    html.push_str("<div class=\"card\">\n<h2>Apps</h2>\n<div class=\"info-grid\">\n");
    html.push_str(&info_item("Total Packages", &apps.total_packages.to_string()));
    html.push_str(&info_item("System Apps", &apps.system_count.to_string()));
    html.push_str(&info_item(
        "Third-Party Apps",
        &apps.third_party_count.to_string(),
    ));
    html.push_str("</div>\n</div>\n");

    // Issues
    if !analysis.critical_issues.is_empty() {
        html.push_str("<div class=\"card\">\n<h2>Issues</h2>\n");
        for issue in &analysis.critical_issues {
            html.push_str(&format!(
                "<div class=\"issue-row issue-{}\">\n<div class=\"issue-title\">{}{} - {}</div>\n<div class=\"issue-rec\">{}</div>\n</div>\n",
                issue.severity,
                status_badge(issue.severity),
                issue.category.to_string().to_uppercase(),
                escape(&issue.description),
                escape(&issue.recommendation)
            ));
        }
        html.push_str("</div>\n");
    }

    // Recommendations
    if !analysis.recommendations.is_empty() {
        html.push_str("<div class=\"card\">\n<h2>Recommendations</h2>\n<ul class=\"rec-list\">\n");
        for (i, rec) in analysis.recommendations.iter().enumerate() {
            html.push_str(&format!(
                "<li><span class=\"rec-number\">{}.</span> {}</li>\n",
                i + 1,
                escape(rec)
            ));
        }
        html.push_str("</ul>\n</div>\n");
    }

    // Security findings
    if !analysis.security_findings.is_empty() {
        html.push_str("<div class=\"card\">\n<h2>Security Findings</h2>\n");
        for finding in &analysis.security_findings {
            html.push_str(&format!(
                "<div style=\"padding: 0.4rem 0; color: #94a3b8;\">&bull; {}</div>\n",
                escape(finding)
            ));
        }
        html.push_str("</div>\n");
    }

    // Footer
    html.push_str(&format!(
        "<div class=\"footer\">Generated by <strong>DroidPulse</strong><br>Report generated on {} | Serial: {}</div>\n",
        escape(&identity.timestamp),
        na(&identity.serial)
    ));

    html.push_str("</div>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidpulse_common::analysis::fallback_analysis;
    use droidpulse_common::record::{Battery, BatteryHealth, StorageEntry};

    fn sample_record() -> DeviceRecord {
        DeviceRecord {
            battery: Battery {
                level: Some(42),
                health_text: Some(BatteryHealth::Good),
                temperature_celsius: Some(30.5),
                ..Battery::default()
            },
            storage: vec![StorageEntry {
                filesystem: "/dev/block/dm-37".to_string(),
                size: "107G".to_string(),
                used: "99G".to_string(),
                available: "8.0G".to_string(),
                use_percent: 93,
                mounted_on: "/data".to_string(),
            }],
            ..DeviceRecord::default()
        }
    }

    #[test]
    fn html_embeds_all_sections_and_verdict() {
        let record = sample_record();
        let analysis = fallback_analysis(&record);
        let html = render_html(&record, &analysis);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Device Health Score"));
        assert!(html.contains(&format!("{}/10", analysis.health_score)));
        assert!(html.contains("<h2>Battery</h2>"));
        assert!(html.contains("<h2>Storage</h2>"));
        assert!(html.contains("/data"));
        assert!(html.contains("<h2>Issues</h2>"));
        assert!(html.contains("<h2>Recommendations</h2>"));
        assert!(html.contains("Security Findings"));
    }

    #[test]
    fn html_escapes_device_supplied_text() {
        let mut record = sample_record();
        record.network.ssid = Some("<script>alert(1)</script>".to_string());
        let analysis = fallback_analysis(&record);
        let html = render_html(&record, &analysis);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn report_file_lands_in_the_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = sample_record();
        record.device_info.device = Some("panther".to_string());
        let analysis = fallback_analysis(&record);

        let path = write_report_to(dir.path(), &record, &analysis).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("droidpulse_panther_"));
        assert!(name.ends_with(".html"));

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Device Health Score"));
    }
}
