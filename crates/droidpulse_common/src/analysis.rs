//! Health analysis engine.
//!
//! Two branches per scan: the AI path serializes a reduced record view into
//! a prompt demanding a fixed-shape JSON reply, and validates the reply
//! strictly; any failure degrades silently (logged) to the deterministic
//! rule engine. Both branches produce the identical [`AnalysisResult`]
//! shape so renderers never need to know which one ran.

use crate::llm::{HttpLlmClient, LlmClient, LlmConfig, LlmError};
use crate::record::{BatteryHealth, DeviceRecord, SignalQuality};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// The prompt carries at most this many recent error lines.
const PROMPT_ERROR_LINES: usize = 10;

/// Health verdict for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub health_score: i64,
    pub summary: String,
    pub critical_issues: Vec<Issue>,
    pub battery_analysis: SubsystemAnalysis,
    pub storage_analysis: SubsystemAnalysis,
    pub memory_analysis: SubsystemAnalysis,
    pub network_analysis: SubsystemAnalysis,
    pub security_findings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub category: IssueCategory,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemAnalysis {
    pub status: SubsystemStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Battery,
    Storage,
    Memory,
    Cpu,
    Network,
    Security,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueCategory::Battery => "battery",
            IssueCategory::Storage => "storage",
            IssueCategory::Memory => "memory",
            IssueCategory::Cpu => "cpu",
            IssueCategory::Network => "network",
            IssueCategory::Security => "security",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsystemStatus {
    Good,
    Warning,
    Critical,
}

impl fmt::Display for SubsystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubsystemStatus::Good => "good",
            SubsystemStatus::Warning => "warning",
            SubsystemStatus::Critical => "critical",
        })
    }
}

/// Run the analysis with the environment-configured client, degrading to
/// the rule engine when the AI path is unusable.
pub fn run_analysis(record: &DeviceRecord, config: LlmConfig) -> AnalysisResult {
    if !config.is_usable() {
        warn!("GROQ_API_KEY not set; AI analysis disabled");
        return fallback_analysis(record);
    }
    match HttpLlmClient::new(config) {
        Ok(client) => analyze(record, &client),
        Err(e) => {
            warn!("Failed to build LLM client: {}", e);
            fallback_analysis(record)
        }
    }
}

/// AI path with silent fallback: never surfaces an error to the caller.
pub fn analyze(record: &DeviceRecord, client: &dyn LlmClient) -> AnalysisResult {
    info!("Running AI health analysis");
    match ai_analysis(record, client) {
        Ok(result) => {
            info!("AI analysis complete");
            result
        }
        Err(e) => {
            warn!("AI analysis unavailable ({}); falling back to rule-based analysis", e);
            fallback_analysis(record)
        }
    }
}

fn ai_analysis(
    record: &DeviceRecord,
    client: &dyn LlmClient,
) -> Result<AnalysisResult, LlmError> {
    let prompt = build_prompt(record);
    let reply = client.complete(&prompt)?;
    parse_analysis_reply(&reply)
}

const RESPONSE_CONTRACT: &str = r#"Respond ONLY in the following JSON format, no markdown, no backticks:
{
    "health_score": <1-10 integer, 10 being perfect health>,
    "summary": "<2-3 sentence overall health summary>",
    "critical_issues": [
        {
            "category": "<battery|storage|memory|cpu|network|security>",
            "severity": "<critical|warning|info>",
            "description": "<what the issue is>",
            "recommendation": "<what to do about it>"
        }
    ],
    "battery_analysis": {
        "status": "<good|warning|critical>",
        "detail": "<battery health assessment>"
    },
    "storage_analysis": {
        "status": "<good|warning|critical>",
        "detail": "<storage usage assessment>"
    },
    "memory_analysis": {
        "status": "<good|warning|critical>",
        "detail": "<memory usage assessment with top consumers>"
    },
    "network_analysis": {
        "status": "<good|warning|critical>",
        "detail": "<network and WiFi assessment>"
    },
    "security_findings": [
        "<any security concerns from installed apps or error logs>"
    ],
    "recommendations": [
        "<actionable recommendation 1>",
        "<actionable recommendation 2>",
        "<actionable recommendation 3>"
    ]
}"#;

/// Build the analysis prompt. The error log is trimmed to its total count
/// plus the first recent lines to bound the prompt size.
pub fn build_prompt(record: &DeviceRecord) -> String {
    let mut trimmed = record.clone();
    trimmed.error_logs.recent_errors.truncate(PROMPT_ERROR_LINES);
    let data =
        serde_json::to_string_pretty(&trimmed).unwrap_or_else(|_| String::from("{}"));

    format!(
        "You are DroidPulse, an expert Android device health analyst.\n\
         Analyze the following device health data and provide a comprehensive report.\n\n\
         DEVICE DATA:\n{}\n\n{}",
        data, RESPONSE_CONTRACT
    )
}

/// Strip optional code-fence wrapping and strictly validate the reply.
/// The health score is clamped to [1,10] regardless of what came back.
pub fn parse_analysis_reply(text: &str) -> Result<AnalysisResult, LlmError> {
    let mut cleaned = text.trim();
    if cleaned.starts_with("```") {
        cleaned = cleaned.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    }
    if let Some(idx) = cleaned.rfind("```") {
        if cleaned[idx + 3..].trim().is_empty() {
            cleaned = &cleaned[..idx];
        }
    }
    let cleaned = cleaned.trim();

    let mut result: AnalysisResult = serde_json::from_str(cleaned)
        .map_err(|e| LlmError::InvalidReply(e.to_string()))?;
    result.health_score = result.health_score.clamp(1, 10);
    Ok(result)
}

fn opt_display<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Deterministic rule-based verdict for when the AI path is unavailable.
///
/// Scoring starts at 10 and decrements by a fixed rule table; the final
/// score is clamped to [1,10]. Subsystem statuses are derived independently
/// from the same thresholds, not from the accumulated issue list.
pub fn fallback_analysis(record: &DeviceRecord) -> AnalysisResult {
    info!("Running rule-based analysis");

    let mut issues: Vec<Issue> = Vec::new();
    let mut score: i64 = 10;

    let level = record.battery.level.unwrap_or(100);
    let health = record.battery.health_text.unwrap_or(BatteryHealth::Unknown);

    if level < 20 {
        issues.push(Issue {
            category: IssueCategory::Battery,
            severity: Severity::Warning,
            description: format!("Battery level is low at {}%", level),
            recommendation: "Charge the device soon".to_string(),
        });
        score -= 1;
    }

    if health != BatteryHealth::Good {
        issues.push(Issue {
            category: IssueCategory::Battery,
            severity: Severity::Critical,
            description: format!("Battery health is {}", health),
            recommendation: "Consider battery replacement".to_string(),
        });
        score -= 2;
    }

    // Evaluated independently per mount; several mounts can each contribute.
    for entry in &record.storage {
        if entry.use_percent > 90 {
            issues.push(Issue {
                category: IssueCategory::Storage,
                severity: Severity::Critical,
                description: format!("{} is {}% full", entry.mounted_on, entry.use_percent),
                recommendation: "Free up space or move data to external storage".to_string(),
            });
            score -= 2;
        } else if entry.use_percent > 75 {
            issues.push(Issue {
                category: IssueCategory::Storage,
                severity: Severity::Warning,
                description: format!("{} is {}% full", entry.mounted_on, entry.use_percent),
                recommendation: "Monitor storage usage and clean unnecessary files".to_string(),
            });
            score -= 1;
        }
    }

    let used_pct = record.memory.used_percent.unwrap_or(0.0);
    if used_pct > 90.0 {
        issues.push(Issue {
            category: IssueCategory::Memory,
            severity: Severity::Critical,
            description: format!("Memory usage is very high at {}%", used_pct),
            recommendation: "Close background apps to free memory".to_string(),
        });
        score -= 2;
    } else if used_pct > 75.0 {
        issues.push(Issue {
            category: IssueCategory::Memory,
            severity: Severity::Warning,
            description: format!("Memory usage is elevated at {}%", used_pct),
            recommendation: "Monitor memory-heavy apps".to_string(),
        });
        score -= 1;
    }

    let signal = record.network.signal_quality;
    if signal == Some(SignalQuality::Poor) {
        issues.push(Issue {
            category: IssueCategory::Network,
            severity: Severity::Warning,
            description: format!(
                "WiFi signal is poor (RSSI: {}dBm)",
                record.network.rssi.unwrap_or(0)
            ),
            recommendation: "Move closer to the router or check for interference".to_string(),
        });
        score -= 1;
    }

    let score = score.clamp(1, 10);

    let battery_status = if health == BatteryHealth::Good && level > 20 {
        SubsystemStatus::Good
    } else {
        SubsystemStatus::Warning
    };

    let storage_status = if record.storage.iter().any(|e| e.use_percent > 90) {
        SubsystemStatus::Critical
    } else if record.storage.iter().any(|e| e.use_percent > 75) {
        SubsystemStatus::Warning
    } else {
        SubsystemStatus::Good
    };

    let memory_status = if used_pct > 90.0 {
        SubsystemStatus::Critical
    } else if used_pct > 75.0 {
        SubsystemStatus::Warning
    } else {
        SubsystemStatus::Good
    };

    let network_status = if matches!(
        signal,
        Some(SignalQuality::Excellent) | Some(SignalQuality::Good)
    ) {
        SubsystemStatus::Good
    } else {
        SubsystemStatus::Warning
    };

    let recommendations = if issues.is_empty() {
        vec!["No immediate action required".to_string()]
    } else {
        issues.iter().map(|i| i.recommendation.clone()).collect()
    };

    AnalysisResult {
        health_score: score,
        summary: format!(
            "Device health score is {}/10. Found {} issue(s) requiring attention.",
            score,
            issues.len()
        ),
        critical_issues: issues,
        battery_analysis: SubsystemAnalysis {
            status: battery_status,
            detail: format!(
                "Battery at {}%, health: {}, temp: {}°C",
                level,
                health,
                opt_display(&record.battery.temperature_celsius)
            ),
        },
        storage_analysis: SubsystemAnalysis {
            status: storage_status,
            detail: "User storage (/data) usage needs monitoring".to_string(),
        },
        memory_analysis: SubsystemAnalysis {
            status: memory_status,
            detail: format!(
                "RAM usage at {}% ({}MB / {}MB)",
                used_pct,
                opt_display(&record.memory.used_mb),
                opt_display(&record.memory.total_mb)
            ),
        },
        network_analysis: SubsystemAnalysis {
            status: network_status,
            detail: format!(
                "Connected to {} on {} band, signal: {}",
                record.network.ssid.as_deref().unwrap_or("Unknown"),
                record.network.band.as_deref().unwrap_or("Unknown"),
                opt_display(&signal)
            ),
        },
        security_findings: vec![
            "Basic analysis - no deep security scan performed".to_string(),
        ],
        recommendations,
    }
}
