use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotCategory {
    #[serde(rename = "도입부 (3초 후킹)")]
    Intro,
    #[serde(rename = "전개부 (증거/과정)")]
    Development,
    #[serde(rename = "클라이맥스 (결과)")]
    Climax,
    #[serde(rename = "만능 브릿지 (연결)")]
    Bridge,
}

impl ShotCategory {
    pub const ALL: [ShotCategory; 4] = [
        ShotCategory::Intro,
        ShotCategory::Development,
        ShotCategory::Climax,
        ShotCategory::Bridge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Intro => "도입부 (3초 후킹)",
            Self::Development => "전개부 (증거/과정)",
            Self::Climax => "클라이맥스 (결과)",
            Self::Bridge => "만능 브릿지 (연결)",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Development => "development",
            Self::Climax => "climax",
            Self::Bridge => "bridge",
        }
    }
}

impl fmt::Display for ShotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShotCategory {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let value = raw.trim();
        for category in Self::ALL {
            if value.eq_ignore_ascii_case(category.key()) || value == category.label() {
                return Ok(category);
            }
        }
        bail!(
            "unknown shot category '{}': expected one of intro, development, climax, bridge",
            raw
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub id: String,
    pub category: ShotCategory,
    pub name: String,
    pub action: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAccount {
    pub id: String,
    pub pw: String,
}

impl StaffAccount {
    pub fn new(id: impl Into<String>, pw: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pw: pw.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertiserBrief {
    pub client_name: String,
    pub purpose: String,
    pub target_audience: String,
    pub key_message: String,
    pub usp: String,
    pub promotion: String,
    pub constraints: String,
    pub requests: String,
    pub special_story: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptResult {
    pub hook_strategy: String,
    pub keyword_strategy: String,
    pub hook_type: String,
    pub flow_type: String,
    pub char_count: i64,
    pub full_script: String,
    pub success_points: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecommendation {
    pub shot_name: String,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePlanItem {
    pub sentence_id: i64,
    pub sentence: String,
    pub recommendations: Vec<ShotRecommendation>,
}

/// Ad performance inputs. `ctr` and `cvr` are percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdInputs {
    pub price: f64,
    pub margin: f64,
    pub cpm: f64,
    pub ctr: f64,
    pub cvr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EconomicsMode {
    Analysis,
    Simulation,
}

impl EconomicsMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analysis => "ANALYSIS",
            Self::Simulation => "SIMULATION",
        }
    }
}

impl fmt::Display for EconomicsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum AdEconomicsReport {
    #[serde(rename = "ANALYSIS")]
    Analysis(AnalysisPayload),
    #[serde(rename = "SIMULATION")]
    Simulation(SimulationPayload),
}

impl AdEconomicsReport {
    pub fn mode(&self) -> EconomicsMode {
        match self {
            Self::Analysis(_) => EconomicsMode::Analysis,
            Self::Simulation(_) => EconomicsMode::Simulation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub table_data: AnalysisTable,
    pub verdict: Verdict,
    pub recommendation: TargetRecommendation,
    pub strategy: StrategyPlan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTable {
    pub margin_rate: String,
    pub end_roas: String,
    pub opt_roas: String,
    pub mcvr: String,
    pub opt_cpc: String,
    pub current_roi: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub possible: bool,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecommendation {
    pub target_roas: String,
    pub target_cpc: String,
    pub adjustment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPlan {
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPayload {
    pub simulation: Simulation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub survival_roas: String,
    pub avg_cpc: String,
    pub required_cvr: String,
    pub scenarios: Vec<CpcScenario>,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpcScenario {
    pub cpc: String,
    pub break_even_cvr: String,
    pub profitable_cvr: String,
}

/// Proposal inputs. `search_volume` runs oldest month first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalInputs {
    pub client_name: String,
    pub main_product: String,
    pub search_volume: [String; 4],
}

#[cfg(test)]
mod tests {
    use super::{AdEconomicsReport, EconomicsMode, ShotCategory};

    #[test]
    fn category_parses_keys_and_labels() {
        assert_eq!(
            "climax".parse::<ShotCategory>().expect("key should parse"),
            ShotCategory::Climax
        );
        assert_eq!(
            "만능 브릿지 (연결)"
                .parse::<ShotCategory>()
                .expect("label should parse"),
            ShotCategory::Bridge
        );
        assert!("outro".parse::<ShotCategory>().is_err());
    }

    #[test]
    fn category_serializes_as_display_label() {
        let json = serde_json::to_string(&ShotCategory::Intro).expect("category should serialize");
        assert_eq!(json, "\"도입부 (3초 후킹)\"");
    }

    #[test]
    fn economics_report_is_tagged_by_mode() {
        let raw = r#"{
            "mode": "SIMULATION",
            "simulation": {
                "survivalRoas": "250%",
                "avgCpc": "500원",
                "requiredCvr": "2.5%",
                "scenarios": [
                    { "cpc": "300원", "breakEvenCvr": "1.5%", "profitableCvr": "2.0%" }
                ],
                "advice": "CPC 500원 이하를 유지하세요."
            }
        }"#;
        let report: AdEconomicsReport = serde_json::from_str(raw).expect("report should decode");
        assert_eq!(report.mode(), EconomicsMode::Simulation);
    }
}
