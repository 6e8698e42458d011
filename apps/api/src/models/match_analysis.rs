//! ATS match report: how well a resume fits a job description, as scored by the
//! model, with recruiter feedback, rewrite suggestions and a cover letter.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::models::analysis::{bool_or_string, number_or_string};

const TOTAL_SCORE_MAX: f32 = 100.0;
const COMPONENT_SCORE_MAX: f32 = 25.0;

/// Score bands used to turn `matchScore.total` into a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    WrongField,
    MajorGaps,
    RelatedField,
    GoodFoundation,
    StrongMatch,
    NearPerfect,
    Perfect,
}

impl MatchBand {
    pub fn from_total(total: f32) -> Self {
        match total {
            t if t <= 20.0 => MatchBand::WrongField,
            t if t <= 40.0 => MatchBand::MajorGaps,
            t if t <= 60.0 => MatchBand::RelatedField,
            t if t <= 75.0 => MatchBand::GoodFoundation,
            t if t <= 85.0 => MatchBand::StrongMatch,
            t if t <= 95.0 => MatchBand::NearPerfect,
            _ => MatchBand::Perfect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    #[serde(deserialize_with = "score_out_of_100")]
    pub total: f32,
    #[serde(deserialize_with = "score_out_of_25")]
    pub hard_skills: f32,
    #[serde(deserialize_with = "score_out_of_25")]
    pub soft_skills: f32,
    #[serde(deserialize_with = "score_out_of_25")]
    pub role_alignment: f32,
    #[serde(deserialize_with = "score_out_of_25")]
    pub ats_compatibility: f32,
}

impl MatchScore {
    pub fn band(&self) -> MatchBand {
        MatchBand::from_total(self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterLens {
    #[serde(default)]
    pub positives: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default, deserialize_with = "score_out_of_100")]
    pub shortlist_probability: f32,
    #[serde(default)]
    pub verdict: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsVerdict {
    #[serde(default, deserialize_with = "bool_or_string")]
    pub will_auto_reject: bool,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSuggestions {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience_bullet: String,
}

/// The match report. Only `matchScore` is required; every other part defaults
/// to empty when the model leaves it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    pub match_score: MatchScore,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub action_plan: Vec<String>,
    #[serde(default)]
    pub recruiter_lens: RecruiterLens,
    #[serde(default)]
    pub ats_verdict: AtsVerdict,
    #[serde(default)]
    pub rewrite_suggestions: RewriteSuggestions,
    #[serde(default)]
    pub cover_letter: String,
}

fn score_out_of_100<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    bounded_score(number_or_string(deserializer)?, TOTAL_SCORE_MAX)
}

fn score_out_of_25<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    bounded_score(number_or_string(deserializer)?, COMPONENT_SCORE_MAX)
}

fn bounded_score<E: de::Error>(score: f32, max: f32) -> Result<f32, E> {
    if (0.0..=max).contains(&score) {
        Ok(score)
    } else {
        Err(E::custom(format!("score {score} is outside 0-{max}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> serde_json::Value {
        json!({
            "matchScore": {
                "total": 78,
                "hardSkills": 20,
                "softSkills": 18,
                "roleAlignment": 21,
                "atsCompatibility": 19
            },
            "missingKeywords": ["Kubernetes", "gRPC"],
            "actionPlan": ["Add a Kubernetes project"],
            "recruiterLens": {
                "positives": ["Strong Rust background"],
                "redFlags": ["Short tenure at last role"],
                "shortlistProbability": 65,
                "verdict": "Worth a phone screen"
            },
            "atsVerdict": {"willAutoReject": false, "reason": "Core keywords present"},
            "rewriteSuggestions": {
                "headline": "Backend Engineer, Rust and Distributed Systems",
                "summary": "Backend engineer with five years of Rust.",
                "experienceBullet": "Cut p99 latency 40% by rewriting the cache layer"
            },
            "coverLetter": "Dear hiring manager,"
        })
    }

    #[test]
    fn test_report_deserializes() {
        let analysis: MatchAnalysis = serde_json::from_value(report()).unwrap();
        assert_eq!(analysis.match_score.total, 78.0);
        assert_eq!(analysis.match_score.band(), MatchBand::StrongMatch);
        assert_eq!(analysis.missing_keywords, vec!["Kubernetes", "gRPC"]);
        assert_eq!(analysis.recruiter_lens.shortlist_probability, 65.0);
        assert!(!analysis.ats_verdict.will_auto_reject);
        assert!(analysis.cover_letter.starts_with("Dear"));
    }

    #[test]
    fn test_quoted_scores_and_verdict_are_accepted() {
        let mut value = report();
        value["matchScore"]["total"] = json!("42");
        value["atsVerdict"]["willAutoReject"] = json!("true");
        let analysis: MatchAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(analysis.match_score.total, 42.0);
        assert_eq!(analysis.match_score.band(), MatchBand::RelatedField);
        assert!(analysis.ats_verdict.will_auto_reject);
    }

    #[test]
    fn test_out_of_range_scores_are_rejected() {
        let mut total = report();
        total["matchScore"]["total"] = json!(130);
        assert!(serde_json::from_value::<MatchAnalysis>(total).is_err());

        let mut component = report();
        component["matchScore"]["hardSkills"] = json!(40);
        assert!(serde_json::from_value::<MatchAnalysis>(component).is_err());
    }

    #[test]
    fn test_only_match_score_is_required() {
        let minimal = json!({
            "matchScore": {
                "total": 12, "hardSkills": 3, "softSkills": 4,
                "roleAlignment": 2, "atsCompatibility": 3
            }
        });
        let analysis: MatchAnalysis = serde_json::from_value(minimal).unwrap();
        assert_eq!(analysis.match_score.band(), MatchBand::WrongField);
        assert!(analysis.action_plan.is_empty());
        assert!(analysis.rewrite_suggestions.headline.is_empty());

        assert!(serde_json::from_value::<MatchAnalysis>(json!({"missingKeywords": []})).is_err());
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(MatchBand::from_total(20.0), MatchBand::WrongField);
        assert_eq!(MatchBand::from_total(20.5), MatchBand::MajorGaps);
        assert_eq!(MatchBand::from_total(75.0), MatchBand::GoodFoundation);
        assert_eq!(MatchBand::from_total(96.0), MatchBand::Perfect);
    }
}
