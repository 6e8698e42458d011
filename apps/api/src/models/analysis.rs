//! Stage-1 output: the archetype classification and content strategy that the
//! generation and layout stages are conditioned on.

use serde::{de, Deserialize, Deserializer, Serialize};

/// The five resume archetypes the analysis stage chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumePattern {
    #[serde(
        rename = "Pattern A",
        alias = "A",
        alias = "Experienced Professional"
    )]
    ExperiencedProfessional,
    #[serde(rename = "Pattern B", alias = "B", alias = "Career Changer")]
    CareerChanger,
    #[serde(rename = "Pattern C", alias = "C", alias = "Recent Graduate")]
    RecentGraduate,
    #[serde(rename = "Pattern D", alias = "D", alias = "Entry-Level")]
    EntryLevel,
    #[serde(
        rename = "Pattern E",
        alias = "E",
        alias = "Skill-Based Professional"
    )]
    SkillBasedProfessional,
}

impl ResumePattern {
    pub fn label(&self) -> &'static str {
        match self {
            ResumePattern::ExperiencedProfessional => "Experienced Professional",
            ResumePattern::CareerChanger => "Career Changer",
            ResumePattern::RecentGraduate => "Recent Graduate",
            ResumePattern::EntryLevel => "Entry-Level",
            ResumePattern::SkillBasedProfessional => "Skill-Based Professional",
        }
    }

    /// Patterns A and B are defined by the presence of work experience.
    pub fn implies_work_history(&self) -> bool {
        matches!(
            self,
            ResumePattern::ExperiencedProfessional | ResumePattern::CareerChanger
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

/// Shared vocabulary between the analysis stage and the local layout estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentDensity {
    TooLong,
    #[default]
    JustRight,
    TooShort,
}

impl ContentDensity {
    pub fn label(&self) -> &'static str {
        match self {
            ContentDensity::TooLong => "TOO LONG",
            ContentDensity::JustRight => "JUST RIGHT",
            ContentDensity::TooShort => "TOO SHORT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysis {
    pub pattern: ResumePattern,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub sections_present: Vec<String>,
    #[serde(default)]
    pub sections_missing: Vec<String>,
    #[serde(default)]
    pub content_density: ContentDensity,
    #[serde(default, deserialize_with = "number_or_string")]
    pub estimated_page_count: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStrategy {
    #[serde(default)]
    pub sections_to_optimize: Vec<String>,
    #[serde(default)]
    pub sections_to_generate: Vec<String>,
    #[serde(default, deserialize_with = "bool_or_string")]
    pub content_expansion_needed: bool,
    #[serde(default, deserialize_with = "bool_or_string")]
    pub content_condensation_needed: bool,
    #[serde(default)]
    pub priority_sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicAction {
    pub action: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub pattern_analysis: PatternAnalysis,
    #[serde(default)]
    pub content_strategy: ContentStrategy,
    #[serde(default)]
    pub dynamic_actions: Vec<DynamicAction>,
}

impl ResumeAnalysis {
    /// True unless the analysis says unambiguously that the source resume has no
    /// work history: a pattern that carries none (C, D, E) and no section label
    /// that reads like one.
    pub fn source_has_work_history(&self) -> bool {
        self.pattern_analysis.pattern.implies_work_history()
            || self
                .pattern_analysis
                .sections_present
                .iter()
                .any(|section| is_work_history_section(section))
    }
}

// The analysis schemas show these as quoted placeholders ("number", "boolean"),
// so models frequently answer with strings.

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Typed(T),
    Text(String),
}

pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose<f32>>::deserialize(deserializer)? {
        Some(Loose::Typed(n)) => Ok(n),
        Some(Loose::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got {text:?}"))),
        None => Ok(0.0),
    }
}

pub(crate) fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose<bool>>::deserialize(deserializer)? {
        Some(Loose::Typed(b)) => Ok(b),
        Some(Loose::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Ok(true),
            "false" | "no" | "" => Ok(false),
            _ => Err(de::Error::custom(format!("expected a boolean, got {text:?}"))),
        },
        None => Ok(false),
    }
}

/// "... Experience" labels that do not describe employment.
const NON_WORK_EXPERIENCE: [&str; 4] = ["project", "volunteer", "research", "leadership"];

const WORK_HISTORY_TERMS: [&str; 5] = ["employment", "workhistory", "internship", "careerhistory", "positions"];

fn is_work_history_section(name: &str) -> bool {
    let normalized: String = name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if normalized.contains("experience") {
        return !NON_WORK_EXPERIENCE
            .iter()
            .any(|qualifier| normalized.contains(qualifier));
    }
    WORK_HISTORY_TERMS
        .iter()
        .any(|term| normalized.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis_json(sections_present: Vec<&str>) -> serde_json::Value {
        json!({
            "patternAnalysis": {
                "pattern": "Pattern C",
                "confidence": "high",
                "sectionsPresent": sections_present,
                "sectionsMissing": ["projects"],
                "contentDensity": "too_short",
                "estimatedPageCount": 0.6
            },
            "contentStrategy": {
                "sectionsToOptimize": ["education"],
                "sectionsToGenerate": ["projects"],
                "contentExpansionNeeded": true,
                "contentCondensationNeeded": false,
                "prioritySections": ["education", "projects"]
            },
            "dynamicActions": [
                {"action": "generate_projects", "reason": "none listed", "content": "two web apps"}
            ]
        })
    }

    #[test]
    fn test_analysis_deserializes() {
        let analysis: ResumeAnalysis =
            serde_json::from_value(analysis_json(vec!["education", "skills"])).unwrap();
        assert_eq!(
            analysis.pattern_analysis.pattern,
            ResumePattern::RecentGraduate
        );
        assert_eq!(analysis.pattern_analysis.confidence, Confidence::High);
        assert_eq!(
            analysis.pattern_analysis.content_density,
            ContentDensity::TooShort
        );
        assert!(analysis.content_strategy.content_expansion_needed);
        assert_eq!(analysis.dynamic_actions[0].action, "generate_projects");
    }

    #[test]
    fn test_pattern_accepts_short_and_named_forms() {
        let short: ResumePattern = serde_json::from_str(r#""A""#).unwrap();
        let named: ResumePattern = serde_json::from_str(r#""Career Changer""#).unwrap();
        assert_eq!(short, ResumePattern::ExperiencedProfessional);
        assert_eq!(named, ResumePattern::CareerChanger);
        assert!(serde_json::from_str::<ResumePattern>(r#""Pattern Z""#).is_err());
    }

    #[test]
    fn test_missing_pattern_analysis_is_rejected() {
        let value = json!({"contentStrategy": {}, "dynamicActions": []});
        assert!(serde_json::from_value::<ResumeAnalysis>(value).is_err());
    }

    #[test]
    fn test_work_history_detection() {
        let with_work: ResumeAnalysis =
            serde_json::from_value(analysis_json(vec!["Work Experience", "Education"])).unwrap();
        let without_work: ResumeAnalysis =
            serde_json::from_value(analysis_json(vec!["Education", "Projects"])).unwrap();
        assert!(with_work.source_has_work_history());
        assert!(!without_work.source_has_work_history());
    }

    #[test]
    fn test_everyday_work_history_labels_are_recognised() {
        for label in [
            "Relevant Experience",
            "Industry Experience",
            "Internship Experience",
            "Internships",
            "Career History",
            "EXPERIENCE",
            "Employment",
        ] {
            assert!(is_work_history_section(label), "{label}");
        }
        for label in [
            "Project Experience",
            "Volunteer Experience",
            "Research Experience",
            "Education",
            "Projects",
            "Skills",
        ] {
            assert!(!is_work_history_section(label), "{label}");
        }
    }

    #[test]
    fn test_experienced_patterns_always_have_work_history() {
        for pattern in ["Pattern A", "Pattern B"] {
            let mut value = analysis_json(vec!["Education", "Skills"]);
            value["patternAnalysis"]["pattern"] = json!(pattern);
            let analysis: ResumeAnalysis = serde_json::from_value(value).unwrap();
            assert!(analysis.source_has_work_history(), "{pattern}");
        }
        for pattern in ["Pattern C", "Pattern D", "Pattern E"] {
            let mut value = analysis_json(vec!["Education", "Projects"]);
            value["patternAnalysis"]["pattern"] = json!(pattern);
            let analysis: ResumeAnalysis = serde_json::from_value(value).unwrap();
            assert!(!analysis.source_has_work_history(), "{pattern}");
        }
    }

    #[test]
    fn test_quoted_numbers_and_booleans_are_accepted() {
        let mut value = analysis_json(vec!["Education"]);
        value["patternAnalysis"]["estimatedPageCount"] = json!("1.5");
        value["contentStrategy"]["contentCondensationNeeded"] = json!("true");
        let analysis: ResumeAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(analysis.pattern_analysis.estimated_page_count, 1.5);
        assert!(analysis.content_strategy.content_condensation_needed);
    }

    #[test]
    fn test_unparseable_page_count_is_rejected() {
        let mut value = analysis_json(vec!["Education"]);
        value["patternAnalysis"]["estimatedPageCount"] = json!("about two");
        assert!(serde_json::from_value::<ResumeAnalysis>(value).is_err());
    }
}
