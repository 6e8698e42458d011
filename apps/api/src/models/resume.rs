//! The structured resume schema shared by the LLM stages, the layout estimator,
//! the reducer and the document exporter.
//!
//! Field names are camelCase on the wire because that is the shape the prompts
//! ask the model to produce. Every list and optional string accepts `null` and
//! treats it as empty; a value of the wrong JSON type is still a hard error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Separator used when a structured contact map is rendered as one line.
pub const CONTACT_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResume {
    pub header: Header,
    #[serde(default, deserialize_with = "null_as_default")]
    pub professional_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub core_skills: CoreSkills,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub awards_and_honors: Vec<Award>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<LanguageSkill>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub secondary_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_sections: Vec<AdditionalSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: Contact,
}

/// Contact details are either a free-form line or a map of labelled fields
/// (`{"email": "...", "phone": "..."}`). Map order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contact {
    Text(String),
    Fields(Map<String, Value>),
}

impl Default for Contact {
    fn default() -> Self {
        Contact::Text(String::new())
    }
}

impl Contact {
    /// Renders the contact as a single display line.
    pub fn display_line(&self) -> String {
        match self {
            Contact::Text(text) => text.trim().to_string(),
            Contact::Fields(fields) => fields
                .values()
                .filter_map(|v| match v {
                    Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(CONTACT_SEPARATOR),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreSkills {
    #[serde(default, deserialize_with = "null_as_default")]
    pub technical: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub soft: Vec<String>,
}

impl CoreSkills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub relevant_coursework: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issuing_organization: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Award {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl AdditionalSection {
    /// An entry only counts when both its title and content carry text.
    pub fn is_present(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

impl StructuredResume {
    pub fn summary_word_count(&self) -> usize {
        word_count(&self.professional_summary)
    }

    pub fn total_achievements(&self) -> usize {
        self.work_experience
            .iter()
            .map(|exp| exp.achievements.len())
            .sum()
    }

    /// Additional sections that would actually be rendered.
    pub fn present_additional_sections(&self) -> impl Iterator<Item = &AdditionalSection> {
        self.additional_sections.iter().filter(|s| s.is_present())
    }

    pub fn has_work_experience(&self) -> bool {
        !self.work_experience.is_empty()
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Deserializes `null` as `T::default()` while still rejecting wrong types.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
