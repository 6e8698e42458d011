// Shared prompt constants used by every pipeline stage.
// Stage-specific templates live in generation/prompts.rs and layout/prompts.rs.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that returns a resume object.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    CRITICAL: If the original resume contains no work experience, do NOT create or \
    fabricate any. Omit the \"workExperience\" field or return it as an empty array. \
    Never invent employers, job titles, dates, degrees or certifications that are not \
    present in the source material.";

/// The exact StructuredResume shape every resume-producing stage must return.
/// Keep in sync with `models::resume::StructuredResume`.
pub const RESUME_JSON_SCHEMA: &str = r#"{
  "header": {
    "name": "string",
    "title": "string",
    "contact": "string, or an object of labelled strings such as email, phone, linkedin, location"
  },
  "professionalSummary": "string",
  "coreSkills": { "technical": ["string"], "soft": ["string"] },
  "workExperience": [
    { "title": "string", "company": "string", "duration": "string", "achievements": ["string"] }
  ],
  "projects": [
    { "title": "string", "description": "string", "technologies": ["string"] }
  ],
  "education": [
    { "degree": "string", "institution": "string", "year": "string", "relevantCoursework": ["string"] }
  ],
  "certifications": [
    { "name": "string", "issuingOrganization": "string", "year": "string" }
  ],
  "awardsAndHonors": [
    { "name": "string", "organization": "string", "year": "string" }
  ],
  "languages": [
    { "language": "string", "proficiency": "string" }
  ],
  "secondarySkills": ["string"],
  "additionalSections": [
    { "title": "string", "content": "string" }
  ]
}"#;

/// Substitutes `{key}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so resume or job text containing
/// something like `{jd_text}` is passed through verbatim. Braces that do not
/// name a known key (JSON examples in the templates) are left untouched.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let substitution = after.find('}').and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (end, *value))
        });
        match substitution {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{
        AdditionalSection, Award, Certification, Contact, Education, Header, LanguageSkill,
        Project, StructuredResume, WorkExperience,
    };

    #[test]
    fn test_render_template_substitutes_known_keys() {
        let out = render_template("Hi {name}, see {\"a\": 1}", &[("name", "Sam")]);
        assert_eq!(out, "Hi Sam, see {\"a\": 1}");
    }

    #[test]
    fn test_render_template_does_not_rescan_values() {
        let out = render_template(
            "R: {resume_text} J: {jd_text}",
            &[("resume_text", "uses {jd_text} literally"), ("jd_text", "JD")],
        );
        assert_eq!(out, "R: uses {jd_text} literally J: JD");
    }

    #[test]
    fn test_render_template_handles_unclosed_brace() {
        assert_eq!(render_template("tail {open", &[("open", "x")]), "tail {open");
    }

    #[test]
    fn test_schema_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(RESUME_JSON_SCHEMA).unwrap();
        assert!(parsed.is_object());
    }

    #[test]
    fn test_schema_lists_every_resume_field() {
        let full = StructuredResume {
            work_experience: vec![WorkExperience::default()],
            projects: vec![Project::default()],
            education: vec![Education {
                relevant_coursework: vec!["x".to_string()],
                ..Default::default()
            }],
            certifications: vec![Certification::default()],
            awards_and_honors: vec![Award::default()],
            languages: vec![LanguageSkill::default()],
            secondary_skills: vec!["x".to_string()],
            additional_sections: vec![AdditionalSection::default()],
            ..Default::default()
        };
        let serialized = serde_json::to_value(&full).unwrap();
        let schema: serde_json::Value = serde_json::from_str(RESUME_JSON_SCHEMA).unwrap();

        assert_same_keys(&serialized, &schema, "$");
    }

    #[test]
    fn test_schema_documents_both_contact_shapes() {
        let schema: serde_json::Value = serde_json::from_str(RESUME_JSON_SCHEMA).unwrap();
        let contact = schema["header"]["contact"].as_str().unwrap();
        assert!(contact.starts_with("string"));
        assert!(contact.contains("object of labelled strings"));

        let line: Header = serde_json::from_value(serde_json::json!({
            "name": "Sam", "contact": "sam@example.com | 555-0100"
        }))
        .unwrap();
        let fields: Header = serde_json::from_value(serde_json::json!({
            "name": "Sam", "contact": {"email": "sam@example.com", "phone": "555-0100"}
        }))
        .unwrap();
        assert!(matches!(line.contact, Contact::Text(_)));
        assert!(matches!(fields.contact, Contact::Fields(_)));
        assert_eq!(line.contact.display_line(), fields.contact.display_line());
    }

    fn assert_same_keys(actual: &serde_json::Value, schema: &serde_json::Value, path: &str) {
        match (actual, schema) {
            (serde_json::Value::Object(a), serde_json::Value::Object(s)) => {
                for key in a.keys() {
                    assert!(s.contains_key(key), "schema is missing {path}.{key}");
                    assert_same_keys(&a[key], &s[key], &format!("{path}.{key}"));
                }
                for key in s.keys() {
                    assert!(a.contains_key(key), "schema has unknown field {path}.{key}");
                }
            }
            (serde_json::Value::Array(a), serde_json::Value::Array(s)) => {
                if let (Some(first), Some(shape)) = (a.first(), s.first()) {
                    assert_same_keys(first, shape, &format!("{path}[]"));
                }
            }
            _ => {}
        }
    }
}
