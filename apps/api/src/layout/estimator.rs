//! Layout Estimator: deterministic single-page fit check for a structured resume.
//!
//! Walks the sections in render order, charging a fixed heading cost per present
//! section and a fixed item cost plus wrapped-text height per entry. The result
//! drives the single-page banner, the reduction toggles and the layout prompt.
//!
//! # Density bands
//! - ratio < 0.75 → `too_short`
//! - ratio > 1.00 → `too_long` (will overflow)
//! - ratio > 1.20 → critical overflow, content must be cut significantly

use serde::{Deserialize, Serialize};

use crate::layout::metrics::PageMetrics;
use crate::layout::reducer::Reduction;
use crate::models::analysis::ContentDensity;
use crate::models::resume::StructuredResume;

const TOO_SHORT_RATIO: f32 = 0.75;
const CRITICAL_OVERFLOW_RATIO: f32 = 1.2;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Resume sections in the order they are rendered and measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Header,
    Summary,
    Skills,
    Experience,
    Projects,
    Education,
    Certifications,
    SecondarySkills,
    Awards,
    Languages,
    AdditionalSections,
}

/// Height contributed by one present section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEstimate {
    pub section: Section,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEstimate {
    /// Total content height in twips.
    pub content_height: u32,
    /// `content_height / page_capacity`, unrounded.
    pub estimated_page_count: f32,
    pub space_used_percentage: f32,
    pub will_overflow: bool,
    pub critical_overflow: bool,
    pub density: ContentDensity,
    pub estimated_length_cm: f32,
    pub suggestions: Vec<String>,
    /// One toggle per suggestion, same order.
    pub available_reductions: Vec<Reduction>,
    pub sections: Vec<SectionEstimate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Estimation
// ────────────────────────────────────────────────────────────────────────────

/// Estimates how much of a page `resume` fills. Never fails; empty sections cost nothing.
pub fn estimate(resume: &StructuredResume, metrics: &PageMetrics) -> LayoutEstimate {
    let sections = measure_sections(resume, metrics);
    let content_height: u32 = sections.iter().map(|s| s.height).sum();

    let ratio = metrics.page_ratio(content_height);
    let density = if ratio > 1.0 {
        ContentDensity::TooLong
    } else if ratio < TOO_SHORT_RATIO {
        ContentDensity::TooShort
    } else {
        ContentDensity::JustRight
    };

    let available_reductions: Vec<Reduction> = Reduction::ALL
        .into_iter()
        .filter(|r| r.is_eligible(resume))
        .collect();
    let suggestions = available_reductions
        .iter()
        .map(|r| r.suggestion(resume))
        .collect();

    LayoutEstimate {
        content_height,
        estimated_page_count: ratio,
        space_used_percentage: ratio.min(metrics.space_used_cap) * 100.0,
        will_overflow: ratio > 1.0,
        critical_overflow: ratio > CRITICAL_OVERFLOW_RATIO,
        density,
        estimated_length_cm: PageMetrics::height_to_cm(content_height),
        suggestions,
        available_reductions,
        sections,
    }
}

fn measure_sections(resume: &StructuredResume, m: &PageMetrics) -> Vec<SectionEstimate> {
    let mut sections = vec![SectionEstimate {
        section: Section::Header,
        height: m.header_cost,
    }];
    let mut push = |section: Section, body: u32| {
        sections.push(SectionEstimate {
            section,
            height: m.section_heading_cost + body,
        });
    };

    if !resume.professional_summary.trim().is_empty() {
        push(
            Section::Summary,
            m.text_height(&resume.professional_summary) + m.paragraph_spacing,
        );
    }

    let skills = &resume.core_skills;
    if !skills.is_empty() {
        let mut body = 0;
        for (label, list) in [("Technical: ", &skills.technical), ("Soft Skills: ", &skills.soft)] {
            if !list.is_empty() {
                body += m.text_height(&format!("{label}{}", list.join(", "))) + m.bullet_spacing;
            }
        }
        push(Section::Skills, body);
    }

    if !resume.work_experience.is_empty() {
        let body = resume
            .work_experience
            .iter()
            .map(|role| {
                let bullets: u32 = role
                    .achievements
                    .iter()
                    .map(|a| m.text_height(a) + m.bullet_spacing)
                    .sum();
                m.item_heading_cost + m.detail_line_cost + bullets + m.paragraph_spacing
            })
            .sum();
        push(Section::Experience, body);
    }

    if !resume.projects.is_empty() {
        let body = resume
            .projects
            .iter()
            .map(|p| {
                let technologies = if p.technologies.is_empty() {
                    0
                } else {
                    m.detail_line_cost
                };
                m.item_heading_cost + technologies + m.text_height(&p.description) + m.paragraph_spacing
            })
            .sum();
        push(Section::Projects, body);
    }

    if !resume.education.is_empty() {
        let body = resume
            .education
            .iter()
            .map(|e| {
                let coursework = if e.relevant_coursework.is_empty() {
                    0
                } else {
                    m.text_height(&format!(
                        "Relevant Coursework: {}",
                        e.relevant_coursework.join(", ")
                    ))
                };
                m.item_heading_cost + m.detail_line_cost + coursework + m.paragraph_spacing
            })
            .sum();
        push(Section::Education, body);
    }

    if !resume.certifications.is_empty() {
        push(
            Section::Certifications,
            resume.certifications.len() as u32 * m.item_heading_cost,
        );
    }

    if !resume.secondary_skills.is_empty() {
        push(
            Section::SecondarySkills,
            m.text_height(&resume.secondary_skills.join(", ")) + m.paragraph_spacing,
        );
    }

    if !resume.awards_and_honors.is_empty() {
        push(
            Section::Awards,
            resume.awards_and_honors.len() as u32 * m.item_heading_cost,
        );
    }

    if !resume.languages.is_empty() {
        push(
            Section::Languages,
            resume.languages.len() as u32 * m.detail_line_cost,
        );
    }

    let additional: u32 = resume
        .present_additional_sections()
        .map(|s| m.item_heading_cost + m.text_height(&s.content) + m.paragraph_spacing)
        .sum();
    if additional > 0 {
        push(Section::AdditionalSections, additional);
    }

    sections
}
