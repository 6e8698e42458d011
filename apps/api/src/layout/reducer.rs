//! Resume Reducer: deterministic content reductions toward a single page.
//!
//! # Catalogue
//! Every reducible dimension is one [`Reduction`]. A reduction owns three things:
//! - its eligibility predicate (`is_eligible`), shared with the estimator's
//!   suggestions and with automatic reduction,
//! - the suggestion text shown when it is eligible,
//! - its transformation, skipped whenever the predicate does not hold.
//!
//! `reduce` applies a user's [`ReductionSelection`]; `auto_reduce` selects every
//! eligible reduction itself. Both return a new resume and never touch the input.
//!
//! Re-applying a selection is a no-op for every reduction except the achievement
//! trim: it keeps a proportion of each role, so while the total stays above the
//! limit another pass trims again. Repeated passes converge, at the latest when
//! every role is down to two achievements.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::resume::StructuredResume;

const SUMMARY_WORD_LIMIT: usize = 120;
const SUMMARY_KEEP_WORDS: usize = 95;
const ELLIPSIS: &str = "...";
const ACHIEVEMENT_TOTAL_LIMIT: usize = 10;
const ACHIEVEMENT_KEEP_RATIO: f32 = 0.6;
const MIN_ACHIEVEMENTS_PER_ROLE: usize = 2;
const PROJECT_CAP: usize = 3;
const CERTIFICATION_CAP: usize = 3;
const AWARD_CAP: usize = 2;

/// One reducible dimension. Serialized with the toggle names the UI uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reduction {
    #[serde(rename = "summary")]
    ShortenSummary,
    #[serde(rename = "bullets60")]
    TrimAchievements,
    #[serde(rename = "projects3")]
    CapProjects,
    #[serde(rename = "certs3")]
    CapCertifications,
    #[serde(rename = "awards2")]
    CapAwards,
    #[serde(rename = "removeAdditional")]
    DropAdditionalSections,
    #[serde(rename = "removeSecondary")]
    DropSecondarySkills,
    #[serde(rename = "removeExtraLanguages")]
    KeepPrimaryLanguage,
}

impl Reduction {
    /// Catalogue order; suggestions are emitted in this order.
    pub const ALL: [Reduction; 8] = [
        Reduction::ShortenSummary,
        Reduction::TrimAchievements,
        Reduction::CapProjects,
        Reduction::CapCertifications,
        Reduction::CapAwards,
        Reduction::DropAdditionalSections,
        Reduction::DropSecondarySkills,
        Reduction::KeepPrimaryLanguage,
    ];

    /// Whether this reduction should be offered for (and automatically applied to) `resume`.
    pub fn is_eligible(self, resume: &StructuredResume) -> bool {
        match self {
            Reduction::ShortenSummary => resume.summary_word_count() > SUMMARY_WORD_LIMIT,
            Reduction::TrimAchievements => resume.total_achievements() > ACHIEVEMENT_TOTAL_LIMIT,
            Reduction::CapProjects => resume.projects.len() > PROJECT_CAP,
            Reduction::CapCertifications => resume.certifications.len() > CERTIFICATION_CAP,
            Reduction::CapAwards => resume.awards_and_honors.len() > AWARD_CAP,
            Reduction::DropAdditionalSections => resume.present_additional_sections().count() > 0,
            Reduction::DropSecondarySkills => !resume.secondary_skills.is_empty(),
            Reduction::KeepPrimaryLanguage => resume.languages.len() > 1,
        }
    }

    /// Human-readable suggestion for an eligible reduction.
    pub fn suggestion(self, resume: &StructuredResume) -> String {
        match self {
            Reduction::ShortenSummary => format!(
                "Shorten the professional summary from {} to 80-100 words",
                resume.summary_word_count()
            ),
            Reduction::TrimAchievements => format!(
                "Reduce work experience bullets ({} total): keep the top 2-3 achievements per role",
                resume.total_achievements()
            ),
            Reduction::CapProjects => format!(
                "Limit projects from {} to the 2-3 most relevant",
                resume.projects.len()
            ),
            Reduction::CapCertifications => format!(
                "Keep the 3 most recent or relevant certifications ({} listed)",
                resume.certifications.len()
            ),
            Reduction::CapAwards => format!(
                "Keep the 2 most significant awards ({} listed)",
                resume.awards_and_honors.len()
            ),
            Reduction::DropAdditionalSections => format!(
                "Remove {} additional section(s) to save space",
                resume.present_additional_sections().count()
            ),
            Reduction::DropSecondarySkills => {
                "Remove the secondary skills list to save space".to_string()
            }
            Reduction::KeepPrimaryLanguage => format!(
                "Keep only the primary language ({} extra language(s) to remove)",
                resume.languages.len().saturating_sub(1)
            ),
        }
    }

    /// Applies the transformation in place. A reduction whose guard does not
    /// hold leaves the resume untouched.
    fn apply(self, resume: &mut StructuredResume) {
        if !self.is_eligible(resume) {
            return;
        }
        match self {
            Reduction::ShortenSummary => {
                resume.professional_summary =
                    truncate_words(&resume.professional_summary, SUMMARY_KEEP_WORDS);
            }
            Reduction::TrimAchievements => {
                for role in &mut resume.work_experience {
                    let keep = achievements_to_keep(role.achievements.len());
                    role.achievements.truncate(keep);
                }
            }
            Reduction::CapProjects => resume.projects.truncate(PROJECT_CAP),
            Reduction::CapCertifications => resume.certifications.truncate(CERTIFICATION_CAP),
            Reduction::CapAwards => resume.awards_and_honors.truncate(AWARD_CAP),
            Reduction::DropAdditionalSections => resume.additional_sections.clear(),
            Reduction::DropSecondarySkills => resume.secondary_skills.clear(),
            Reduction::KeepPrimaryLanguage => resume.languages.truncate(1),
        }
    }
}

/// The set of reductions a user picked. Toggles are independent of each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionSelection {
    #[serde(rename = "summary")]
    pub shorten_summary: bool,
    #[serde(rename = "bullets60")]
    pub trim_achievements: bool,
    #[serde(rename = "projects3")]
    pub cap_projects: bool,
    #[serde(rename = "certs3")]
    pub cap_certifications: bool,
    #[serde(rename = "awards2")]
    pub cap_awards: bool,
    #[serde(rename = "removeAdditional")]
    pub drop_additional_sections: bool,
    #[serde(rename = "removeSecondary")]
    pub drop_secondary_skills: bool,
    #[serde(rename = "removeExtraLanguages")]
    pub keep_primary_language: bool,
}

impl ReductionSelection {
    pub fn is_enabled(&self, reduction: Reduction) -> bool {
        *self.slot(reduction)
    }

    pub fn enable(&mut self, reduction: Reduction) {
        *self.slot_mut(reduction) = true;
    }

    /// Selection containing exactly the reductions eligible for `resume`.
    pub fn eligible(resume: &StructuredResume) -> Self {
        Reduction::ALL
            .into_iter()
            .filter(|r| r.is_eligible(resume))
            .collect()
    }

    pub fn enabled(&self) -> impl Iterator<Item = Reduction> + '_ {
        Reduction::ALL
            .into_iter()
            .filter(move |r| self.is_enabled(*r))
    }

    fn slot(&self, reduction: Reduction) -> &bool {
        match reduction {
            Reduction::ShortenSummary => &self.shorten_summary,
            Reduction::TrimAchievements => &self.trim_achievements,
            Reduction::CapProjects => &self.cap_projects,
            Reduction::CapCertifications => &self.cap_certifications,
            Reduction::CapAwards => &self.cap_awards,
            Reduction::DropAdditionalSections => &self.drop_additional_sections,
            Reduction::DropSecondarySkills => &self.drop_secondary_skills,
            Reduction::KeepPrimaryLanguage => &self.keep_primary_language,
        }
    }

    fn slot_mut(&mut self, reduction: Reduction) -> &mut bool {
        match reduction {
            Reduction::ShortenSummary => &mut self.shorten_summary,
            Reduction::TrimAchievements => &mut self.trim_achievements,
            Reduction::CapProjects => &mut self.cap_projects,
            Reduction::CapCertifications => &mut self.cap_certifications,
            Reduction::CapAwards => &mut self.cap_awards,
            Reduction::DropAdditionalSections => &mut self.drop_additional_sections,
            Reduction::DropSecondarySkills => &mut self.drop_secondary_skills,
            Reduction::KeepPrimaryLanguage => &mut self.keep_primary_language,
        }
    }
}

impl FromIterator<Reduction> for ReductionSelection {
    fn from_iter<I: IntoIterator<Item = Reduction>>(iter: I) -> Self {
        let mut selection = ReductionSelection::default();
        for reduction in iter {
            selection.enable(reduction);
        }
        selection
    }
}

/// Applies the selected reductions to a copy of `resume`.
pub fn reduce(resume: &StructuredResume, selection: &ReductionSelection) -> StructuredResume {
    let mut reduced = resume.clone();
    for reduction in selection.enabled() {
        reduction.apply(&mut reduced);
    }
    reduced
}

/// Applies every reduction whose eligibility predicate holds, with no user input.
pub fn auto_reduce(resume: &StructuredResume) -> StructuredResume {
    let selection = ReductionSelection::eligible(resume);
    debug!(
        reductions = ?selection.enabled().collect::<Vec<_>>(),
        "auto-reducing resume"
    );
    reduce(resume, &selection)
}

fn achievements_to_keep(count: usize) -> usize {
    let proportional = (count as f32 * ACHIEVEMENT_KEEP_RATIO).floor() as usize;
    proportional.max(MIN_ACHIEVEMENTS_PER_ROLE).min(count)
}

fn truncate_words(text: &str, keep: usize) -> String {
    let mut kept = text.split_whitespace().take(keep).collect::<Vec<_>>().join(" ");
    kept.push_str(ELLIPSIS);
    kept
}
