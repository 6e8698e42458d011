// Stage 1 (analysis) and stage 2 (generation) prompt templates, plus the
// single-call match report and standard builder.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{render_template, NO_FABRICATION_INSTRUCTION, RESUME_JSON_SCHEMA};

/// Analysis prompt template.
/// Replace: {resume_text}, {jd_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a master resume strategist and content analyst. Your task is to perform a deep, probability-based analysis of the user's resume and create a dynamic content strategy for the target role.

## PHASE 1: PROBABILITY-BASED RESUME ANALYSIS

Categorize the original resume into exactly one of these patterns:

**Pattern A: Experienced Professional** (has work experience plus projects/skills)
**Pattern B: Career Changer** (has experience, but it is not relevant to the target role)
**Pattern C: Recent Graduate** (has education and some projects, minimal experience)
**Pattern D: Entry-Level** (has education, minimal projects, no experience)
**Pattern E: Skill-Based Professional** (strong skills/projects, minimal traditional experience)

For the chosen pattern, determine:
- Which sections ARE present in the resume (use names such as "Work Experience", "Education", "Projects", "Skills")
- Which sections are MISSING or WEAK
- The content gaps that need to be filled
- Whether the resume will be too long, too short or just right for one page

## PHASE 2: DYNAMIC CONTENT STRATEGY

**Pattern A (Experienced):** optimize existing experience and projects; condense if too long; add certifications or awards if space allows.
**Pattern B (Career Changer):** reposition experience around transferable skills; propose relevant projects built on existing skills; add professional development.
**Pattern C (Recent Graduate):** expand projects significantly; add relevant coursework and academic achievements; include internships or volunteer work if present.
**Pattern D (Entry-Level):** build a comprehensive projects section from the skills listed; add coursework, academic achievements and certifications.
**Pattern E (Skill-Based):** expand projects and skills; add portfolio links and relevant certifications.

## INPUT DATA
- **Original Resume:** {resume_text}
- **Job Description:** {jd_text}

## REQUIRED JSON OUTPUT
Return a JSON object with this EXACT shape:
{
  "patternAnalysis": {
    "pattern": "Pattern A/B/C/D/E",
    "confidence": "high/medium/low",
    "sectionsPresent": ["sections found in the original resume"],
    "sectionsMissing": ["sections to generate"],
    "contentDensity": "too_long/just_right/too_short",
    "estimatedPageCount": 1.0
  },
  "contentStrategy": {
    "sectionsToOptimize": ["sections to improve"],
    "sectionsToGenerate": ["sections to create from scratch"],
    "contentExpansionNeeded": false,
    "contentCondensationNeeded": false,
    "prioritySections": ["sections in order of importance"]
  },
  "dynamicActions": [
    {
      "action": "generate_projects/expand_experience/add_certifications/etc",
      "reason": "why this action is needed",
      "content": "specific content to generate or modify"
    }
  ]
}"#;

/// Generation prompt template.
/// Replace: {resume_text}, {jd_text}, {analysis_json}, {no_fabrication}, {resume_schema}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"You are an expert ATS-optimization resume writer with dynamic content generation capabilities. Your task is to rebuild the user's resume for the target job using the probability-based analysis provided.

## MASTER DIRECTIVE: CREATE DYNAMIC, PATTERN-BASED CONTENT

### PHASE 1: APPLY ANALYSIS RESULTS
Use the analysis result to understand:
- Which pattern this resume follows
- Which content gaps need to be filled
- Whether content needs expansion or condensation

### PHASE 2: DYNAMIC CONTENT GENERATION
**If Pattern A (Experienced Professional):** sharpen existing work experience bullets; enhance projects if present; add certifications or awards if space allows.
**If Pattern B (Career Changer):** reposition work experience around transferable skills; add 2-3 projects grounded in existing skills; add professional development.
**If Pattern C (Recent Graduate):** build a comprehensive projects section (3-4 projects); expand education with relevant coursework and achievements.
**If Pattern D (Entry-Level):** build 3-4 projects from the skills and coursework listed; detail education; add certifications, volunteer work and academic achievements.
**If Pattern E (Skill-Based Professional):** expand projects significantly (4-5 projects); add portfolio links and certifications.

### PHASE 3: INTELLIGENT CONTENT ADJUSTMENT
**Too long:** condense bullet points while keeping impact, combine related skills, remove redundancy, keep the most relevant achievements.
**Too short:** expand bullets with technical detail and quantified results, add relevant projects and certifications.

{no_fabrication}

## INPUT DATA
- **Original Resume:** {resume_text}
- **Job Description:** {jd_text}
- **Analysis Result:** {analysis_json}

## REQUIRED JSON OUTPUT
Return ONLY a JSON object with exactly this shape (omit "workExperience" when the original resume has none):
{resume_schema}"#;

/// Match report prompt template.
/// Replace: {resume_text}, {jd_text}
pub const MATCH_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a strict but FAIR ATS system and an expert recruiter with 20+ years of experience. Score how well the resume matches the job description and explain the score.

SCORING GUIDELINES (out of 100):
- 0-20: Completely wrong field or industry, no relevant experience
- 21-40: Some transferable skills but major gaps, different domain
- 41-60: Related field, missing 40%+ of core requirements
- 61-75: Good foundation, missing 20-30% of requirements
- 76-85: Strong match, minor gaps, 70-80% of requirements met
- 86-95: Near-perfect match, 90%+ of requirements met
- 96-100: Perfect match (extremely rare)

The four component scores are each out of 25 and should add up to the total.

RESUME TEXT:
{resume_text}

JOB DESCRIPTION:
{jd_text}

Return ONLY a JSON object with the following structure, filled with your analysis. DO NOT add any extra text.
{
  "matchScore": {
    "total": 0,
    "hardSkills": 0,
    "softSkills": 0,
    "roleAlignment": 0,
    "atsCompatibility": 0
  },
  "missingKeywords": ["string"],
  "actionPlan": ["string"],
  "recruiterLens": {
    "positives": ["string"],
    "redFlags": ["string"],
    "shortlistProbability": 0,
    "verdict": "string"
  },
  "atsVerdict": {
    "willAutoReject": false,
    "reason": "string"
  },
  "rewriteSuggestions": {
    "headline": "string",
    "summary": "string",
    "experienceBullet": "string"
  },
  "coverLetter": "string"
}"#;

/// Standard builder prompt template: one call that edits the resume in place
/// instead of running the analysis and layout stages.
/// Replace: {resume_text}, {jd_text}, {no_fabrication}, {resume_schema}
pub const STANDARD_RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert resume editor. Your task is to enhance the provided resume to better match the job description while preserving the original structure and content as much as possible.

## INSTRUCTIONS
1. **Enhance, Don't Replace:** Improve the wording, add relevant keywords from the job description and strengthen the bullet points. Do not invent new jobs or projects.
2. **Keyword Integration:** Weave keywords from the job description naturally into the existing resume sections.
3. **Single-Page Optimization:** The final resume must fit on exactly one page.
   - If the content is too long, summarize the descriptions in the Work Experience and Projects sections, keeping the most impactful information.
   - If there is significant empty space, expand the existing sections or add sections such as Secondary Skills, Certifications, Awards and Honors or Languages.
4. **Output:** Return ONLY a valid JSON object matching the resume structure below.

## INPUT DATA
- **Original Resume:** {resume_text}
- **Job Description:** {jd_text}

## WORK EXPERIENCE HANDLING
- If the original resume contains work experience, integrate and optimize it.
- Focus on enhancing the sections that ARE present in the original resume.

{no_fabrication}

## REQUIRED JSON OUTPUT
{resume_schema}"#;

/// Builds the stage-1 analysis prompt.
pub fn build_analysis_prompt(resume_text: &str, jd_text: &str) -> String {
    render_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("jd_text", jd_text)],
    )
}

/// Builds the stage-2 generation prompt from the stage-1 analysis JSON.
pub fn build_generation_prompt(resume_text: &str, jd_text: &str, analysis_json: &str) -> String {
    render_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("jd_text", jd_text),
            ("analysis_json", analysis_json),
            ("no_fabrication", NO_FABRICATION_INSTRUCTION),
            ("resume_schema", RESUME_JSON_SCHEMA),
        ],
    )
}

/// Builds the match report prompt.
pub fn build_match_analysis_prompt(resume_text: &str, jd_text: &str) -> String {
    render_template(
        MATCH_ANALYSIS_PROMPT_TEMPLATE,
        &[("resume_text", resume_text), ("jd_text", jd_text)],
    )
}

/// Builds the single-call standard builder prompt.
pub fn build_standard_resume_prompt(resume_text: &str, jd_text: &str) -> String {
    render_template(
        STANDARD_RESUME_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("jd_text", jd_text),
            ("no_fabrication", NO_FABRICATION_INSTRUCTION),
            ("resume_schema", RESUME_JSON_SCHEMA),
        ],
    )
}
