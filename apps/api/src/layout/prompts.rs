//! Stage-3 prompt: single-page layout optimization of a generated resume.
//!
//! The model receives the draft resume JSON (and, when available, the stage-1
//! analysis) and must return the full StructuredResume adjusted toward one page.

use crate::layout::estimator::LayoutEstimate;
use crate::llm_client::prompts::{render_template, NO_FABRICATION_INSTRUCTION, RESUME_JSON_SCHEMA};

pub const LAYOUT_PROMPT_TEMPLATE: &str = "\
You are a master resume designer and layout optimization expert. Your task is to take the \
provided resume JSON and apply intelligent content adjustment so that it fits perfectly on \
a single page.\n\
\n\
## MASTER DIRECTIVE: ACHIEVE PERFECT SINGLE-PAGE FIT\n\
\n\
### PHASE 1: INTELLIGENT CONTENT ANALYSIS\n\
First, analyze the resume content and estimate its current length:\n\
- Count bullet points, skills and text density\n\
- Assess whether content is too dense, too sparse, or just right\n\
- Identify sections that can be condensed or expanded\n\
\n\
### PHASE 2: DYNAMIC ADJUSTMENT STRATEGY\n\
\n\
**If content is TOO LONG (estimated > 1 page):**\n\
- Condense experience: combine related achievements into fewer, more impactful bullet points\n\
- Trim project descriptions: keep essential details, remove redundant information\n\
- Consolidate skills: group related technical skills (e.g. \"JavaScript/TypeScript/React\")\n\
- Shorten the summary from 3 sentences to 2 while keeping keyword density\n\
- Keep the most recent and relevant 2-3 experiences/projects\n\
\n\
**If content is TOO SHORT (estimated < 0.75 page):**\n\
- Expand bullet points with quantifiable results and technical specifics\n\
- Enhance projects with more technical details and outcomes\n\
- Add relevant skills inferred from the existing experience\n\
- Elaborate education with relevant coursework and achievements\n\
\n\
**If content is JUST RIGHT:**\n\
- Make minor optimizations for better visual balance\n\
- Keep formatting and spacing consistent\n\
\n\
### PHASE 3: PATTERN-BASED OPTIMIZATION\n\
- Entry-level / recent graduates: prioritize Education and Projects\n\
- Career changers: highlight transferable skills and reposition experience\n\
- Experienced professionals: focus on quantified achievements, condense older roles\n\
\n\
### PHASE 4: VISUAL OPTIMIZATION\n\
- Keep bullet points a consistent length (2-3 lines each)\n\
- Balance section spacing\n\
- Maintain keyword density for ATS parsing\n\
- Use action verbs and quantifiable achievements\n\
\n\
{no_fabrication}\n\
\n\
## INPUT DATA\n\
- **Resume JSON:** {resume_json}\n\
{analysis_line}\
{measured_layout}\
\n\
## REQUIRED JSON OUTPUT\n\
Your response MUST be ONLY the optimized JSON object, adjusted for single-page display, \
with exactly this shape:\n\
{resume_schema}";

const ANALYSIS_LINE_TEMPLATE: &str = "- **Analysis Result:** {analysis_json}\n";

const MEASURED_LAYOUT_TEMPLATE: &str = "\
\n\
## MEASURED LAYOUT\n\
A local estimate of the rendered document (US Letter, 0.5\" margins):\n\
- Estimated pages: {page_count}\n\
- Space used: {space_used}%\n\
- Density: {density}\n\
{suggestion_lines}";

/// Builds the layout prompt. `analysis_json` is omitted from the prompt when absent.
pub fn build_layout_prompt(resume_json: &str, analysis_json: Option<&str>) -> String {
    render_layout_prompt(resume_json, analysis_json, "")
}

/// Like [`build_layout_prompt`], with the locally measured layout appended so the
/// model does not have to guess the current density.
pub fn build_layout_prompt_with_estimate(
    resume_json: &str,
    analysis_json: Option<&str>,
    estimate: &LayoutEstimate,
) -> String {
    let suggestion_lines: String = estimate
        .suggestions
        .iter()
        .map(|s| format!("- Suggested: {s}\n"))
        .collect();
    let page_count = format!("{:.2}", estimate.estimated_page_count);
    let space_used = format!("{:.0}", estimate.space_used_percentage);

    let measured = render_template(
        MEASURED_LAYOUT_TEMPLATE,
        &[
            ("page_count", page_count.as_str()),
            ("space_used", space_used.as_str()),
            ("density", estimate.density.label()),
            ("suggestion_lines", suggestion_lines.as_str()),
        ],
    );
    render_layout_prompt(resume_json, analysis_json, &measured)
}

fn render_layout_prompt(resume_json: &str, analysis_json: Option<&str>, measured: &str) -> String {
    let analysis_line = analysis_json
        .map(|json| render_template(ANALYSIS_LINE_TEMPLATE, &[("analysis_json", json)]))
        .unwrap_or_default();

    render_template(
        LAYOUT_PROMPT_TEMPLATE,
        &[
            ("no_fabrication", NO_FABRICATION_INSTRUCTION),
            ("resume_json", resume_json),
            ("analysis_line", analysis_line.as_str()),
            ("measured_layout", measured),
            ("resume_schema", RESUME_JSON_SCHEMA),
        ],
    )
}
