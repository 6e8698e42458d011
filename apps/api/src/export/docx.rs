//! StructuredResume → `.docx` bytes.
//!
//! The document is first planned as a flat list of [`Block`]s (one per paragraph)
//! and then rendered with `docx-rs`. Sections appear in a fixed order and are
//! skipped entirely when empty:
//!
//! header → summary → core skills → work experience → projects → education →
//! certifications → secondary skills → awards and honors → languages →
//! additional information
//!
//! Sizes are half-points, spacing and indents are twips. Page margins are 0.5".

use std::io::Cursor;

use bytes::Bytes;
use docx_rs::{AlignmentType, Docx, LineSpacing, PageMargin, Paragraph, Run};

use crate::export::ExportError;
use crate::models::resume::StructuredResume;

const PAGE_MARGIN: i32 = 720;
const BULLET_INDENT: i32 = 360;
const BULLET: &str = "\u{2022}";

const NAME_SIZE: usize = 36;
const TITLE_SIZE: usize = 22;
const CONTACT_SIZE: usize = 20;
const HEADING_SIZE: usize = 24;
const ITEM_SIZE: usize = 22;
const DETAIL_SIZE: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    /// `<base>.docx`
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Justified,
}

#[derive(Debug, Clone, PartialEq)]
struct TextSpan {
    text: String,
    bold: bool,
    italic: bool,
    /// Half-points; `None` keeps the document default.
    size: Option<usize>,
}

impl TextSpan {
    fn plain(text: impl Into<String>, size: Option<usize>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            size,
        }
    }

    fn bold(text: impl Into<String>, size: usize) -> Self {
        Self {
            bold: true,
            ..Self::plain(text, Some(size))
        }
    }

    fn italic(text: impl Into<String>, size: usize) -> Self {
        Self {
            italic: true,
            ..Self::plain(text, Some(size))
        }
    }
}

/// One planned paragraph.
#[derive(Debug, Clone, PartialEq)]
struct Block {
    spans: Vec<TextSpan>,
    align: Align,
    space_after: u32,
    indent_left: Option<i32>,
}

impl Block {
    fn new(spans: Vec<TextSpan>, space_after: u32) -> Self {
        Self {
            spans,
            align: Align::Left,
            space_after,
            indent_left: None,
        }
    }

    fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

/// Renders `resume` as a Word document named `<file_base_name>.docx`.
pub fn export_document(
    resume: &StructuredResume,
    file_base_name: &str,
) -> Result<ExportedDocument, ExportError> {
    let blocks = plan_document(resume);
    let docx = blocks
        .iter()
        .fold(
            Docx::new().page_margin(
                PageMargin::new()
                    .top(PAGE_MARGIN)
                    .bottom(PAGE_MARGIN)
                    .left(PAGE_MARGIN)
                    .right(PAGE_MARGIN),
            ),
            |doc, block| doc.add_paragraph(render_block(block)),
        );

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Build(e.to_string()))?;

    Ok(ExportedDocument {
        file_name: format!("{}.docx", sanitize_file_base_name(file_base_name)),
        bytes: Bytes::from(buffer.into_inner()),
    })
}

/// `Jane Q Doe` → `Jane_Q_Doe_Resume`.
pub fn default_file_base_name(resume: &StructuredResume) -> String {
    let name = resume
        .header
        .name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{name}_Resume")
    }
}

/// Keeps a caller-supplied base name safe for a `Content-Disposition` header.
fn sanitize_file_base_name(base: &str) -> String {
    let base = base.trim().trim_end_matches(".docx");
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "Resume".to_string()
    } else {
        cleaned
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Planning
// ────────────────────────────────────────────────────────────────────────────

fn heading(text: &str) -> Block {
    Block::new(vec![TextSpan::bold(text, HEADING_SIZE)], 80)
}

fn bullet(text: &str) -> Block {
    let stripped = text.trim_start().trim_start_matches(BULLET).trim_start();
    Block {
        indent_left: Some(BULLET_INDENT),
        ..Block::new(vec![TextSpan::plain(format!("{BULLET} {stripped}"), None)], 60)
    }
}

fn detail(text: &str, space_after: u32) -> Block {
    Block::new(vec![TextSpan::plain(text, Some(DETAIL_SIZE))], space_after)
}

fn item_title(text: &str) -> Block {
    Block::new(vec![TextSpan::bold(text, ITEM_SIZE)], 60)
}

fn plan_document(resume: &StructuredResume) -> Vec<Block> {
    let mut blocks = Vec::new();

    let header = &resume.header;
    blocks.push(Block::new(vec![TextSpan::bold(&header.name, NAME_SIZE)], 40).aligned(Align::Center));
    if !header.title.trim().is_empty() {
        blocks.push(
            Block::new(vec![TextSpan::plain(&header.title, Some(TITLE_SIZE))], 80)
                .aligned(Align::Center),
        );
    }
    let contact = header.contact.display_line();
    if !contact.is_empty() {
        blocks.push(
            Block::new(vec![TextSpan::plain(contact, Some(CONTACT_SIZE))], 180).aligned(Align::Center),
        );
    }

    if !resume.professional_summary.trim().is_empty() {
        blocks.push(heading("PROFESSIONAL SUMMARY"));
        blocks.push(
            Block::new(vec![TextSpan::plain(&resume.professional_summary, None)], 180)
                .aligned(Align::Justified),
        );
    }

    let skills = &resume.core_skills;
    if !skills.is_empty() {
        blocks.push(heading("CORE SKILLS"));
        if !skills.technical.is_empty() {
            blocks.push(Block::new(
                vec![
                    TextSpan::bold("Technical: ", ITEM_SIZE),
                    TextSpan::plain(skills.technical.join(", "), Some(ITEM_SIZE)),
                ],
                120,
            ));
        }
        if !skills.soft.is_empty() {
            blocks.push(Block::new(
                vec![
                    TextSpan::bold("Soft Skills: ", ITEM_SIZE),
                    TextSpan::plain(skills.soft.join(", "), Some(ITEM_SIZE)),
                ],
                180,
            ));
        }
    }

    if !resume.work_experience.is_empty() {
        blocks.push(heading("WORK EXPERIENCE"));
        for role in &resume.work_experience {
            blocks.push(item_title(&role.title));
            blocks.push(Block::new(
                vec![
                    TextSpan::plain(&role.company, Some(DETAIL_SIZE)),
                    TextSpan::italic(format!("    {}", role.duration), DETAIL_SIZE),
                ],
                120,
            ));
            blocks.extend(role.achievements.iter().map(|a| bullet(a)));
            blocks.push(Block::new(Vec::new(), 120));
        }
    }

    if !resume.projects.is_empty() {
        blocks.push(heading("PROJECTS"));
        for project in &resume.projects {
            blocks.push(item_title(&project.title));
            if !project.technologies.is_empty() {
                blocks.push(Block::new(
                    vec![TextSpan::italic(
                        format!("Technologies: {}", project.technologies.join(", ")),
                        DETAIL_SIZE,
                    )],
                    120,
                ));
            }
            blocks.push(Block::new(vec![TextSpan::plain(&project.description, None)], 120));
        }
    }

    if !resume.education.is_empty() {
        blocks.push(heading("EDUCATION"));
        for education in &resume.education {
            blocks.push(item_title(&education.degree));
            blocks.push(detail(&education.institution, 60));
            blocks.push(detail(&education.year, 60));
            if !education.relevant_coursework.is_empty() {
                blocks.push(detail(
                    &format!(
                        "Relevant Coursework: {}",
                        education.relevant_coursework.join(", ")
                    ),
                    120,
                ));
            }
        }
    }

    if !resume.certifications.is_empty() {
        blocks.push(heading("CERTIFICATIONS"));
        for cert in &resume.certifications {
            blocks.push(item_title(&cert.name));
            blocks.push(detail(&cert.issuing_organization, 60));
            blocks.push(detail(&cert.year, 120));
        }
    }

    if !resume.secondary_skills.is_empty() {
        blocks.push(heading("SECONDARY SKILLS"));
        blocks.push(Block::new(
            vec![TextSpan::plain(resume.secondary_skills.join(", "), Some(ITEM_SIZE))],
            180,
        ));
    }

    if !resume.awards_and_honors.is_empty() {
        blocks.push(heading("AWARDS AND HONORS"));
        for award in &resume.awards_and_honors {
            blocks.push(item_title(&award.name));
            blocks.push(detail(&award.organization, 60));
            blocks.push(detail(&award.year, 120));
        }
    }

    if !resume.languages.is_empty() {
        blocks.push(heading("LANGUAGES"));
        for language in &resume.languages {
            blocks.push(Block::new(
                vec![
                    TextSpan::bold(format!("{}: ", language.language), ITEM_SIZE),
                    TextSpan::plain(&language.proficiency, Some(ITEM_SIZE)),
                ],
                120,
            ));
        }
    }

    let additional: Vec<_> = resume.present_additional_sections().collect();
    if !additional.is_empty() {
        blocks.push(heading("ADDITIONAL INFORMATION"));
        for section in additional {
            blocks.push(item_title(&section.title));
            blocks.push(Block::new(vec![TextSpan::plain(&section.content, None)], 120));
        }
    }

    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

fn render_block(block: &Block) -> Paragraph {
    let paragraph = block.spans.iter().fold(Paragraph::new(), |p, span| {
        let mut run = Run::new().add_text(span.text.as_str());
        if span.bold {
            run = run.bold();
        }
        if span.italic {
            run = run.italic();
        }
        if let Some(size) = span.size {
            run = run.size(size);
        }
        p.add_run(run)
    });

    let paragraph = paragraph.line_spacing(LineSpacing::new().after(block.space_after));
    let paragraph = match block.align {
        Align::Left => paragraph,
        Align::Center => paragraph.align(AlignmentType::Center),
        Align::Justified => paragraph.align(AlignmentType::Both),
    };
    match block.indent_left {
        Some(left) => paragraph.indent(Some(left), None, None, None),
        None => paragraph,
    }
}
