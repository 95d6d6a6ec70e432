//! Skill extraction. Turns document text into a normalized skill set.
//!
//! Primary path asks the language model with a kind-specific prompt. When that
//! yields nothing (including any model error) the text is scanned for a fixed
//! keyword list instead. Model failures never reach the caller.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::analysis::prompts::{JD_SKILLS_PROMPT_TEMPLATE, RESUME_SKILLS_PROMPT_TEMPLATE};
use crate::llm_client::{strip_code_fences, CompletionModel};

/// Section headings of the structured job description format.
const SKILL_HEADINGS: [&str; 2] = ["technical skills", "skills"];

/// Item separators within one line of model output.
const ITEM_SEPARATORS: &[char] = &[',', ';'];

pub const JD_FALLBACK_KEYWORDS: &[&str] = &[
    "Python",
    "Java",
    "Data Analysis",
    "Machine Learning",
    "Communication",
    "Problem-solving",
];

/// Superset of the JD list, so any keyword a JD can fall back to is also findable in a resume.
pub const RESUME_FALLBACK_KEYWORDS: &[&str] = &[
    "Python",
    "Java",
    "Data Analysis",
    "Machine Learning",
    "Communication",
    "Problem-solving",
    "SQL",
    "Networking",
    "Automation",
    "Project Management",
    "Leadership",
    "Teamwork",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    JobDescription,
    Resume,
}

impl DocumentKind {
    fn prompt(self, text: &str) -> String {
        let template = match self {
            DocumentKind::JobDescription => JD_SKILLS_PROMPT_TEMPLATE,
            DocumentKind::Resume => RESUME_SKILLS_PROMPT_TEMPLATE,
        };
        template.replace("{text}", text)
    }

    pub fn fallback_keywords(self) -> &'static [&'static str] {
        match self {
            DocumentKind::JobDescription => JD_FALLBACK_KEYWORDS,
            DocumentKind::Resume => RESUME_FALLBACK_KEYWORDS,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::JobDescription => f.write_str("job description"),
            DocumentKind::Resume => f.write_str("resume"),
        }
    }
}

/// Deduplicated, case-normalized set of skills.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(&normalize_skill(skill))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SkillSet(
            iter.into_iter()
                .map(|s| normalize_skill(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

/// Lowercases and collapses inner whitespace.
pub fn normalize_skill(skill: &str) -> String {
    skill
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub struct SkillExtractor {
    model: Arc<dyn CompletionModel>,
}

impl SkillExtractor {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub async fn extract(&self, text: &str, kind: DocumentKind) -> SkillSet {
        let primary = self.extract_with_model(text, kind).await;
        if !primary.is_empty() {
            return primary;
        }
        let fallback = keyword_fallback(text, kind);
        debug!(
            "Model returned no skills for {kind}; keyword fallback found {}",
            fallback.len()
        );
        fallback
    }

    async fn extract_with_model(&self, text: &str, kind: DocumentKind) -> SkillSet {
        match self.model.complete(&kind.prompt(text)).await {
            Ok(response) => parse_skill_lines(&response),
            Err(e) => {
                warn!("Skill extraction call failed for {kind}, using keyword fallback: {e}");
                SkillSet::default()
            }
        }
    }
}

/// Parses a model response into skills: one per line (commas and semicolons also
/// separate), list markers and heading lines dropped. A `Soft skills: X` style label
/// is removed from its line and the rest kept.
pub fn parse_skill_lines(response: &str) -> SkillSet {
    let lines: Vec<&str> = strip_code_fences(response)
        .lines()
        .map(strip_list_marker)
        .collect();
    let start = structured_heading(&lines).unwrap_or(0);
    lines[start..]
        .iter()
        .flat_map(|&line| {
            skills_label(line)
                .map_or(line, |(_, rest)| rest)
                .split(ITEM_SEPARATORS)
        })
        .map(strip_list_marker)
        .filter(|item| !item.is_empty() && !item.ends_with(':'))
        .collect()
}

/// Position of a `Skills:` heading when everything above it is `Label: value`
/// preamble. Any plain line above the heading means the whole response is the list.
fn structured_heading(lines: &[&str]) -> Option<usize> {
    let idx = lines.iter().position(|line| {
        skills_label(line).is_some_and(|(label, _)| {
            SKILL_HEADINGS.contains(&normalize_skill(label).as_str())
        })
    })?;
    lines[..idx]
        .iter()
        .filter(|line| !line.is_empty())
        .all(|line| line.contains(':'))
        .then_some(idx)
}

/// Splits `label: rest` when the label names a skills list ("Skills", "Soft skills").
fn skills_label(line: &str) -> Option<(&str, &str)> {
    let (label, rest) = line.split_once(':')?;
    normalize_skill(label)
        .ends_with("skills")
        .then_some((label, rest))
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(&['-', '*', '•'][..]).trim_start();
    // "1." / "12)" numbering
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return stripped.trim();
        }
    }
    line.trim()
}

/// Case-insensitive scan of `text` for the kind's fixed keyword list.
pub fn keyword_fallback(text: &str, kind: DocumentKind) -> SkillSet {
    let haystack = normalize_skill(text);
    kind.fallback_keywords()
        .iter()
        .filter(|keyword| haystack.contains(&normalize_skill(keyword)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;

    fn skills(items: &[&str]) -> SkillSet {
        items.iter().collect()
    }

    #[test]
    fn test_skill_set_dedupes_case_insensitively() {
        let set = skills(&["Python", "python", "  PYTHON ", "Machine   Learning"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("python"));
        assert!(set.contains("machine learning"));
    }

    #[test]
    fn test_skill_set_drops_blank_entries() {
        assert!(skills(&["", "   "]).is_empty());
    }

    #[test]
    fn test_parse_lines_trims_and_strips_markers() {
        let parsed = parse_skill_lines("- Python\n* SQL\n• Docker\n1. Kubernetes\n2) Go\n\n");
        assert_eq!(parsed, skills(&["python", "sql", "docker", "kubernetes", "go"]));
    }

    #[test]
    fn test_parse_takes_section_after_skills_heading() {
        let response = "Role: Backend Engineer\nLocation: Remote\nTechnical Skills:\n- Rust\n- PostgreSQL";
        assert_eq!(parse_skill_lines(response), skills(&["rust", "postgresql"]));
    }

    #[test]
    fn test_parse_plain_skills_heading() {
        let response = "Role: Data Engineer\nSkills: Python, Networking";
        assert_eq!(parse_skill_lines(response), skills(&["python", "networking"]));
    }

    #[test]
    fn test_parse_drops_sub_headings() {
        let response = "Hard skills:\nRust\nSoft skills:\nCommunication";
        // Sub-headings are labels, not cutoffs.
        let parsed = parse_skill_lines(response);
        assert!(parsed.contains("rust"));
        assert!(parsed.contains("communication"));
        assert!(!parsed.iter().any(|s| s.ends_with(':')));
    }

    #[test]
    fn test_parse_keeps_skills_above_inline_label() {
        let parsed = parse_skill_lines("Python\nSQL\nSoft skills: Communication");
        assert_eq!(parsed, skills(&["python", "sql", "communication"]));
    }

    #[test]
    fn test_parse_heading_after_plain_lines_is_not_a_cutoff() {
        let parsed = parse_skill_lines("Summary of the role\nSkills: Python");
        assert!(parsed.contains("python"));
        assert!(parsed.contains("summary of the role"));
    }

    #[test]
    fn test_parse_handles_code_fences() {
        assert_eq!(
            parse_skill_lines("```\nPython\nSQL\n```"),
            skills(&["python", "sql"])
        );
    }

    #[test]
    fn test_keyword_fallback_is_case_insensitive() {
        let found = keyword_fallback(
            "We need strong PYTHON and machine learning chops, plus problem-solving.",
            DocumentKind::JobDescription,
        );
        assert_eq!(
            found,
            skills(&["python", "machine learning", "problem-solving"])
        );
    }

    #[test]
    fn test_keyword_lists_differ_by_kind() {
        let text = "Networking and automation";
        assert!(keyword_fallback(text, DocumentKind::JobDescription).is_empty());
        assert_eq!(
            keyword_fallback(text, DocumentKind::Resume),
            skills(&["networking", "automation"])
        );
    }

    #[test]
    fn test_resume_keywords_cover_jd_keywords() {
        for keyword in JD_FALLBACK_KEYWORDS {
            assert!(RESUME_FALLBACK_KEYWORDS.contains(keyword), "{keyword}");
        }
    }

    #[tokio::test]
    async fn test_primary_result_wins_over_fallback() {
        let extractor = SkillExtractor::new(Arc::new(FixedModel("Rust\nTokio")));
        let found = extractor
            .extract("Python developer", DocumentKind::Resume)
            .await;
        assert_eq!(found, skills(&["rust", "tokio"]));
    }

    #[tokio::test]
    async fn test_empty_primary_triggers_fallback() {
        let extractor = SkillExtractor::new(Arc::new(FixedModel("  \n\n")));
        let found = extractor
            .extract("Python developer", DocumentKind::Resume)
            .await;
        assert_eq!(found, skills(&["python"]));
    }

    #[tokio::test]
    async fn test_model_error_is_swallowed_and_falls_back() {
        let extractor = SkillExtractor::new(Arc::new(FailingModel));
        let found = extractor
            .extract("Java and communication", DocumentKind::JobDescription)
            .await;
        assert_eq!(found, skills(&["java", "communication"]));
    }

    #[tokio::test]
    async fn test_nothing_found_anywhere_is_empty() {
        let extractor = SkillExtractor::new(Arc::new(FailingModel));
        let found = extractor
            .extract("Must enjoy sailing.", DocumentKind::JobDescription)
            .await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_is_kind_specific() {
        let model = Arc::new(EchoSkillsModel::default());
        let extractor = SkillExtractor::new(model.clone());
        let found = extractor
            .extract("skill: Rust\nskill: rust", DocumentKind::JobDescription)
            .await;
        assert_eq!(found, skills(&["rust"]));
        assert!(DocumentKind::JobDescription
            .prompt("x")
            .contains("Job description:"));
        assert!(DocumentKind::Resume.prompt("x").contains("Resume:"));
    }
}
