//! Overlap scoring between a job description's skills and a resume's skills.
//!
//! The score is a containment ratio with the job description as denominator:
//! how much of what the role asks for does the resume cover. It is deliberately
//! not symmetric (not Jaccard).

use std::collections::HashSet;

use crate::analysis::skills::normalize_skill;

/// Percentage (0–100, two decimals) of job-description skills present in the resume.
/// Either side being empty scores `0.0`.
pub fn skill_overlap<J, R>(jd_skills: J, resume_skills: R) -> f64
where
    J: IntoIterator,
    J::Item: AsRef<str>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    let jd: HashSet<String> = normalized(jd_skills);
    let resume: HashSet<String> = normalized(resume_skills);

    if jd.is_empty() || resume.is_empty() {
        return 0.0;
    }

    let covered = jd.intersection(&resume).count();
    round2(covered as f64 / jd.len() as f64 * 100.0)
}

/// A resume matches when its overlap reaches the threshold (inclusive).
pub fn is_match(overlap: f64, threshold: f64) -> bool {
    overlap >= threshold
}

fn normalized<I>(skills: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| normalize_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::skills::SkillSet;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_empty_jd_scores_zero() {
        assert_eq!(skill_overlap(NONE, ["python"]), 0.0);
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        assert_eq!(skill_overlap(["python"], NONE), 0.0);
        assert_eq!(skill_overlap(NONE, NONE), 0.0);
    }

    #[test]
    fn test_full_coverage_is_hundred_case_insensitive() {
        assert_eq!(
            skill_overlap(["Python", "SQL"], ["sql", "PYTHON", "Docker"]),
            100.0
        );
    }

    #[test]
    fn test_overlap_is_asymmetric() {
        assert_eq!(skill_overlap(["A", "B"], ["A"]), 50.0);
        assert_eq!(skill_overlap(["A"], ["A", "B"]), 100.0);
    }

    #[test]
    fn test_mixed_case_example() {
        let overlap = skill_overlap(["Python", "Networking"], ["python", "Automation"]);
        assert_eq!(overlap, 50.0);
        assert!(is_match(overlap, 50.0));
        assert!(is_match(overlap, 40.0));
        assert!(!is_match(overlap, 50.01));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(skill_overlap(["a", "b", "c"], ["a"]), 33.33);
        assert_eq!(skill_overlap(["a", "b", "c"], ["a", "b"]), 66.67);
    }

    #[test]
    fn test_duplicate_jd_skills_count_once() {
        assert_eq!(skill_overlap(["Rust", "rust", "Go"], ["rust"]), 50.0);
    }

    #[test]
    fn test_accepts_skill_sets() {
        let jd: SkillSet = ["Rust", "Tokio"].iter().collect();
        let resume: SkillSet = ["rust"].iter().collect();
        assert_eq!(skill_overlap(jd.iter(), resume.iter()), 50.0);
    }
}
