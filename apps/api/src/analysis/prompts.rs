/// Prompt for skills required by a job description.
pub const JD_SKILLS_PROMPT_TEMPLATE: &str = r#"Read the job description below and list the skills a candidate must have for this role.

Rules:
- Include technical skills, tools, languages, frameworks and named soft skills.
- Use the shortest common name for each skill (e.g. "Python", not "Python programming").
- One skill per line. No bullets, no numbering, no commentary.

Job description:
{text}
"#;

/// Prompt for skills demonstrated in a resume.
pub const RESUME_SKILLS_PROMPT_TEMPLATE: &str = r#"Read the resume below and list the key skills the candidate has.

Rules:
- Include technical skills, tools, languages, frameworks and named soft skills.
- Use the shortest common name for each skill (e.g. "Python", not "Python programming").
- One skill per line. No bullets, no numbering, no commentary.

Resume:
{text}
"#;
