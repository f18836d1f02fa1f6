/// The parts of a portfolio project that get explained to a visitor.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProjectBrief {
    pub title: String,
    pub problem: String,
    pub process: String,
    pub findings: String,
}

impl ProjectBrief {
    pub fn new(
        title: impl Into<String>,
        problem: impl Into<String>,
        process: impl Into<String>,
        findings: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            problem: problem.into(),
            process: process.into(),
            findings: findings.into(),
        }
    }
}

/// Builds the plain-language tutor prompt for a project.
pub fn explanation_prompt(project: &ProjectBrief) -> String {
    format!(
        "You are a helpful and friendly data science tutor.\n\
         A user wants a simple explanation of the following project.\n\
         Explain it in 2-3 concise, easy-to-understand sentences. Avoid technical jargon.\n\
         \n\
         Project Title: {}\n\
         Problem: {}\n\
         Process: {}\n\
         Findings: {}",
        project.title.trim(),
        project.problem.trim(),
        project.process.trim(),
        project.findings.trim(),
    )
}
