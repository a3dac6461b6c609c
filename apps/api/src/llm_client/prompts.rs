// Prompt constants for resume tailoring.
// The response shape itself is enforced by `schema::optimization_response_schema`.

/// Fixed system instruction sent with every tailoring request.
pub const RESUME_TAILOR_SYSTEM: &str = "\
You are an expert Resume Writer and Career Coach specialized in ATS optimization.

CRITICAL FORMATTING RULES:
1. NO PROFESSIONAL SUMMARY: Do not include a profile summary or objective statement. \
Start directly with Professional Experience or Skills.
2. Experience Headers: You MUST use this exact format:
   ### Job Title, Company Name | Date Range
3. Consistent Layout: Use standard Markdown (bullet points, bolding).
4. Highlighting: For every \"change\" you list in the analysis, you must provide the exact \
text snippet (quote) copied verbatim from the rewritten resume so it can be highlighted programmatically.

TASK:
1. Analyze the Job Description (JD).
2. Rewrite the Resume to target the JD.
3. Generate a formal Cover Letter (PDF ready).
4. Generate a short, punchy Email Intro (for pasting into an email body).
5. Analyze changes.";

/// Per-job text part. `{job_description}` is replaced with the user's text.
pub const JOB_PROMPT_TEMPLATE: &str = "\
TARGET JOB DESCRIPTION:
{job_description}

REQUIREMENTS:
1. Rewrite resume (NO SUMMARY).
2. Extract job URL if present.
3. List changes with specific reasons and the EXACT quote from the new resume.
4. Write a formal Cover Letter.
5. Write a short application email body.";

pub fn job_prompt(job_description: &str) -> String {
    JOB_PROMPT_TEMPLATE.replace("{job_description}", job_description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_prompt_embeds_description() {
        let prompt = job_prompt("Backend Engineer at Acme");
        assert!(prompt.contains("TARGET JOB DESCRIPTION:\nBackend Engineer at Acme"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_system_instruction_requires_verbatim_quotes() {
        assert!(RESUME_TAILOR_SYSTEM.contains("verbatim"));
        assert!(RESUME_TAILOR_SYSTEM.contains("### Job Title, Company Name | Date Range"));
    }
}
