//! Prompt construction for vision generation.
//!
//! [`build_prompt`] turns a stored submission into the user message sent to
//! the text-generation service. It is a pure function of the submission and
//! the date it is given: the same inputs always produce the same prompt.
//!
//! Dates are rendered as month and year only (`October 2026`). The prompt
//! mentions exactly two of them, today and one year from today, and asks the
//! model never to use day-level dates, so neither document can leak a
//! day-of-month.

use std::fmt;

use jiff::{civil::Date, ToSpan, Zoned};

use crate::{
    models::VisionSubmission,
    parser::{ACTION_PLAN_HEADER, NARRATIVE_HEADER},
};

/// Fixed system instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are an experienced life and business coach who helps people turn \
aspirations into a vivid personal vision and a realistic plan. You write warmly and concretely, in \
plain language, without hype. You always follow the requested output format exactly.";

/// Number of monthly sections the action plan must contain.
pub const PLAN_MONTHS: u32 = 12;

/// Formats a date as `Month Year`, the only date granularity allowed in
/// prompts and generated documents.
pub fn month_year(date: Date) -> String {
    date.strftime("%B %Y").to_string()
}

/// Builds the generation prompt using today's date in the system time zone.
pub fn build_prompt_now(submission: &VisionSubmission) -> String {
    build_prompt(submission, Zoned::now().date())
}

/// Builds the generation prompt for `submission` as of `today`.
pub fn build_prompt(submission: &VisionSubmission, today: Date) -> String {
    VisionPrompt { submission, today }.to_string()
}

/// The user message for one submission, rendered through [`fmt::Display`].
struct VisionPrompt<'a> {
    submission: &'a VisionSubmission,
    today: Date,
}

impl fmt::Display for VisionPrompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let submission = self.submission;
        let vision_date = self.today.checked_add(1.year()).unwrap_or(self.today);

        writeln!(
            f,
            "Create a personal vision and a 12-month action plan for {} in the area of {}.",
            submission.name,
            submission.area_of_life.label()
        )?;
        writeln!(f)?;
        writeln!(f, "Today: {}", month_year(self.today))?;
        writeln!(f, "Vision date (one year from today): {}", month_year(vision_date))?;
        writeln!(f)?;

        writeln!(f, "WHO THEY WANT TO BE:")?;
        if submission.being_words.is_empty() {
            writeln!(f, "(none provided)")?;
        } else {
            writeln!(f, "{}", submission.being_words.join(", "))?;
        }
        writeln!(f)?;

        writeln!(f, "WHAT THEY WANT TO BE DOING:")?;
        fmt_bullets(f, &submission.doing_actions)?;
        writeln!(f)?;

        writeln!(f, "WHAT THEY WANT TO HAVE:")?;
        fmt_bullets(f, &submission.having_outcomes)?;

        if let Some(reality) = present(submission.current_reality.as_deref()) {
            writeln!(f)?;
            writeln!(f, "Current Reality:\n{reality}")?;
        }

        if let Some(why) = present(submission.why_important.as_deref()) {
            writeln!(f)?;
            writeln!(f, "Why This Matters:\n{why}")?;
        }

        writeln!(f)?;
        fmt_instructions(f)
    }
}

fn fmt_bullets(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "(none provided)");
    }
    for item in items {
        writeln!(f, "- {item}")?;
    }
    Ok(())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn fmt_instructions(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "OUTPUT FORMAT:")?;
    writeln!(
        f,
        "Write exactly two documents. Start the first with the line \"{NARRATIVE_HEADER}\" and the \
second with the line \"{ACTION_PLAN_HEADER}\". Write nothing before the first header."
    )?;
    writeln!(f)?;

    writeln!(f, "{NARRATIVE_HEADER}")?;
    writeln!(
        f,
        "A vision narrative of 400 to 600 words, written in the first person and present tense, \
as if the vision date has already arrived. Describe a typical day that shows who they are being, \
what they are doing and what they now have. Make it specific and emotionally real."
    )?;
    writeln!(f)?;

    writeln!(f, "{ACTION_PLAN_HEADER}")?;
    writeln!(
        f,
        "Exactly {PLAN_MONTHS} monthly sections in chronological order, moving forward from today."
    )?;
    writeln!(
        f,
        "- Month 1 starts from where they are right now: the immediate next steps from their \
current reality."
    )?;
    writeln!(
        f,
        "- Month {PLAN_MONTHS} is the month the stated vision is fully realized."
    )?;
    writeln!(
        f,
        "- Head each section \"MONTH N: <theme>\" followed by 3 to 5 bullet points, one concrete \
action each."
    )?;
    writeln!(
        f,
        "- Pace the plan realistically: small habits and foundations in months 1 to 3, building \
momentum in months 4 to 8, consolidation and stretch goals in months 9 to 12."
    )?;
    writeln!(
        f,
        "- Refer to time only as month numbers or as month and year. Never mention a \
day of the month, a weekday date or a time of day."
    )
}
