//! Rule-based replies for free-text chat.

/// Checked in this order; the first keyword contained in the message wins.
pub const KEYWORD_ADVICE: &[(&str, &str)] = &[
    (
        "resume",
        "Focus on quantifiable achievements, use action verbs, and tailor your resume to the job description.",
    ),
    (
        "interview",
        "Research the company, practice the STAR method, and prepare questions to ask the interviewer.",
    ),
    (
        "networking",
        "Attend industry events, join LinkedIn groups, and follow up with contacts regularly.",
    ),
    (
        "skill",
        "Take online courses on platforms like Coursera or edX to develop in-demand skills.",
    ),
];

pub const FALLBACK_PROMPT: &str = "Ask about resume tips, interviews, or skills!";

/// Case-insensitive substring match against `KEYWORD_ADVICE`.
pub fn advice_for(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    KEYWORD_ADVICE
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, advice)| *advice)
        .unwrap_or(FALLBACK_PROMPT)
}
