//! Skill-profile aggregation: reduces a self-assessment to the three features
//! the career classifier was trained on.

use std::collections::HashMap;

pub const TECHNICAL_SKILLS: [&str; 5] = [
    "programming",
    "data-analysis",
    "web-development",
    "security",
    "cloud",
];

pub const SOFT_SKILLS: [&str; 5] = [
    "communication",
    "leadership",
    "problem-solving",
    "teamwork",
    "adaptability",
];

/// Enumeration order matters: ties resolve to the earliest entry.
pub const INDUSTRIES: [&str; 5] = [
    "healthcare",
    "finance",
    "technology",
    "marketing",
    "education",
];

pub const DEFAULT_INDUSTRY: &str = "technology";

/// Per-request skill ratings keyed by skill name. Absent skills count as 0.
#[derive(Debug, Clone, Default)]
pub struct SkillProfile {
    scores: HashMap<String, f64>,
}

/// Classifier input derived from a `SkillProfile`.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillFeatures {
    pub technical_score: f64,
    pub soft_score: f64,
    pub industry: &'static str,
}

impl SkillProfile {
    /// Wraps raw scores without range checks.
    pub fn new(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    /// Builds a profile from a request payload. Every known skill or industry
    /// rating must be finite and non-negative (no upper bound); unknown keys are dropped.
    pub fn from_payload(raw: HashMap<String, f64>) -> Result<Self, String> {
        let mut scores = HashMap::with_capacity(raw.len());

        for (name, score) in raw {
            if !is_known_key(&name) {
                continue;
            }
            if !score.is_finite() || score < 0.0 {
                return Err(format!(
                    "skill '{name}' must be a non-negative number, got {score}"
                ));
            }
            scores.insert(name, score);
        }

        Ok(Self::new(scores))
    }

    pub fn score(&self, name: &str) -> f64 {
        self.scores.get(name).copied().unwrap_or(0.0)
    }

    pub fn technical_score(&self) -> f64 {
        self.mean_of(&TECHNICAL_SKILLS)
    }

    pub fn soft_score(&self) -> f64 {
        self.mean_of(&SOFT_SKILLS)
    }

    /// The highest-rated industry, or `DEFAULT_INDUSTRY` when none is rated above zero.
    pub fn top_industry(&self) -> &'static str {
        let mut best: Option<(&'static str, f64)> = None;

        for industry in INDUSTRIES {
            let score = self.score(industry);
            if score <= 0.0 {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((industry, score)),
            }
        }

        best.map(|(industry, _)| industry).unwrap_or(DEFAULT_INDUSTRY)
    }

    pub fn features(&self) -> SkillFeatures {
        SkillFeatures {
            technical_score: self.technical_score(),
            soft_score: self.soft_score(),
            industry: self.top_industry(),
        }
    }

    fn mean_of(&self, names: &[&str]) -> f64 {
        let total: f64 = names.iter().map(|n| self.score(n)).sum();
        total / names.len() as f64
    }
}

fn is_known_key(name: &str) -> bool {
    TECHNICAL_SKILLS.contains(&name)
        || SOFT_SKILLS.contains(&name)
        || INDUSTRIES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(pairs: &[(&str, f64)]) -> SkillProfile {
        SkillProfile::new(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn test_technical_score_treats_missing_as_zero() {
        let p = profile(&[("programming", 10.0), ("security", 5.0)]);
        assert!((p.technical_score() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_soft_score_mean() {
        let p = profile(&[
            ("communication", 5.0),
            ("leadership", 4.0),
            ("problem-solving", 3.0),
            ("teamwork", 2.0),
            ("adaptability", 1.0),
        ]);
        assert!((p.soft_score() - 3.0).abs() < f64::EPSILON);
        assert_eq!(p.technical_score(), 0.0);
    }

    #[test]
    fn test_empty_profile_scores_zero() {
        let p = SkillProfile::default();
        assert_eq!(p.technical_score(), 0.0);
        assert_eq!(p.soft_score(), 0.0);
    }

    #[test]
    fn test_top_industry_picks_maximum() {
        let p = profile(&[("finance", 2.0), ("education", 4.0), ("marketing", 3.0)]);
        assert_eq!(p.top_industry(), "education");
    }

    #[test]
    fn test_top_industry_defaults_when_all_zero() {
        let p = profile(&[
            ("healthcare", 0.0),
            ("finance", 0.0),
            ("technology", 0.0),
            ("marketing", 0.0),
            ("education", 0.0),
        ]);
        assert_eq!(p.top_industry(), "technology");
    }

    #[test]
    fn test_top_industry_defaults_when_absent() {
        assert_eq!(profile(&[("programming", 5.0)]).top_industry(), "technology");
    }

    #[test]
    fn test_top_industry_tie_goes_to_first_in_order() {
        let p = profile(&[("education", 4.0), ("finance", 4.0), ("healthcare", 1.0)]);
        assert_eq!(p.top_industry(), "finance");
    }

    #[test]
    fn test_from_payload_drops_unknown_keys() {
        let raw = HashMap::from([("juggling".to_string(), 99.0), ("cloud".to_string(), 5.0)]);
        let p = SkillProfile::from_payload(raw).unwrap();
        assert_eq!(p.score("juggling"), 0.0);
        assert_eq!(p.score("cloud"), 5.0);
    }

    #[test]
    fn test_from_payload_accepts_scores_above_five() {
        let raw = HashMap::from([
            ("programming".to_string(), 10.0),
            ("security".to_string(), 5.0),
        ]);
        let p = SkillProfile::from_payload(raw).unwrap();
        assert!((p.technical_score() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_payload_rejects_negative() {
        let raw = HashMap::from([("finance".to_string(), -1.0)]);
        let err = SkillProfile::from_payload(raw).unwrap_err();
        assert!(err.contains("finance"));
    }

    #[test]
    fn test_from_payload_rejects_non_finite() {
        let raw = HashMap::from([("cloud".to_string(), f64::INFINITY)]);
        assert!(SkillProfile::from_payload(raw).is_err());
    }

    #[test]
    fn test_full_marks_average_to_five() {
        let raw: HashMap<String, f64> = TECHNICAL_SKILLS
            .iter()
            .chain(SOFT_SKILLS.iter())
            .map(|s| (s.to_string(), 5.0))
            .collect();
        let p = SkillProfile::from_payload(raw).unwrap();
        assert_eq!(p.technical_score(), 5.0);
        assert_eq!(p.soft_score(), 5.0);
    }

    #[test]
    fn test_features_bundle() {
        let p = profile(&[("programming", 5.0), ("healthcare", 3.0)]);
        let f = p.features();
        assert_eq!(f.technical_score, 1.0);
        assert_eq!(f.soft_score, 0.0);
        assert_eq!(f.industry, "healthcare");
    }
}
