use serde::{Deserialize, Serialize};

/// Skill score at or above which a concept counts as mastered.
pub const MASTERED_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    Mastered,
    Learning,
    Gap,
    Untouched,
}

impl MasteryStatus {
    /// A listed gap wins over any recorded score.
    pub fn derive(skill: Option<f64>, is_gap: bool) -> Self {
        if is_gap {
            return MasteryStatus::Gap;
        }
        match skill {
            Some(s) if s >= MASTERED_THRESHOLD => MasteryStatus::Mastered,
            Some(_) => MasteryStatus::Learning,
            None => MasteryStatus::Untouched,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryStatus::Mastered => "mastered",
            MasteryStatus::Learning => "learning",
            MasteryStatus::Gap => "gap",
            MasteryStatus::Untouched => "untouched",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive() {
        assert_eq!(MasteryStatus::derive(Some(0.7), false), MasteryStatus::Mastered);
        assert_eq!(MasteryStatus::derive(Some(0.69), false), MasteryStatus::Learning);
        assert_eq!(MasteryStatus::derive(Some(0.95), true), MasteryStatus::Gap);
        assert_eq!(MasteryStatus::derive(None, false), MasteryStatus::Untouched);
    }
}
