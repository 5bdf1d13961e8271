//! Practice problems. Read-only once seeded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemExample {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// 1 (easy) to 5 (expert).
    pub difficulty: u8,
    #[serde(default)]
    pub examples: Vec<ProblemExample>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub concept_ids: Vec<String>,
}

impl Problem {
    pub fn summary(&self) -> ProblemSummary {
        ProblemSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            difficulty: self.difficulty,
            difficulty_label: difficulty_label(self.difficulty).to_string(),
            constraints: self.constraints.clone(),
            concept_ids: self.concept_ids.clone(),
        }
    }

    pub fn covers(&self, concept_id: &str) -> bool {
        self.concept_ids.iter().any(|c| c == concept_id)
    }
}

/// List view of a problem: everything but the worked examples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: u8,
    pub difficulty_label: String,
    pub constraints: Vec<String>,
    pub concept_ids: Vec<String>,
}

pub fn difficulty_label(difficulty: u8) -> &'static str {
    match difficulty {
        0 | 1 => "Easy",
        2 => "Medium",
        3 => "Medium-Hard",
        4 => "Hard",
        _ => "Expert",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_drops_examples() {
        let p = Problem {
            id: "p01".into(),
            title: "Two Sum".into(),
            description: "find two".into(),
            difficulty: 3,
            examples: vec![ProblemExample { input: "1".into(), output: "2".into(), explanation: None }],
            constraints: vec![],
            concept_ids: vec!["c02".into()],
        };
        let json = serde_json::to_value(p.summary()).unwrap();
        assert!(json.get("examples").is_none());
        assert_eq!(json["difficulty_label"], "Medium-Hard");
        assert!(p.covers("c02"));
    }
}
