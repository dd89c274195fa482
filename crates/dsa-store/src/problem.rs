//! Solved-problem summaries as returned by the problem proxies.

use serde::{Deserialize, Serialize};

/// Judge a problem or summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemSource {
    #[serde(rename = "leetcode")]
    LeetCode,
    Codeforces,
}

impl ProblemSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemSource::LeetCode => "leetcode",
            ProblemSource::Codeforces => "codeforces",
        }
    }

    /// Cache key for one user's solved summary on this judge.
    pub fn solved_key(&self, user: &str) -> String {
        format!("{}-solved:{}", self.as_str(), user)
    }
}

impl std::fmt::Display for ProblemSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem identified on a specific judge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemRef {
    pub source: ProblemSource,
    /// Judge-native id: LeetCode number or Codeforces `contestId-index`
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ProblemRef {
    pub fn new(source: ProblemSource, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Solved-problem summary for one user on one judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedSummary {
    pub success: bool,
    #[serde(default)]
    pub solved_problem_ids: Vec<String>,
    #[serde(default)]
    pub solved_problem_names: Vec<String>,
    #[serde(default)]
    pub solved_problems_details: Vec<ProblemRef>,
    #[serde(default)]
    pub total_solved: usize,
    pub source: ProblemSource,
}

impl SolvedSummary {
    /// Build a successful summary from solved problems, dropping duplicates.
    pub fn from_problems(
        source: ProblemSource,
        problems: impl IntoIterator<Item = ProblemRef>,
    ) -> Self {
        let mut details: Vec<ProblemRef> = Vec::new();
        for problem in problems {
            if problem.source == source && !details.iter().any(|p| p.id == problem.id) {
                details.push(problem);
            }
        }
        let mut names: Vec<String> = Vec::new();
        for title in details.iter().filter_map(|p| p.title.clone()) {
            if !names.contains(&title) {
                names.push(title);
            }
        }
        Self {
            success: true,
            solved_problem_ids: details.iter().map(|p| p.id.clone()).collect(),
            solved_problem_names: names,
            total_solved: details.len(),
            solved_problems_details: details,
            source,
        }
    }

    /// Whether `problem` is among the solved ones. Problems from another
    /// judge never match.
    pub fn is_solved(&self, problem: &ProblemRef) -> bool {
        problem.source == self.source && self.solved_problem_ids.iter().any(|id| *id == problem.id)
    }
}
