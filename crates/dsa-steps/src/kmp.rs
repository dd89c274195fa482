//! Knuth-Morris-Pratt pattern matching.
//!
//! Two phases are recorded: construction of the longest-proper-prefix-suffix
//! (LPS) table, then the scan of the text. Positions index Unicode scalar
//! values, not bytes.

use serde::{Deserialize, Serialize};

use crate::algorithm::{check_len, Algorithm};
use crate::error::{Error, Result};

/// KMP problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kmp {
    pub text: String,
    pub pattern: String,
}

impl Kmp {
    pub fn new(text: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pattern: pattern.into(),
        }
    }
}

/// Events recorded while building the LPS table and scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KmpStep {
    /// Compare `pattern[index]` with `pattern[length]`
    LpsCompare { index: usize, length: usize },
    LpsSet { index: usize, value: usize },
    /// Mismatch: fall back to a shorter border
    LpsFallback { length: usize },
    Compare { text_index: usize, pattern_index: usize, matched: bool },
    /// Full match starting at `position`
    Match { position: usize },
    /// Pattern pointer moves to `pattern_index` using the LPS table
    Shift { pattern_index: usize },
}

/// Which half of the algorithm is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KmpPhase {
    BuildingLps,
    Searching,
}

/// Display state for KMP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmpView {
    pub text: Vec<char>,
    pub pattern: Vec<char>,
    pub phase: KmpPhase,
    /// LPS entries filled so far
    pub lps: Vec<Option<usize>>,
    pub lps_index: Option<usize>,
    pub lps_length: Option<usize>,
    pub text_index: Option<usize>,
    pub pattern_index: Option<usize>,
    pub matches: Vec<usize>,
    pub message: String,
}

/// LPS table for `pattern`, recording every comparison.
fn build_lps(pattern: &[char], steps: &mut Vec<KmpStep>) -> Vec<usize> {
    let mut lps = vec![0; pattern.len()];
    let mut length = 0;
    let mut index = 1;

    while index < pattern.len() {
        steps.push(KmpStep::LpsCompare { index, length });
        if pattern[index] == pattern[length] {
            length += 1;
            lps[index] = length;
            steps.push(KmpStep::LpsSet {
                index,
                value: length,
            });
            index += 1;
        } else if length > 0 {
            length = lps[length - 1];
            steps.push(KmpStep::LpsFallback { length });
        } else {
            lps[index] = 0;
            steps.push(KmpStep::LpsSet { index, value: 0 });
            index += 1;
        }
    }
    lps
}

impl Algorithm for Kmp {
    type Step = KmpStep;
    type View = KmpView;

    fn name(&self) -> &'static str {
        "kmp"
    }

    fn validate(&self) -> Result<()> {
        let text = self.text.chars().count();
        let pattern = self.pattern.chars().count();
        check_len(text)?;
        if pattern == 0 {
            return Err(Error::EmptyPattern);
        }
        if pattern > text {
            return Err(Error::PatternTooLong { pattern, text });
        }
        Ok(())
    }

    fn generate(&self) -> Vec<KmpStep> {
        let text: Vec<char> = self.text.chars().collect();
        let pattern: Vec<char> = self.pattern.chars().collect();
        let mut steps = Vec::new();
        if pattern.is_empty() {
            return steps;
        }

        let lps = build_lps(&pattern, &mut steps);

        let (mut i, mut j) = (0, 0);
        while i < text.len() {
            let matched = text[i] == pattern[j];
            steps.push(KmpStep::Compare {
                text_index: i,
                pattern_index: j,
                matched,
            });
            if matched {
                i += 1;
                j += 1;
                if j == pattern.len() {
                    steps.push(KmpStep::Match { position: i - j });
                    j = lps[j - 1];
                    steps.push(KmpStep::Shift { pattern_index: j });
                }
            } else if j > 0 {
                j = lps[j - 1];
                steps.push(KmpStep::Shift { pattern_index: j });
            } else {
                i += 1;
            }
        }
        steps
    }

    fn initial_view(&self) -> KmpView {
        let pattern: Vec<char> = self.pattern.chars().collect();
        let mut lps = vec![None; pattern.len()];
        if let Some(first) = lps.first_mut() {
            *first = Some(0);
        }
        KmpView {
            text: self.text.chars().collect(),
            pattern,
            phase: KmpPhase::BuildingLps,
            lps,
            lps_index: None,
            lps_length: None,
            text_index: None,
            pattern_index: None,
            matches: Vec::new(),
            message: String::from("Building LPS table"),
        }
    }

    fn apply(&self, view: &mut KmpView, step: &KmpStep) {
        match *step {
            KmpStep::LpsCompare { index, length } => {
                view.lps_index = Some(index);
                view.lps_length = Some(length);
                if let (Some(a), Some(b)) = (view.pattern.get(index), view.pattern.get(length)) {
                    view.message = format!("pattern[{index}] '{a}' vs pattern[{length}] '{b}'");
                }
            }
            KmpStep::LpsSet { index, value } => {
                if let Some(entry) = view.lps.get_mut(index) {
                    *entry = Some(value);
                }
                view.lps_length = Some(value);
                view.message = format!("lps[{index}] = {value}");
            }
            KmpStep::LpsFallback { length } => {
                view.lps_length = Some(length);
                view.message = format!("Mismatch, fall back to border length {length}");
            }
            KmpStep::Compare {
                text_index,
                pattern_index,
                matched,
            } => {
                view.phase = KmpPhase::Searching;
                view.lps_index = None;
                view.lps_length = None;
                view.text_index = Some(text_index);
                view.pattern_index = Some(pattern_index);
                view.message = if matched {
                    format!("text[{text_index}] matches pattern[{pattern_index}]")
                } else {
                    format!("text[{text_index}] differs from pattern[{pattern_index}]")
                };
            }
            KmpStep::Match { position } => {
                view.matches.push(position);
                view.message = format!("Match at {position}");
            }
            KmpStep::Shift { pattern_index } => {
                view.pattern_index = Some(pattern_index);
                view.message = format!("Shift pattern to index {pattern_index}");
            }
        }
    }
}
