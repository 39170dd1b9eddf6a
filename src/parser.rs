//! Turns one input line into an ordered pipeline of stages.
//!
//! There is no quoting or escaping: every `|` separates stages and every run
//! of whitespace separates tokens.

/// Stage delimiter.
pub const PIPE: char = '|';

/// One pipe-delimited segment, already split into tokens.
///
/// The first token is the command name, the rest are its arguments. A stage
/// made only of whitespace has no tokens at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    tokens: Vec<String>,
}

impl Stage {
    /// Tokenize a raw stage string.
    pub fn parse(raw: &str) -> Self {
        Self {
            tokens: tokenize(raw),
        }
    }

    /// Command name, or `None` for an empty stage.
    pub fn name(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Arguments following the command name.
    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// The ordered stages parsed from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Partition `line` on [`PIPE`] and tokenize every segment, left to right.
    pub fn parse(line: &str) -> Self {
        Self {
            stages: partition(line).into_iter().map(Stage::parse).collect(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// True iff the line holds more than one stage.
    ///
    /// Every command of the pipeline sees the same value.
    pub fn is_multi_stage(&self) -> bool {
        self.stages.len() > 1
    }
}

/// Split a line into raw stage strings. Segments are not trimmed.
pub fn partition(line: &str) -> Vec<&str> {
    line.split(PIPE).collect()
}

/// Split a stage string on whitespace, dropping empty tokens.
pub fn tokenize(stage: &str) -> Vec<String> {
    stage.split_whitespace().map(str::to_owned).collect()
}
