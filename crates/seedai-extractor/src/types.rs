//! Result types for a generation run

use std::fmt;

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Completions pulled from the generator
    pub completions: usize,

    /// Values extracted across all completions
    pub values: usize,

    /// Seed files newly written to the corpus
    pub seeds_written: usize,

    /// Whether the function source was cut to fit the prompt
    pub truncated: bool,
}

impl RunSummary {
    /// Values that were already in the corpus or repeated within the run
    pub fn duplicates(&self) -> usize {
        self.values.saturating_sub(self.seeds_written)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} completions, {} values, {} new seeds",
            self.completions, self.values, self.seeds_written
        )?;
        if self.truncated {
            write!(f, " (prompt truncated)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates() {
        let summary = RunSummary {
            completions: 3,
            values: 5,
            seeds_written: 2,
            truncated: false,
        };
        assert_eq!(summary.duplicates(), 3);
    }

    #[test]
    fn test_display() {
        let summary = RunSummary {
            completions: 1,
            values: 2,
            seeds_written: 2,
            truncated: true,
        };
        assert_eq!(
            summary.to_string(),
            "1 completions, 2 values, 2 new seeds (prompt truncated)"
        );
    }
}
