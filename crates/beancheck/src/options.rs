//! Synthesis options

use serde::{Deserialize, Serialize};

/// Default bound on nested construction
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Knobs for [`TypeSynthesisFactory`](crate::TypeSynthesisFactory)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Maximum nesting of constructed instances before synthesis fails
    pub max_depth: usize,
    /// Whether non-final types without a rule may be satisfied with a stub
    pub allow_stubs: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_stubs: true,
        }
    }
}

impl SynthesisOptions {
    /// Set the maximum construction depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable the stub fallback
    pub fn with_stubs(mut self, allow_stubs: bool) -> Self {
        self.allow_stubs = allow_stubs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SynthesisOptions::default();
        assert_eq!(options.max_depth, 8);
        assert!(options.allow_stubs);
    }

    #[test]
    fn test_partial_json() {
        let options: SynthesisOptions = serde_json::from_str(r#"{"allow_stubs": false}"#).unwrap();
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!options.allow_stubs);
    }
}
