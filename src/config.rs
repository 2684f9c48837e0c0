//! Configuration for validation passes.

use serde::Serialize;

/// Enforcement posture for a validation pass.
///
/// Relaxed mode accepts a few common deviations: lower version floors for
/// some entries and `/F` as an alias for the `/Filespec` type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Enforce the specification as written
    Strict,
    /// Tolerate widespread real-world deviations
    #[default]
    Relaxed,
}

impl ValidationMode {
    /// True for [`ValidationMode::Relaxed`].
    pub fn is_relaxed(&self) -> bool {
        matches!(self, ValidationMode::Relaxed)
    }
}

/// Validation options.
///
/// # Example
///
/// ```
/// use pdf_attest::config::{ValidationMode, ValidationOptions};
///
/// // Strict mode
/// let strict = ValidationOptions::strict();
/// assert_eq!(strict.mode, ValidationMode::Strict);
///
/// // Relaxed mode with trace output
/// let relaxed = ValidationOptions::relaxed().with_verbose(true);
/// assert!(relaxed.verbose);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Strict or relaxed enforcement
    pub mode: ValidationMode,

    /// Maximum length of an indirect-reference chain
    ///
    /// Longer chains fail with a reference-cycle error even if no object
    /// repeats.
    pub max_reference_depth: u32,

    /// Maximum nesting of structural validators (name tree kids, file
    /// specification -> embedded file stream -> parameters -> Mac dict)
    pub max_structure_depth: u32,

    /// Emit begin/end trace lines for every structural validator
    pub verbose: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::relaxed()
    }
}

impl ValidationOptions {
    /// Default reference-chain bound.
    pub const DEFAULT_MAX_REFERENCE_DEPTH: u32 = 50;

    /// Default structural nesting bound.
    pub const DEFAULT_MAX_STRUCTURE_DEPTH: u32 = 32;

    /// Strict mode.
    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::Strict,
            max_reference_depth: Self::DEFAULT_MAX_REFERENCE_DEPTH,
            max_structure_depth: Self::DEFAULT_MAX_STRUCTURE_DEPTH,
            verbose: false,
        }
    }

    /// Relaxed mode.
    pub fn relaxed() -> Self {
        Self {
            mode: ValidationMode::Relaxed,
            ..Self::strict()
        }
    }

    /// Set the enforcement mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the reference-chain bound.
    pub fn with_max_reference_depth(mut self, depth: u32) -> Self {
        self.max_reference_depth = depth;
        self
    }

    /// Set the structural nesting bound.
    pub fn with_max_structure_depth(mut self, depth: u32) -> Self {
        self.max_structure_depth = depth;
        self
    }

    /// Enable trace output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
