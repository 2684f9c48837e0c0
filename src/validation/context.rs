//! Validation context threaded through every validator.

use crate::config::{ValidationMode, ValidationOptions};
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};
use crate::version::PdfVersion;
use crate::xref::CrossRefStore;

/// Store, document version and options for one validation pass.
///
/// Immutable for the duration of the pass.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    store: &'a CrossRefStore,
    version: PdfVersion,
    options: ValidationOptions,
}

impl<'a> ValidationContext<'a> {
    /// Create a context over a populated store.
    pub fn new(store: &'a CrossRefStore, version: PdfVersion, options: ValidationOptions) -> Self {
        Self {
            store,
            version,
            options,
        }
    }

    /// The cross-reference store.
    pub fn store(&self) -> &'a CrossRefStore {
        self.store
    }

    /// Declared document version.
    pub fn version(&self) -> PdfVersion {
        self.version
    }

    /// Enforcement mode.
    pub fn mode(&self) -> ValidationMode {
        self.options.mode
    }

    /// Options for this pass.
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// True under [`ValidationMode::Relaxed`].
    pub fn is_relaxed(&self) -> bool {
        self.options.mode.is_relaxed()
    }

    /// Whether the document version reaches `since`.
    ///
    /// Field accessors only warn about version floors; strict callers use
    /// this to turn the warning into a failure.
    pub fn version_permits(&self, since: PdfVersion) -> bool {
        self.version >= since
    }

    /// Dereference through the store, bounded by `max_reference_depth`.
    pub fn dereference(&self, obj: &Object) -> Result<Object> {
        self.store
            .dereference_bounded(obj, self.options.max_reference_depth)
    }

    /// Document catalog.
    pub fn catalog(&self) -> Result<Dictionary> {
        self.store.catalog()
    }

    /// Depth for the next structural level, or [`Error::DepthExceeded`].
    pub(crate) fn descend(&self, depth: u32) -> Result<u32> {
        match depth.checked_add(1) {
            Some(next) if next <= self.options.max_structure_depth => Ok(next),
            _ => {
                log::error!(
                    "Structure depth limit exceeded ({})",
                    self.options.max_structure_depth
                );
                Err(Error::DepthExceeded(self.options.max_structure_depth))
            },
        }
    }

    /// Trace line, emitted only in verbose mode.
    pub(crate) fn trace(&self, args: std::fmt::Arguments<'_>) {
        if self.options.verbose {
            log::debug!("{}", args);
        }
    }
}
