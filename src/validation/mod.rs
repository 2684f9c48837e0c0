//! Structural validation of the object graph.
//!
//! The building blocks are the field accessors in [`entry`], which every
//! structural validator uses to read dictionary entries. On top of those:
//!
//! - [`date`]: date string grammar
//! - [`strings`]: file specification path and URL grammars
//! - [`file_spec`]: file specifications and embedded file streams
//! - [`name_tree`]: name tree traversal, used to reach embedded files
//!
//! [`validate`] checks a whole document and stops at the first error;
//! [`validate_all`] checks every attachment and collects the failures.
//!
//! # Example
//!
//! ```
//! use pdf_attest::config::ValidationOptions;
//! use pdf_attest::object::{Dictionary, Object, ObjectRef};
//! use pdf_attest::validation::{validate, ValidationContext};
//! use pdf_attest::version::PdfVersion;
//! use pdf_attest::xref::CrossRefStore;
//!
//! let mut catalog = Dictionary::new();
//! catalog.insert("Type".to_string(), Object::name("Catalog"));
//!
//! let mut trailer = Dictionary::new();
//! trailer.insert("Root".to_string(), Object::reference(1, 0));
//!
//! let mut store = CrossRefStore::new();
//! store.register(ObjectRef::new(1, 0), Object::Dictionary(catalog));
//! store.set_trailer(trailer);
//!
//! let ctx = ValidationContext::new(&store, PdfVersion::V1_7, ValidationOptions::default());
//! validate(&ctx)?;
//! # Ok::<(), pdf_attest::error::Error>(())
//! ```

pub mod context;
pub mod date;
pub mod entry;
pub mod file_spec;
pub mod name_tree;
pub mod report;
pub mod strings;

pub use context::ValidationContext;
pub use date::is_valid_date;
pub use file_spec::{validate_file_spec_entry, validate_file_specification};
pub use report::{AttachmentFailure, ValidationReport};

use crate::error::Result;
use crate::object::Object;
use entry::EntryPath;
use file_spec::validate_file_spec_value;
use name_tree::{embedded_files_tree, walk_name_tree};

const EMBEDDED_FILES_TREE: &str = "embeddedFilesNameTree";

/// Validate every embedded file of the document, stopping at the first error.
///
/// A document without an embedded files tree is valid.
pub fn validate(ctx: &ValidationContext<'_>) -> Result<()> {
    log::info!(
        "Validating embedded files (PDF {}, {:?} mode)",
        ctx.version(),
        ctx.mode()
    );

    let tree = match embedded_files_tree(ctx)? {
        Some(tree) => tree,
        None => {
            log::debug!("No embedded files tree");
            return Ok(());
        },
    };

    walk_name_tree(ctx, &tree, 0, &mut |name: &str, value: Object, depth: u32| {
        ctx.trace(format_args!("embedded file {:?}", name));
        let at = EntryPath {
            dict: EMBEDDED_FILES_TREE,
            key: name,
        };
        let spec = ctx.dereference(&value)?;
        validate_file_spec_value(ctx, spec, at, depth).map(|_| ())
    })
}

/// Validate every embedded file of the document, collecting failures.
///
/// Each attachment is still all-or-nothing; a broken name tree or catalog
/// aborts the whole pass.
pub fn validate_all(ctx: &ValidationContext<'_>) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(ctx.version(), ctx.mode());

    let tree = match embedded_files_tree(ctx)? {
        Some(tree) => tree,
        None => return Ok(report),
    };

    walk_name_tree(ctx, &tree, 0, &mut |name: &str, value: Object, depth: u32| {
        let at = EntryPath {
            dict: EMBEDDED_FILES_TREE,
            key: name,
        };
        let outcome = ctx
            .dereference(&value)
            .and_then(|spec| validate_file_spec_value(ctx, spec, at, depth))
            .map(|_| ());
        report.record(name, outcome);
        Ok(())
    })?;

    log::info!(
        "Checked {} attachment(s), {} failed",
        report.attachments_checked,
        report.failures.len()
    );
    Ok(report)
}
