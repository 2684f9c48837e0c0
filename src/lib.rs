// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::ptr_arg)]
#![allow(clippy::match_like_matches_macro)]

//! # PDF Attest
//!
//! Object-graph resolution and structural validation for PDF documents.
//!
//! ## Core Features
//!
//! - **Cross-Reference Store**: memoizing dereferencing of indirect references
//!   with cycle detection and a chain-length bound
//! - **Field Accessors**: one generic required/version/predicate contract for
//!   every entry kind (ISO 32000-1:2008 Section 7.3)
//! - **Date Strings**: strict grammar for `D:YYYYMMDDHHmmSSOHH'mm'` (§7.9.4)
//! - **File Specifications**: file specification dictionaries, embedded file
//!   streams, related files arrays and their parameter dictionaries (§7.11)
//! - **Strict / Relaxed modes**: relaxed mode accepts common real-world
//!   deviations
//!
//! The loader that parses bytes into objects is not part of this crate; it
//! populates a [`xref::CrossRefStore`], either with resolved objects or with
//! locators plus an [`xref::ObjectSource`] that materializes them on demand.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_attest::{CrossRefStore, PdfVersion, ValidationContext, ValidationOptions};
//! use pdf_attest::object::{Dictionary, Object, ObjectRef, Stream};
//!
//! # fn main() -> pdf_attest::Result<()> {
//! let mut store = CrossRefStore::new();
//!
//! // 3 0 obj: embedded file stream
//! let mut ef_dict = Dictionary::new();
//! ef_dict.insert("Type".to_string(), Object::name("EmbeddedFile"));
//! store.register(ObjectRef::new(3, 0), Object::Stream(Stream::new(ef_dict, b"data".to_vec())));
//!
//! // File specification referencing it
//! let mut ef = Dictionary::new();
//! ef.insert("F".to_string(), Object::reference(3, 0));
//! let mut spec = Dictionary::new();
//! spec.insert("Type".to_string(), Object::name("Filespec"));
//! spec.insert("F".to_string(), Object::string("data.bin"));
//! spec.insert("EF".to_string(), Object::Dictionary(ef));
//!
//! let ctx = ValidationContext::new(&store, PdfVersion::V1_7, ValidationOptions::strict());
//! pdf_attest::validation::validate_file_specification(&ctx, &Object::Dictionary(spec))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Object model
pub mod encoding;
pub mod object;
pub mod version;
pub mod xref;

// Configuration
pub mod config;

// Structural validation
pub mod validation;

// Re-exports
pub use config::{ValidationMode, ValidationOptions};
pub use error::{Error, Result};
pub use object::{Dictionary, Object, ObjectKind, ObjectRef, Stream};
pub use validation::{ValidationContext, ValidationReport, is_valid_date, validate, validate_all};
pub use version::PdfVersion;
pub use xref::{CrossRefStore, Locator, ObjectSource, XRefEntry};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
