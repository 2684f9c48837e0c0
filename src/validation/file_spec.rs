//! File specifications and embedded file streams, ISO 32000-1:2008
//! Sections 7.11.3 and 7.11.4.
//!
//! A file specification is either a bare string or a dictionary. The
//! dictionary form may embed file contents through `/EF` and carry related
//! files through `/RF`. Validation of one file specification is
//! all-or-nothing: the first violation aborts it.

use super::context::ValidationContext;
use super::entry::{
    EntryKind, EntryPath, validate_boolean_entry, validate_byte_string_entry, validate_date_entry,
    validate_dict_entry, validate_entry, validate_integer_entry, validate_name_entry,
    validate_stream_entry, validate_string_array_entry, validate_string_entry,
};
use super::strings::{FileSpecGrammar, is_valid_file_spec_string};
use crate::encoding::decode_text_string;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, Stream};
use crate::version::PdfVersion;

const FILE_SPEC_DICT: &str = "fileSpecDict";
const EMBEDDED_FILES_DICT: &str = "embeddedFilesDict";
const RELATED_FILES_DICT: &str = "relatedFilesDict";
const RELATED_FILES_ARRAY: &str = "relatedFilesArray";
const EMBEDDED_FILE_STREAM_DICT: &str = "embeddedFileStreamDict";
const PARAMS_DICT: &str = "embeddedFileStreamParmDict";
const MAC_PARAMS_DICT: &str = "embeddedFileStreamMacParameterDict";

/// Obsolete platform-specific file name keys.
const LEGACY_KEYS: [&str; 3] = ["DOS", "Mac", "Unix"];

/// Keys permitted in an `/EF` dictionary.
const EMBEDDED_FILE_KEYS: [&str; 5] = ["F", "UF", "DOS", "Mac", "Unix"];

/// Attribution for a file specification validated outside any dictionary.
const STANDALONE: EntryPath<'static> = EntryPath {
    dict: "fileSpecification",
    key: "(value)",
};

/// File specification entry, for use with [`validate_entry`].
#[derive(Debug)]
pub struct FileSpecKind;

impl EntryKind for FileSpecKind {
    type Output = Object;
    const EXPECTED: &'static str = "String or Dictionary";

    fn convert(ctx: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<Object> {
        validate_file_spec_value(ctx, obj, at, 0)
    }
}

/// Validate a file specification and return it dereferenced.
///
/// # Example
///
/// ```
/// use pdf_attest::config::ValidationOptions;
/// use pdf_attest::object::Object;
/// use pdf_attest::validation::file_spec::validate_file_specification;
/// use pdf_attest::validation::ValidationContext;
/// use pdf_attest::version::PdfVersion;
/// use pdf_attest::xref::CrossRefStore;
///
/// let store = CrossRefStore::new();
/// let ctx = ValidationContext::new(&store, PdfVersion::V1_7, ValidationOptions::strict());
///
/// let spec = validate_file_specification(&ctx, &Object::string("attachments/invoice.xml"))?;
/// assert_eq!(spec, Object::string("attachments/invoice.xml"));
/// # Ok::<(), pdf_attest::error::Error>(())
/// ```
pub fn validate_file_specification(ctx: &ValidationContext<'_>, obj: &Object) -> Result<Object> {
    let obj = ctx.dereference(obj)?;
    validate_file_spec_value(ctx, obj, STANDALONE, 0)
}

/// Validate the file specification stored under `key` in `dict`.
///
/// Absent and `null` entries follow the usual accessor rules.
pub fn validate_file_spec_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<Object>> {
    ctx.trace(format_args!("*** validate_file_spec_entry begin: entry={} ***", key));
    let spec = validate_entry::<FileSpecKind>(ctx, dict, dict_name, key, required, since, None)?;
    ctx.trace(format_args!("*** validate_file_spec_entry end: entry={} ***", key));
    Ok(spec)
}

/// Check an already dereferenced file specification.
pub(crate) fn validate_file_spec_value(
    ctx: &ValidationContext<'_>,
    obj: Object,
    at: EntryPath<'_>,
    depth: u32,
) -> Result<Object> {
    match &obj {
        Object::String(bytes) | Object::HexString(bytes) => {
            let s = decode_text_string(bytes).ok_or_else(|| at.violation("invalid text string"))?;
            if !is_valid_file_spec_string(&s) {
                return Err(at.violation(format!("invalid file specification string <{}>", s)));
            }
        },
        Object::Dictionary(dict) => validate_file_spec_dict(ctx, dict, depth)?,
        other => return Err(at.mismatch(FileSpecKind::EXPECTED, other)),
    }
    Ok(obj)
}

/// Validate a file specification dictionary.
pub fn validate_file_spec_dict(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    depth: u32,
) -> Result<()> {
    let depth = ctx.descend(depth)?;
    ctx.trace(format_args!("*** validate_file_spec_dict begin ***"));

    let fs = validate_name_entry(ctx, dict, FILE_SPEC_DICT, "FS", false, PdfVersion::V1_0, None)?;
    let grammar = FileSpecGrammar::for_file_system(fs.as_deref());
    let accepts = |s: &String| grammar.accepts(s);

    // F may be omitted when an obsolete platform key names the file instead
    let has_legacy_name = LEGACY_KEYS
        .iter()
        .any(|key| matches!(dict.get(*key), Some(v) if !v.is_null()));
    validate_string_entry(
        ctx,
        dict,
        FILE_SPEC_DICT,
        "F",
        !has_legacy_name,
        PdfVersion::V1_0,
        Some(&accepts),
    )?;

    let uf_since = if ctx.is_relaxed() {
        PdfVersion::V1_4
    } else {
        PdfVersion::V1_7
    };
    validate_string_entry(ctx, dict, FILE_SPEC_DICT, "UF", false, uf_since, Some(&accepts))?;

    validate_string_array_entry(
        ctx,
        dict,
        FILE_SPEC_DICT,
        "ID",
        false,
        PdfVersion::V1_1,
        Some(&|ids: &Vec<Vec<u8>>| ids.len() == 2),
    )?;

    validate_boolean_entry(ctx, dict, FILE_SPEC_DICT, "V", false, PdfVersion::V1_2, None)?;

    validate_embedded_files(ctx, dict, depth)?;

    let desc_since = if ctx.is_relaxed() {
        PdfVersion::EARLIEST
    } else {
        PdfVersion::V1_6
    };
    validate_string_entry(ctx, dict, FILE_SPEC_DICT, "Desc", false, desc_since, None)?;

    // Collection item contents are not checked here
    validate_dict_entry(ctx, dict, FILE_SPEC_DICT, "CI", false, PdfVersion::V1_7, None)?;

    ctx.trace(format_args!("*** validate_file_spec_dict end ***"));
    Ok(())
}

/// `/RF`, `/EF` and the `/Type` they make mandatory.
fn validate_embedded_files(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    depth: u32,
) -> Result<()> {
    let related =
        validate_dict_entry(ctx, dict, FILE_SPEC_DICT, "RF", false, PdfVersion::V1_3, None)?;

    let embedded = validate_dict_entry(
        ctx,
        dict,
        FILE_SPEC_DICT,
        "EF",
        related.is_some(),
        PdfVersion::V1_3,
        None,
    )?;

    let relaxed = ctx.is_relaxed();
    let type_ok = |s: &String| s == "Filespec" || (relaxed && s == "F");
    validate_name_entry(
        ctx,
        dict,
        FILE_SPEC_DICT,
        "Type",
        embedded.is_some(),
        PdfVersion::V1_0,
        Some(&type_ok),
    )?;

    let embedded = match embedded {
        Some(ef) => ef,
        None => return Ok(()),
    };

    validate_embedded_files_dict(ctx, &embedded, depth)?;

    if let Some(related) = related {
        validate_related_files_dict(ctx, &related, &embedded, depth)?;
    }

    Ok(())
}

fn validate_embedded_files_dict(
    ctx: &ValidationContext<'_>,
    embedded: &Dictionary,
    depth: u32,
) -> Result<()> {
    for (key, value) in embedded {
        if !EMBEDDED_FILE_KEYS.contains(&key.as_str()) {
            return Err(Error::violation(
                EMBEDDED_FILES_DICT,
                key,
                "key must be one of F, UF, DOS, Mac, Unix",
            ));
        }

        match ctx.dereference(value)? {
            Object::Stream(stream) => validate_embedded_file_stream(ctx, &stream, depth)?,
            other => {
                return Err(Error::mismatch(EMBEDDED_FILES_DICT, key, "Stream", other.type_name()));
            },
        }
    }
    Ok(())
}

/// Every `/RF` key must have an `/EF` counterpart.
fn validate_related_files_dict(
    ctx: &ValidationContext<'_>,
    related: &Dictionary,
    embedded: &Dictionary,
    depth: u32,
) -> Result<()> {
    for (key, value) in related {
        if !embedded.contains_key(key) {
            return Err(Error::violation(
                FILE_SPEC_DICT,
                "RF",
                format!("entry /{} has no matching /EF entry", key),
            ));
        }

        match ctx.dereference(value)? {
            Object::Array(files) => validate_related_files_array(ctx, key, &files, depth)?,
            other => {
                return Err(Error::mismatch(RELATED_FILES_DICT, key, "Array", other.type_name()));
            },
        }
    }
    Ok(())
}

/// `[stream string stream string ...]`, ISO 32000-1:2008 Section 7.11.4.2.
fn validate_related_files_array(
    ctx: &ValidationContext<'_>,
    key: &str,
    files: &[Object],
    depth: u32,
) -> Result<()> {
    if files.len() % 2 != 0 {
        return Err(Error::violation(
            RELATED_FILES_ARRAY,
            key,
            format!("odd number of elements ({})", files.len()),
        ));
    }

    for (i, element) in files.iter().enumerate() {
        let field = format!("{}[{}]", key, i);
        let obj = ctx.dereference(element)?;

        match (i % 2, obj) {
            (_, Object::Null) => {
                return Err(Error::violation(RELATED_FILES_ARRAY, &field, "null element"));
            },
            (0, Object::Stream(stream)) => validate_embedded_file_stream(ctx, &stream, depth)?,
            (0, other) => {
                return Err(Error::mismatch(
                    RELATED_FILES_ARRAY,
                    &field,
                    "Stream",
                    other.type_name(),
                ));
            },
            (_, Object::String(_) | Object::HexString(_)) => {},
            (_, other) => {
                return Err(Error::mismatch(
                    RELATED_FILES_ARRAY,
                    &field,
                    "String",
                    other.type_name(),
                ));
            },
        }
    }
    Ok(())
}

/// Validate an embedded file stream's dictionary.
pub fn validate_embedded_file_stream(
    ctx: &ValidationContext<'_>,
    stream: &Stream,
    depth: u32,
) -> Result<()> {
    let depth = ctx.descend(depth)?;
    ctx.trace(format_args!("*** validate_embedded_file_stream begin ***"));

    let dict = &stream.dict;

    validate_name_entry(
        ctx,
        dict,
        EMBEDDED_FILE_STREAM_DICT,
        "Type",
        false,
        PdfVersion::V1_0,
        Some(&|s: &String| s == "EmbeddedFile"),
    )?;

    // MIME type, unconstrained
    validate_name_entry(
        ctx,
        dict,
        EMBEDDED_FILE_STREAM_DICT,
        "Subtype",
        false,
        PdfVersion::V1_0,
        None,
    )?;

    let params = validate_dict_entry(
        ctx,
        dict,
        EMBEDDED_FILE_STREAM_DICT,
        "Params",
        false,
        PdfVersion::V1_0,
        None,
    )?;
    if let Some(params) = params {
        validate_params_dict(ctx, &params, depth)?;
    }

    ctx.trace(format_args!("*** validate_embedded_file_stream end ***"));
    Ok(())
}

fn validate_params_dict(
    ctx: &ValidationContext<'_>,
    params: &Dictionary,
    depth: u32,
) -> Result<()> {
    let depth = ctx.descend(depth)?;
    ctx.trace(format_args!("*** validate_params_dict begin ***"));

    validate_integer_entry(
        ctx,
        params,
        PARAMS_DICT,
        "Size",
        false,
        PdfVersion::V1_0,
        Some(&|n: &i64| *n >= 0),
    )?;
    validate_integer_entry(ctx, params, PARAMS_DICT, "Subtype", false, PdfVersion::V1_0, None)?;
    validate_integer_entry(ctx, params, PARAMS_DICT, "Creator", false, PdfVersion::V1_0, None)?;

    validate_date_entry(ctx, params, PARAMS_DICT, "CreationDate", false, PdfVersion::V1_0)?;
    validate_date_entry(ctx, params, PARAMS_DICT, "ModDate", false, PdfVersion::V1_0)?;

    let mac = validate_dict_entry(ctx, params, PARAMS_DICT, "Mac", false, PdfVersion::V1_0, None)?;
    if let Some(mac) = mac {
        validate_mac_params_dict(ctx, &mac, depth)?;
    }

    // MD5 digest, kept as raw bytes
    validate_byte_string_entry(
        ctx,
        params,
        PARAMS_DICT,
        "CheckSum",
        false,
        PdfVersion::V1_0,
        None,
    )?;

    ctx.trace(format_args!("*** validate_params_dict end ***"));
    Ok(())
}

fn validate_mac_params_dict(
    ctx: &ValidationContext<'_>,
    mac: &Dictionary,
    depth: u32,
) -> Result<()> {
    ctx.descend(depth)?;

    validate_integer_entry(ctx, mac, MAC_PARAMS_DICT, "Subtype", false, PdfVersion::V1_0, None)?;
    validate_integer_entry(ctx, mac, MAC_PARAMS_DICT, "Creator", false, PdfVersion::V1_0, None)?;
    validate_stream_entry(ctx, mac, MAC_PARAMS_DICT, "ResFork", false, PdfVersion::V1_0, None)?;

    Ok(())
}
