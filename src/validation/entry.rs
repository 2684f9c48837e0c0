//! Field-level accessors shared by all structural validators.
//!
//! Every accessor follows the same contract:
//!
//! 1. A missing entry, or one holding `null`, is an error only when `required`.
//! 2. The entry is dereferenced through the store; store errors propagate.
//! 3. The resolved value must have the accessor's kind.
//! 4. A document older than `since` only produces a warning.
//! 5. An optional predicate can reject the value.
//!
//! The contract is implemented once in [`validate_entry`]; the kinds differ
//! only in their tag check and decode step ([`EntryKind`]).

use super::context::ValidationContext;
use super::date::is_valid_date;
use crate::encoding::decode_text_string;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, Stream};
use crate::version::PdfVersion;

/// Predicate applied to a successfully converted entry value.
pub type Check<'c, T> = Option<&'c dyn Fn(&T) -> bool>;

/// Location of an entry, used to attribute errors.
#[derive(Debug, Clone, Copy)]
pub struct EntryPath<'p> {
    /// Name of the dictionary being validated
    pub dict: &'p str,
    /// Entry key
    pub key: &'p str,
}

impl EntryPath<'_> {
    /// Type mismatch error for this entry.
    pub fn mismatch(&self, expected: &str, found: &Object) -> Error {
        Error::mismatch(self.dict, self.key, expected, found.type_name())
    }

    /// Constraint violation error for this entry.
    pub fn violation(&self, reason: impl Into<String>) -> Error {
        Error::violation(self.dict, self.key, reason)
    }
}

/// One target kind for [`validate_entry`].
pub trait EntryKind {
    /// Converted value handed back to the caller.
    type Output;

    /// Kind name used in type-mismatch errors.
    const EXPECTED: &'static str;

    /// Tag check plus any decode step. `obj` is already dereferenced and
    /// never `null`.
    fn convert(ctx: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<Self::Output>;
}

/// Integer entry.
#[derive(Debug)]
pub struct IntegerKind;

impl EntryKind for IntegerKind {
    type Output = i64;
    const EXPECTED: &'static str = "Integer";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<i64> {
        match obj {
            Object::Integer(i) => Ok(i),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Integer or real entry, widened to `f64`.
#[derive(Debug)]
pub struct NumberKind;

impl EntryKind for NumberKind {
    type Output = f64;
    const EXPECTED: &'static str = "Number";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<f64> {
        match obj {
            Object::Integer(i) => Ok(i as f64),
            Object::Real(r) => Ok(r),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Name entry.
#[derive(Debug)]
pub struct NameKind;

impl EntryKind for NameKind {
    type Output = String;
    const EXPECTED: &'static str = "Name";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<String> {
        match obj {
            Object::Name(name) => Ok(name),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Text string entry (literal or hex), decoded from UTF-16BE or PDFDocEncoding.
#[derive(Debug)]
pub struct StringKind;

impl EntryKind for StringKind {
    type Output = String;
    const EXPECTED: &'static str = "String";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<String> {
        match obj {
            Object::String(bytes) | Object::HexString(bytes) => {
                decode_text_string(&bytes).ok_or_else(|| at.violation("invalid text string"))
            },
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Byte string entry (literal or hex), returned undecoded.
#[derive(Debug)]
pub struct ByteStringKind;

impl EntryKind for ByteStringKind {
    type Output = Vec<u8>;
    const EXPECTED: &'static str = "String";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<Vec<u8>> {
        match obj {
            Object::String(bytes) | Object::HexString(bytes) => Ok(bytes),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Date string entry, checked against the date grammar.
#[derive(Debug)]
pub struct DateKind;

impl EntryKind for DateKind {
    type Output = String;
    const EXPECTED: &'static str = "String";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<String> {
        let bytes = match obj {
            Object::String(bytes) | Object::HexString(bytes) => bytes,
            other => return Err(at.mismatch(Self::EXPECTED, &other)),
        };

        if !is_valid_date(&bytes) {
            return Err(at.violation(format!(
                "invalid date string <{}>",
                String::from_utf8_lossy(&bytes)
            )));
        }

        decode_text_string(&bytes).ok_or_else(|| at.violation("invalid text string"))
    }
}

/// Boolean entry.
#[derive(Debug)]
pub struct BooleanKind;

impl EntryKind for BooleanKind {
    type Output = bool;
    const EXPECTED: &'static str = "Boolean";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<bool> {
        match obj {
            Object::Boolean(b) => Ok(b),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Dictionary entry.
#[derive(Debug)]
pub struct DictKind;

impl EntryKind for DictKind {
    type Output = Dictionary;
    const EXPECTED: &'static str = "Dictionary";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<Dictionary> {
        match obj {
            Object::Dictionary(dict) => Ok(dict),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Stream entry.
#[derive(Debug)]
pub struct StreamKind;

impl EntryKind for StreamKind {
    type Output = Stream;
    const EXPECTED: &'static str = "Stream";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<Stream> {
        match obj {
            Object::Stream(stream) => Ok(stream),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Array entry; elements are left as found.
#[derive(Debug)]
pub struct ArrayKind;

impl EntryKind for ArrayKind {
    type Output = Vec<Object>;
    const EXPECTED: &'static str = "Array";

    fn convert(_: &ValidationContext<'_>, at: EntryPath<'_>, obj: Object) -> Result<Vec<Object>> {
        match obj {
            Object::Array(arr) => Ok(arr),
            other => Err(at.mismatch(Self::EXPECTED, &other)),
        }
    }
}

/// Array whose elements all dereference to strings. Returns raw bytes.
#[derive(Debug)]
pub struct StringArrayKind;

impl EntryKind for StringArrayKind {
    type Output = Vec<Vec<u8>>;
    const EXPECTED: &'static str = "Array";

    fn convert(
        ctx: &ValidationContext<'_>,
        at: EntryPath<'_>,
        obj: Object,
    ) -> Result<Vec<Vec<u8>>> {
        let arr = match obj {
            Object::Array(arr) => arr,
            other => return Err(at.mismatch(Self::EXPECTED, &other)),
        };

        let mut strings = Vec::with_capacity(arr.len());
        for (i, element) in arr.iter().enumerate() {
            match ctx.dereference(element)? {
                Object::String(bytes) | Object::HexString(bytes) => strings.push(bytes),
                other => {
                    let key = format!("{}[{}]", at.key, i);
                    return Err(Error::mismatch(at.dict, &key, "String", other.type_name()));
                },
            }
        }
        Ok(strings)
    }
}

/// Validate one dictionary entry as kind `K`.
///
/// Returns `Ok(None)` when an optional entry is absent or `null`.
///
/// # Example
///
/// ```
/// use pdf_attest::config::ValidationOptions;
/// use pdf_attest::object::{Dictionary, Object};
/// use pdf_attest::validation::entry::{validate_entry, IntegerKind};
/// use pdf_attest::validation::ValidationContext;
/// use pdf_attest::version::PdfVersion;
/// use pdf_attest::xref::CrossRefStore;
///
/// let store = CrossRefStore::new();
/// let ctx = ValidationContext::new(&store, PdfVersion::V1_7, ValidationOptions::strict());
///
/// let mut dict = Dictionary::new();
/// dict.insert("Size".to_string(), Object::Integer(512));
///
/// let size = validate_entry::<IntegerKind>(
///     &ctx, &dict, "paramsDict", "Size", false, PdfVersion::V1_0, Some(&|n: &i64| *n >= 0),
/// )?;
/// assert_eq!(size, Some(512));
/// # Ok::<(), pdf_attest::error::Error>(())
/// ```
pub fn validate_entry<K: EntryKind>(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, K::Output>,
) -> Result<Option<K::Output>> {
    let at = EntryPath {
        dict: dict_name,
        key,
    };

    let raw = match dict.get(key) {
        Some(obj) if !obj.is_null() => obj,
        _ => return absent(at, required),
    };

    let obj = ctx.dereference(raw)?;
    if obj.is_null() {
        return absent(at, required);
    }

    let value = K::convert(ctx, at, obj)?;

    if !ctx.version_permits(since) {
        log::warn!(
            "{}: entry /{} requires PDF {}, document is {}",
            dict_name,
            key,
            since,
            ctx.version()
        );
    }

    if let Some(check) = check {
        if !check(&value) {
            return Err(at.violation(format!("{} value rejected", K::EXPECTED.to_lowercase())));
        }
    }

    Ok(Some(value))
}

fn absent<T>(at: EntryPath<'_>, required: bool) -> Result<Option<T>> {
    if required {
        return Err(Error::missing(at.dict, at.key));
    }
    Ok(None)
}

/// Integer entry.
pub fn validate_integer_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, i64>,
) -> Result<Option<i64>> {
    validate_entry::<IntegerKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Integer or real entry.
pub fn validate_number_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, f64>,
) -> Result<Option<f64>> {
    validate_entry::<NumberKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Name entry.
pub fn validate_name_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, String>,
) -> Result<Option<String>> {
    validate_entry::<NameKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Text string entry.
pub fn validate_string_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, String>,
) -> Result<Option<String>> {
    validate_entry::<StringKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Byte string entry.
pub fn validate_byte_string_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, Vec<u8>>,
) -> Result<Option<Vec<u8>>> {
    validate_entry::<ByteStringKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Date entry.
pub fn validate_date_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<String>> {
    validate_entry::<DateKind>(ctx, dict, dict_name, key, required, since, None)
}

/// Boolean entry.
pub fn validate_boolean_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, bool>,
) -> Result<Option<bool>> {
    validate_entry::<BooleanKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Dictionary entry.
pub fn validate_dict_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, Dictionary>,
) -> Result<Option<Dictionary>> {
    validate_entry::<DictKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Stream entry.
pub fn validate_stream_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, Stream>,
) -> Result<Option<Stream>> {
    validate_entry::<StreamKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Array entry.
pub fn validate_array_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, Vec<Object>>,
) -> Result<Option<Vec<Object>>> {
    validate_entry::<ArrayKind>(ctx, dict, dict_name, key, required, since, check)
}

/// Array-of-strings entry.
pub fn validate_string_array_entry(
    ctx: &ValidationContext<'_>,
    dict: &Dictionary,
    dict_name: &str,
    key: &str,
    required: bool,
    since: PdfVersion,
    check: Check<'_, Vec<Vec<u8>>>,
) -> Result<Option<Vec<Vec<u8>>>> {
    validate_entry::<StringArrayKind>(ctx, dict, dict_name, key, required, since, check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationOptions;
    use crate::object::ObjectRef;
    use crate::xref::CrossRefStore;

    fn dict_with(key: &str, value: Object) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert(key.to_string(), value);
        dict
    }

    fn ctx(store: &CrossRefStore) -> ValidationContext<'_> {
        ValidationContext::new(store, PdfVersion::V1_7, ValidationOptions::strict())
    }

    #[test]
    fn test_absent_optional_is_none() {
        let store = CrossRefStore::new();
        let dict = Dictionary::new();
        let value =
            validate_integer_entry(&ctx(&store), &dict, "d", "Size", false, PdfVersion::V1_0, None);
        assert_eq!(value.unwrap(), None);
    }

    #[test]
    fn test_absent_required_fails() {
        let store = CrossRefStore::new();
        let dict = Dictionary::new();
        let err = validate_name_entry(
            &ctx(&store),
            &dict,
            "d",
            "Type",
            true,
            PdfVersion::V1_0,
            None,
        )
        .unwrap_err();
        assert_eq!(err, Error::missing("d", "Type"));
    }

    #[test]
    fn test_null_slot_counts_as_absent() {
        let store = CrossRefStore::new();
        let dict = dict_with("Type", Object::Null);
        let err = validate_name_entry(
            &ctx(&store),
            &dict,
            "d",
            "Type",
            true,
            PdfVersion::V1_0,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }));
    }

    #[test]
    fn test_reference_to_null_counts_as_absent() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(3, 0), Object::Null);
        let dict = dict_with("V", Object::reference(3, 0));

        let value =
            validate_boolean_entry(&ctx(&store), &dict, "d", "V", false, PdfVersion::V1_2, None);
        assert_eq!(value.unwrap(), None);
    }

    #[test]
    fn test_value_is_dereferenced() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(3, 0), Object::Boolean(true));
        let dict = dict_with("V", Object::reference(3, 0));

        let value =
            validate_boolean_entry(&ctx(&store), &dict, "d", "V", true, PdfVersion::V1_2, None);
        assert_eq!(value.unwrap(), Some(true));
    }

    #[test]
    fn test_store_error_propagates() {
        let store = CrossRefStore::new();
        let dict = dict_with("V", Object::reference(9, 0));

        let err = validate_boolean_entry(
            &ctx(&store),
            &dict,
            "d",
            "V",
            false,
            PdfVersion::V1_2,
            None,
        )
        .unwrap_err();
        assert_eq!(err, Error::UnresolvedReference(ObjectRef::new(9, 0)));
    }

    #[test]
    fn test_wrong_kind_is_type_mismatch() {
        let store = CrossRefStore::new();
        let dict = dict_with("V", Object::Integer(1));

        let err = validate_boolean_entry(
            &ctx(&store),
            &dict,
            "d",
            "V",
            false,
            PdfVersion::V1_2,
            None,
        )
        .unwrap_err();
        assert_eq!(err, Error::mismatch("d", "V", "Boolean", "Integer"));
    }

    #[test]
    fn test_version_floor_only_warns() {
        let store = CrossRefStore::new();
        let ctx = ValidationContext::new(&store, PdfVersion::V1_0, ValidationOptions::strict());
        let dict = dict_with("CI", Object::Dictionary(Dictionary::new()));

        let value = validate_dict_entry(&ctx, &dict, "d", "CI", false, PdfVersion::V1_7, None);
        assert!(value.unwrap().is_some());
    }

    #[test]
    fn test_predicate_rejection_is_constraint_violation() {
        let store = CrossRefStore::new();
        let dict = dict_with("Type", Object::name("Page"));

        let err = validate_name_entry(
            &ctx(&store),
            &dict,
            "d",
            "Type",
            false,
            PdfVersion::V1_0,
            Some(&|s: &String| s == "Filespec"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation { ref field, .. } if field == "Type"));
    }

    #[test]
    fn test_string_accepts_hex_and_decodes_utf16() {
        let store = CrossRefStore::new();
        let dict = dict_with("Desc", Object::HexString(vec![0xFE, 0xFF, 0x00, b'h', 0x00, b'i']));

        let value =
            validate_string_entry(&ctx(&store), &dict, "d", "Desc", false, PdfVersion::V1_6, None);
        assert_eq!(value.unwrap().as_deref(), Some("hi"));
    }

    #[test]
    fn test_broken_utf16_string_is_violation() {
        let store = CrossRefStore::new();
        let dict = dict_with("Desc", Object::String(vec![0xFE, 0xFF, 0x00]));

        let err = validate_string_entry(
            &ctx(&store),
            &dict,
            "d",
            "Desc",
            false,
            PdfVersion::V1_6,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation { .. }));
    }

    #[test]
    fn test_date_entry() {
        let store = CrossRefStore::new();
        let good = dict_with("ModDate", Object::string("D:20230615"));
        let bad = dict_with("ModDate", Object::string("D:20230631"));

        let value =
            validate_date_entry(&ctx(&store), &good, "d", "ModDate", false, PdfVersion::V1_0);
        assert_eq!(value.unwrap().as_deref(), Some("D:20230615"));

        let err = validate_date_entry(&ctx(&store), &bad, "d", "ModDate", false, PdfVersion::V1_0)
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation { .. }));
    }

    #[test]
    fn test_string_array_dereferences_elements() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(2, 0), Object::HexString(vec![0xAB; 16]));
        let dict = dict_with(
            "ID",
            Object::Array(vec![Object::string("first"), Object::reference(2, 0)]),
        );

        let ids = validate_string_array_entry(
            &ctx(&store),
            &dict,
            "d",
            "ID",
            false,
            PdfVersion::V1_1,
            Some(&|arr: &Vec<Vec<u8>>| arr.len() == 2),
        )
        .unwrap()
        .unwrap();
        assert_eq!(ids[1], vec![0xAB; 16]);
    }

    #[test]
    fn test_string_array_rejects_non_string_element() {
        let store = CrossRefStore::new();
        let dict = dict_with("ID", Object::Array(vec![Object::string("a"), Object::Integer(1)]));

        let err = validate_string_array_entry(
            &ctx(&store),
            &dict,
            "d",
            "ID",
            false,
            PdfVersion::V1_1,
            None,
        )
        .unwrap_err();
        assert_eq!(err, Error::mismatch("d", "ID[1]", "String", "Integer"));
    }

    #[test]
    fn test_number_entry_widens_integers() {
        let store = CrossRefStore::new();
        let dict = dict_with("W", Object::Integer(3));
        let value =
            validate_number_entry(&ctx(&store), &dict, "d", "W", true, PdfVersion::V1_0, None);
        assert_eq!(value.unwrap(), Some(3.0));
    }
}
