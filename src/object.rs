//! PDF object types.
//!
//! The object model is plain data: construction plus tag inspection. All
//! semantic rules live in the validators.

use indexmap::IndexMap;
use std::fmt;

/// PDF dictionary. Keys are names without the leading slash.
pub type Dictionary = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// Name (starting with /)
    Name(String),
    /// Literal string `( ... )`, raw bytes
    String(Vec<u8>),
    /// Hexadecimal string `< ... >`, decoded bytes
    HexString(Vec<u8>),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dictionary),
    /// Stream (dictionary + data)
    Stream(Stream),
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Tag of an [`Object`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Integer number
    Integer,
    /// Real number
    Real,
    /// Name
    Name,
    /// Literal string
    String,
    /// Hex string
    HexString,
    /// Array
    Array,
    /// Dictionary
    Dictionary,
    /// Stream
    Stream,
    /// Indirect reference
    Reference,
}

impl ObjectKind {
    /// Human-readable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Null => "Null",
            ObjectKind::Boolean => "Boolean",
            ObjectKind::Integer => "Integer",
            ObjectKind::Real => "Real",
            ObjectKind::Name => "Name",
            ObjectKind::String => "String",
            ObjectKind::HexString => "HexString",
            ObjectKind::Array => "Array",
            ObjectKind::Dictionary => "Dictionary",
            ObjectKind::Stream => "Stream",
            ObjectKind::Reference => "Reference",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a stream's payload still has its filters applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Raw bytes as stored in the file
    #[default]
    Encoded,
    /// Filters have been applied
    Decoded,
}

/// Stream object: dictionary plus an opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Stream dictionary
    pub dict: Dictionary,
    /// Stream data
    pub data: bytes::Bytes,
    /// Decode state of `data`
    pub state: StreamState,
}

impl Stream {
    /// Create an encoded stream from its dictionary and raw payload.
    pub fn new(dict: Dictionary, data: impl Into<bytes::Bytes>) -> Self {
        Self {
            dict,
            data: data.into(),
            state: StreamState::Encoded,
        }
    }
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Tag of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Null => ObjectKind::Null,
            Object::Boolean(_) => ObjectKind::Boolean,
            Object::Integer(_) => ObjectKind::Integer,
            Object::Real(_) => ObjectKind::Real,
            Object::Name(_) => ObjectKind::Name,
            Object::String(_) => ObjectKind::String,
            Object::HexString(_) => ObjectKind::HexString,
            Object::Array(_) => ObjectKind::Array,
            Object::Dictionary(_) => ObjectKind::Dictionary,
            Object::Stream(_) => ObjectKind::Stream,
            Object::Reference(_) => ObjectKind::Reference,
        }
    }

    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Convenience constructor for a name object.
    pub fn name(s: impl Into<String>) -> Self {
        Object::Name(s.into())
    }

    /// Convenience constructor for a literal string object.
    pub fn string(s: impl AsRef<[u8]>) -> Self {
        Object::String(s.as_ref().to_vec())
    }

    /// Convenience constructor for a reference object.
    pub fn reference(id: u32, gen: u16) -> Self {
        Object::Reference(ObjectRef::new(id, gen))
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to stream.
    pub fn as_stream(&self) -> Option<&Stream> {
        match self {
            Object::Stream(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Object::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to cast to real number.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to string bytes. Literal and hex strings both qualify.
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) | Object::HexString(s) => Some(s),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}

impl From<Dictionary> for Object {
    fn from(dict: Dictionary) -> Self {
        Object::Dictionary(dict)
    }
}

impl From<Stream> for Object {
    fn from(stream: Stream) -> Self {
        Object::Stream(stream)
    }
}

impl From<ObjectRef> for Object {
    fn from(obj_ref: ObjectRef) -> Self {
        Object::Reference(obj_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_integer() {
        let obj = Object::Integer(42);
        assert_eq!(obj.as_integer(), Some(42));
        assert!(obj.as_name().is_none());
        assert!(!obj.is_null());
        assert_eq!(obj.kind(), ObjectKind::Integer);
    }

    #[test]
    fn test_object_name() {
        let obj = Object::name("Type");
        assert_eq!(obj.as_name(), Some("Type"));
        assert!(obj.as_integer().is_none());
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_object_real() {
        let obj = Object::Real(3.14);
        assert_eq!(obj.as_real(), Some(3.14));
        assert_eq!(obj.type_name(), "Real");
    }

    #[test]
    fn test_literal_and_hex_strings_are_distinct_kinds() {
        let lit = Object::string("Hello");
        let hex = Object::HexString(b"Hello".to_vec());

        assert_eq!(lit.kind(), ObjectKind::String);
        assert_eq!(hex.kind(), ObjectKind::HexString);
        assert_ne!(lit, hex);
        assert_eq!(lit.as_string(), hex.as_string());
    }

    #[test]
    fn test_object_stream_dict_access() {
        let mut dict = Dictionary::new();
        dict.insert("Length".to_string(), Object::Integer(100));
        let obj = Object::Stream(Stream::new(dict, &b"stream data"[..]));

        let d = obj.as_dict().unwrap();
        assert_eq!(d.get("Length").unwrap().as_integer(), Some(100));
        assert_eq!(obj.as_stream().unwrap().state, StreamState::Encoded);
    }

    #[test]
    fn test_dictionary_equality_ignores_insertion_order() {
        let mut a = Dictionary::new();
        a.insert("F".to_string(), Object::Integer(1));
        a.insert("UF".to_string(), Object::Integer(2));

        let mut b = Dictionary::new();
        b.insert("UF".to_string(), Object::Integer(2));
        b.insert("F".to_string(), Object::Integer(1));

        assert_eq!(Object::Dictionary(a), Object::Dictionary(b));
    }

    #[test]
    fn test_object_reference() {
        let obj_ref = ObjectRef::new(10, 0);
        let obj = Object::from(obj_ref);

        assert_eq!(obj.as_reference(), Some(obj_ref));
        assert_eq!(obj.kind(), ObjectKind::Reference);
        assert_eq!(format!("{}", obj_ref), "10 0 R");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ObjectKind::Dictionary.to_string(), "Dictionary");
        assert_eq!(Object::Null.type_name(), "Null");
    }
}
