//! Cross-reference store.
//!
//! Maps object numbers to either an already-parsed value or a locator the
//! loader can materialize on demand. Dereferencing follows reference chains
//! with a per-call in-progress set and a length bound, so self-referential
//! or pathologically long chains fail instead of looping.

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef, Stream};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Where a not-yet-parsed object lives in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Uncompressed object at a byte offset
    Offset(u64),
    /// Object stored inside an object stream (PDF 1.5+)
    InObjectStream {
        /// Object number of the containing object stream
        stream: u32,
        /// Index within the object stream
        index: u16,
    },
}

/// Cross-reference store entry.
#[derive(Debug, Clone, PartialEq)]
pub enum XRefEntry {
    /// Value is already in memory
    Resolved(Object),
    /// Value must be materialized through the [`ObjectSource`]
    Deferred(Locator),
}

impl From<Object> for XRefEntry {
    fn from(obj: Object) -> Self {
        XRefEntry::Resolved(obj)
    }
}

impl From<Locator> for XRefEntry {
    fn from(locator: Locator) -> Self {
        XRefEntry::Deferred(locator)
    }
}

/// Materializes deferred entries. Implemented by the document loader.
pub trait ObjectSource {
    /// Parse the object stored at `locator`.
    fn materialize(&self, obj_ref: ObjectRef, locator: &Locator) -> Result<Object>;
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u16,
    entry: XRefEntry,
}

/// Cross-reference store mapping object numbers to values or locators.
///
/// The store is built once by the loader and is read-only for validators.
/// Materialized objects are cached behind a `RefCell`, so the store is not
/// `Sync`; call [`CrossRefStore::materialize_all`] first when the resolved
/// graph has to be shared.
///
/// # Example
///
/// ```
/// use pdf_attest::object::{Object, ObjectRef};
/// use pdf_attest::xref::CrossRefStore;
///
/// let mut store = CrossRefStore::new();
/// store.register(ObjectRef::new(1, 0), Object::Integer(42));
///
/// let value = store.dereference(&Object::reference(1, 0))?;
/// assert_eq!(value, Object::Integer(42));
/// # Ok::<(), pdf_attest::error::Error>(())
/// ```
pub struct CrossRefStore {
    entries: HashMap<u32, Slot>,
    /// Objects materialized from deferred entries
    cache: RefCell<HashMap<u32, Object>>,
    source: Option<Box<dyn ObjectSource>>,
    trailer: Option<Dictionary>,
}

impl std::fmt::Debug for CrossRefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossRefStore")
            .field("entries", &self.entries.len())
            .field("cached_objects", &self.cache.borrow().len())
            .field("has_source", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for CrossRefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossRefStore {
    /// Longest reference chain [`CrossRefStore::dereference`] will follow.
    pub const MAX_CHAIN_LENGTH: u32 = 50;

    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            cache: RefCell::new(HashMap::new()),
            source: None,
            trailer: None,
        }
    }

    /// Create a store that materializes deferred entries through `source`.
    pub fn with_source(source: Box<dyn ObjectSource>) -> Self {
        Self {
            source: Some(source),
            ..Self::new()
        }
    }

    /// Set the trailer dictionary.
    pub fn set_trailer(&mut self, trailer: Dictionary) {
        self.trailer = Some(trailer);
    }

    /// Get the trailer dictionary if present.
    pub fn trailer(&self) -> Option<&Dictionary> {
        self.trailer.as_ref()
    }

    /// Insert or overwrite the entry for `obj_ref`.
    ///
    /// Entries are keyed by object number; the last registration for a
    /// number wins regardless of generation, as with incremental updates.
    pub fn register(&mut self, obj_ref: ObjectRef, entry: impl Into<XRefEntry>) {
        self.cache.get_mut().remove(&obj_ref.id);
        self.entries.insert(
            obj_ref.id,
            Slot {
                generation: obj_ref.gen,
                entry: entry.into(),
            },
        );
    }

    /// Get the entry for an object number.
    pub fn get(&self, object_number: u32) -> Option<&XRefEntry> {
        self.entries.get(&object_number).map(|slot| &slot.entry)
    }

    /// Current generation registered for an object number.
    pub fn generation(&self, object_number: u32) -> Option<u16> {
        self.entries.get(&object_number).map(|slot| slot.generation)
    }

    /// Check if an object number is registered.
    pub fn contains(&self, object_number: u32) -> bool {
        self.entries.contains_key(&object_number)
    }

    /// Merge entries from an older store (the section a /Prev pointer names).
    ///
    /// Entries already in `self` win.
    pub fn merge_from(&mut self, older: CrossRefStore) {
        for (obj_num, slot) in older.entries {
            self.entries.entry(obj_num).or_insert(slot);
        }

        if self.trailer.is_none() && older.trailer.is_some() {
            self.trailer = older.trailer;
        }
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `obj` if it is an indirect reference; direct values are
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::UnresolvedReference`] if an object in the chain is not registered
    /// - [`Error::ReferenceCycle`] if the chain revisits an object or is longer
    ///   than [`CrossRefStore::MAX_CHAIN_LENGTH`]
    /// - whatever the [`ObjectSource`] returns when materialization fails
    pub fn dereference(&self, obj: &Object) -> Result<Object> {
        self.dereference_bounded(obj, Self::MAX_CHAIN_LENGTH)
    }

    /// [`CrossRefStore::dereference`] with an explicit chain-length bound.
    pub fn dereference_bounded(&self, obj: &Object, max_chain: u32) -> Result<Object> {
        let mut current = match obj {
            Object::Reference(obj_ref) => *obj_ref,
            direct => return Ok(direct.clone()),
        };

        let mut in_progress: HashSet<u32> = HashSet::new();
        loop {
            if !in_progress.insert(current.id) {
                log::error!("Circular reference detected for object {}", current);
                return Err(Error::ReferenceCycle(current));
            }
            if in_progress.len() as u32 > max_chain {
                log::error!(
                    "Reference chain longer than {} while resolving object {}",
                    max_chain,
                    current
                );
                return Err(Error::ReferenceCycle(current));
            }

            match self.load(current)? {
                Object::Reference(next) => current = next,
                value => return Ok(value),
            }
        }
    }

    /// Dereference and require a dictionary.
    pub fn dereference_dict(&self, obj: &Object) -> Result<Dictionary> {
        match self.dereference(obj)? {
            Object::Dictionary(dict) => Ok(dict),
            other => Err(unexpected("Dictionary", &other)),
        }
    }

    /// Dereference and require an array.
    pub fn dereference_array(&self, obj: &Object) -> Result<Vec<Object>> {
        match self.dereference(obj)? {
            Object::Array(arr) => Ok(arr),
            other => Err(unexpected("Array", &other)),
        }
    }

    /// Dereference and require a stream.
    pub fn dereference_stream(&self, obj: &Object) -> Result<Stream> {
        match self.dereference(obj)? {
            Object::Stream(stream) => Ok(stream),
            other => Err(unexpected("Stream", &other)),
        }
    }

    /// Document catalog, via the trailer's /Root entry.
    pub fn catalog(&self) -> Result<Dictionary> {
        let root = self
            .trailer
            .as_ref()
            .and_then(|trailer| trailer.get("Root"))
            .ok_or_else(|| Error::InvalidPdf("trailer has no /Root entry".to_string()))?;
        self.dereference_dict(root)
    }

    /// Materialize every deferred entry in place.
    ///
    /// Afterwards dereferencing never touches the cache or the source.
    pub fn materialize_all(&mut self) -> Result<()> {
        let deferred: Vec<(u32, u16, Locator)> = self
            .entries
            .iter()
            .filter_map(|(&id, slot)| match slot.entry {
                XRefEntry::Deferred(locator) => Some((id, slot.generation, locator)),
                XRefEntry::Resolved(_) => None,
            })
            .collect();

        for (id, generation, locator) in deferred {
            let obj_ref = ObjectRef::new(id, generation);
            let obj = self.materialize(obj_ref, &locator)?;
            if let Some(slot) = self.entries.get_mut(&id) {
                slot.entry = XRefEntry::Resolved(obj);
            }
        }

        self.cache.get_mut().clear();
        Ok(())
    }

    /// Value stored for one object, without following further references.
    fn load(&self, obj_ref: ObjectRef) -> Result<Object> {
        log::debug!("Loading object {} gen {}", obj_ref.id, obj_ref.gen);

        let slot = self
            .entries
            .get(&obj_ref.id)
            .ok_or(Error::UnresolvedReference(obj_ref))?;

        if slot.generation != obj_ref.gen {
            log::debug!(
                "  → Object {} requested with gen {}, resolving current gen {}",
                obj_ref.id,
                obj_ref.gen,
                slot.generation
            );
        }

        match &slot.entry {
            XRefEntry::Resolved(obj) => Ok(obj.clone()),
            XRefEntry::Deferred(locator) => {
                if let Some(cached) = self.cache.borrow().get(&obj_ref.id) {
                    log::debug!("  → Found in cache");
                    return Ok(cached.clone());
                }

                let obj = self.materialize(obj_ref, locator)?;
                self.cache.borrow_mut().insert(obj_ref.id, obj.clone());
                Ok(obj)
            },
        }
    }

    fn materialize(&self, obj_ref: ObjectRef, locator: &Locator) -> Result<Object> {
        match &self.source {
            Some(source) => {
                log::debug!("  → Materializing {} from {:?}", obj_ref, locator);
                source.materialize(obj_ref, locator)
            },
            None => {
                log::warn!("Object {} is deferred but no object source is attached", obj_ref);
                Err(Error::UnresolvedReference(obj_ref))
            },
        }
    }
}

fn unexpected(expected: &str, found: &Object) -> Error {
    Error::UnexpectedType {
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Source that hands out integers and counts how often it is asked.
    struct CountingSource {
        calls: Rc<Cell<usize>>,
    }

    impl ObjectSource for CountingSource {
        fn materialize(&self, obj_ref: ObjectRef, locator: &Locator) -> Result<Object> {
            self.calls.set(self.calls.get() + 1);
            match locator {
                Locator::Offset(offset) => Ok(Object::Integer(*offset as i64)),
                Locator::InObjectStream { .. } => Err(Error::InvalidPdf(format!(
                    "object stream for {} is damaged",
                    obj_ref
                ))),
            }
        }
    }

    fn counting_store() -> (CrossRefStore, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let store = CrossRefStore::with_source(Box::new(CountingSource {
            calls: Rc::clone(&calls),
        }));
        (store, calls)
    }

    #[test]
    fn test_direct_value_is_identity() {
        let store = CrossRefStore::new();
        let obj = Object::name("Filespec");
        assert_eq!(store.dereference(&obj).unwrap(), obj);
    }

    #[test]
    fn test_unregistered_reference_fails() {
        let store = CrossRefStore::new();
        let err = store.dereference(&Object::reference(7, 0)).unwrap_err();
        assert_eq!(err, Error::UnresolvedReference(ObjectRef::new(7, 0)));
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(1, 0), Object::reference(1, 0));

        let err = store.dereference(&Object::reference(1, 0)).unwrap_err();
        assert_eq!(err, Error::ReferenceCycle(ObjectRef::new(1, 0)));
    }

    #[test]
    fn test_chain_follows_to_value() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(1, 0), Object::reference(2, 0));
        store.register(ObjectRef::new(2, 0), Object::reference(3, 0));
        store.register(ObjectRef::new(3, 0), Object::Boolean(true));

        assert_eq!(store.dereference(&Object::reference(1, 0)).unwrap(), Object::Boolean(true));
    }

    #[test]
    fn test_long_chain_without_repeat_is_rejected() {
        let mut store = CrossRefStore::new();
        for id in 1..=60u32 {
            store.register(ObjectRef::new(id, 0), Object::reference(id + 1, 0));
        }
        store.register(ObjectRef::new(61, 0), Object::Null);

        let err = store.dereference(&Object::reference(1, 0)).unwrap_err();
        assert!(matches!(err, Error::ReferenceCycle(_)));

        // Starting near the end of the chain stays within the bound.
        assert_eq!(store.dereference(&Object::reference(40, 0)).unwrap(), Object::Null);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(4, 0), Object::Integer(1));
        store.register(ObjectRef::new(4, 1), Object::Integer(2));

        assert_eq!(store.len(), 1);
        assert_eq!(store.generation(4), Some(1));
        // Any generation resolves to the current value.
        assert_eq!(store.dereference(&Object::reference(4, 0)).unwrap(), Object::Integer(2));
    }

    #[test]
    fn test_deferred_entry_is_materialized_once() {
        let (mut store, calls) = counting_store();
        store.register(ObjectRef::new(5, 0), Locator::Offset(1234));

        let first = store.dereference(&Object::reference(5, 0)).unwrap();
        let second = store.dereference(&Object::reference(5, 0)).unwrap();

        assert_eq!(first, Object::Integer(1234));
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_source_failure_propagates() {
        let (mut store, _) = counting_store();
        store.register(ObjectRef::new(6, 0), Locator::InObjectStream { stream: 2, index: 0 });

        let err = store.dereference(&Object::reference(6, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidPdf(_)));
    }

    #[test]
    fn test_deferred_without_source_is_unresolved() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(8, 0), Locator::Offset(10));

        let err = store.dereference(&Object::reference(8, 0)).unwrap_err();
        assert_eq!(err, Error::UnresolvedReference(ObjectRef::new(8, 0)));
    }

    #[test]
    fn test_register_evicts_cached_value() {
        let (mut store, calls) = counting_store();
        store.register(ObjectRef::new(5, 0), Locator::Offset(1));
        store.dereference(&Object::reference(5, 0)).unwrap();

        store.register(ObjectRef::new(5, 0), Locator::Offset(2));
        assert_eq!(store.dereference(&Object::reference(5, 0)).unwrap(), Object::Integer(2));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_materialize_all_resolves_in_place() {
        let (mut store, calls) = counting_store();
        store.register(ObjectRef::new(1, 0), Locator::Offset(11));
        store.register(ObjectRef::new(2, 0), Object::Null);

        store.materialize_all().unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(store.get(1), Some(&XRefEntry::Resolved(Object::Integer(11))));

        store.dereference(&Object::reference(1, 0)).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_typed_wrappers() {
        let mut store = CrossRefStore::new();
        store.register(ObjectRef::new(1, 0), Object::Array(vec![]));
        store.register(ObjectRef::new(2, 0), Object::Dictionary(Dictionary::new()));

        assert!(store.dereference_array(&Object::reference(1, 0)).unwrap().is_empty());
        assert!(store.dereference_dict(&Object::reference(2, 0)).unwrap().is_empty());

        let err = store.dereference_stream(&Object::reference(2, 0)).unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedType {
                expected: "Stream".to_string(),
                found: "Dictionary".to_string(),
            }
        );
    }

    #[test]
    fn test_merge_from_keeps_newer_entries() {
        let mut newer = CrossRefStore::new();
        newer.register(ObjectRef::new(1, 0), Object::Integer(2));

        let mut older = CrossRefStore::new();
        older.register(ObjectRef::new(1, 0), Object::Integer(1));
        older.register(ObjectRef::new(2, 0), Object::Integer(3));
        let mut trailer = Dictionary::new();
        trailer.insert("Size".to_string(), Object::Integer(3));
        older.set_trailer(trailer);

        newer.merge_from(older);
        assert_eq!(newer.get(1), Some(&XRefEntry::Resolved(Object::Integer(2))));
        assert_eq!(newer.get(2), Some(&XRefEntry::Resolved(Object::Integer(3))));
        assert!(newer.trailer().is_some());
    }

    #[test]
    fn test_catalog_requires_root() {
        let mut store = CrossRefStore::new();
        assert!(matches!(store.catalog(), Err(Error::InvalidPdf(_))));

        let mut catalog = Dictionary::new();
        catalog.insert("Type".to_string(), Object::name("Catalog"));
        store.register(ObjectRef::new(1, 0), Object::Dictionary(catalog));

        let mut trailer = Dictionary::new();
        trailer.insert("Root".to_string(), Object::reference(1, 0));
        store.set_trailer(trailer);

        let catalog = store.catalog().unwrap();
        assert_eq!(catalog.get("Type").and_then(Object::as_name), Some("Catalog"));
    }
}
