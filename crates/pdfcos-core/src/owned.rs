//! The writable object model.
//!
//! [`OwnedObject`], [`OwnedDict`], and [`OwnedArray`] are the concrete,
//! engine-free implementation of the abstract contract, used to build new
//! object graphs for output (e.g., embedding georeferencing metadata into a
//! document). Graphs are built bottom-up: composites are assembled with
//! `insert`/`push`, then moved into an [`OwnedObject`], which owns them
//! exclusively from that point on.
//!
//! Deep cloning from *any* contract implementation into the writable model
//! lives here too ([`to_owned_object`]): an object carrying a reference
//! identity clones to an indirect placeholder without ever dereferencing.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::object::{
    CosArray, CosDict, CosObject, DEFAULT_REAL_PRECISION, ObjectHandle, ObjectKind, ObjectRef,
};

#[derive(Debug)]
enum Payload {
    Null,
    Bool(bool),
    Int(i64),
    Real {
        value: f64,
        precision: usize,
        as_string: bool,
    },
    String(String),
    Name(String),
    Array(Rc<OwnedArray>),
    Dict(Rc<OwnedDict>),
    /// Placeholder for an indirect reference; the identity lives in `ref_id`.
    Indirect,
}

/// A concrete, exclusively-owning PDF object.
#[derive(Debug)]
pub struct OwnedObject {
    payload: Payload,
    ref_id: Option<ObjectRef>,
}

impl OwnedObject {
    fn new(payload: Payload) -> Self {
        Self {
            payload,
            ref_id: None,
        }
    }

    /// The `null` object.
    pub fn null() -> Self {
        Self::new(Payload::Null)
    }

    /// A boolean object.
    pub fn boolean(value: bool) -> Self {
        Self::new(Payload::Bool(value))
    }

    /// An integer object.
    pub fn int(value: i64) -> Self {
        Self::new(Payload::Int(value))
    }

    /// A real object serialized at the default precision.
    pub fn real(value: f64) -> Self {
        Self::new(Payload::Real {
            value,
            precision: DEFAULT_REAL_PRECISION,
            as_string: false,
        })
    }

    /// A real object serialized at a fixed precision.
    pub fn real_with_precision(value: f64, precision: usize) -> Self {
        Self::new(Payload::Real {
            value,
            precision,
            as_string: false,
        })
    }

    /// A real object serialized as a string of significant digits,
    /// the form used by OGC best-practice numeric fields.
    pub fn real_as_string(value: f64) -> Self {
        Self::new(Payload::Real {
            value,
            precision: DEFAULT_REAL_PRECISION,
            as_string: true,
        })
    }

    /// A text string object.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Payload::String(value.into()))
    }

    /// A name object.
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Payload::Name(value.into()))
    }

    /// A dictionary object, taking exclusive ownership of `dict`.
    pub fn dictionary(dict: OwnedDict) -> Self {
        Self::new(Payload::Dict(Rc::new(dict)))
    }

    /// An array object, taking exclusive ownership of `array`.
    pub fn array(array: OwnedArray) -> Self {
        Self::new(Payload::Array(Rc::new(array)))
    }

    /// An indirect-reference placeholder: carries only `(num, gen)`.
    ///
    /// Serializes as `num gen R`; it has no value of its own.
    pub fn indirect(num: u32, generation: u16) -> Self {
        Self {
            payload: Payload::Indirect,
            ref_id: ObjectRef::from_parts(num, generation),
        }
    }
}

impl CosObject for OwnedObject {
    fn kind(&self) -> ObjectKind {
        match self.payload {
            Payload::Null => ObjectKind::Null,
            Payload::Bool(_) => ObjectKind::Bool,
            Payload::Int(_) => ObjectKind::Int,
            Payload::Real { .. } => ObjectKind::Real,
            Payload::String(_) => ObjectKind::String,
            Payload::Name(_) => ObjectKind::Name,
            Payload::Array(_) => ObjectKind::Array,
            Payload::Dict(_) => ObjectKind::Dictionary,
            Payload::Indirect => ObjectKind::Unknown,
        }
    }

    fn native_type_name(&self) -> &'static str {
        match self.payload {
            Payload::Indirect => "indirect",
            _ => "",
        }
    }

    fn as_bool(&self) -> bool {
        match self.payload {
            Payload::Bool(v) => v,
            _ => false,
        }
    }

    fn as_int(&self) -> i64 {
        match self.payload {
            Payload::Int(v) => v,
            _ => 0,
        }
    }

    fn as_real(&self) -> f64 {
        match self.payload {
            Payload::Real { value, .. } => value,
            _ => 0.0,
        }
    }

    fn as_string(&self) -> String {
        match &self.payload {
            Payload::String(v) => v.clone(),
            _ => String::new(),
        }
    }

    fn as_name(&self) -> String {
        match &self.payload {
            Payload::Name(v) => v.clone(),
            _ => String::new(),
        }
    }

    fn dict(&self) -> Option<Rc<dyn CosDict>> {
        match &self.payload {
            Payload::Dict(d) => Some(d.clone() as Rc<dyn CosDict>),
            _ => None,
        }
    }

    fn array(&self) -> Option<Rc<dyn CosArray>> {
        match &self.payload {
            Payload::Array(a) => Some(a.clone() as Rc<dyn CosArray>),
            _ => None,
        }
    }

    fn indirect_ref(&self) -> Option<ObjectRef> {
        self.ref_id
    }

    fn precision(&self) -> usize {
        match self.payload {
            Payload::Real { precision, .. } => precision,
            _ => DEFAULT_REAL_PRECISION,
        }
    }

    fn real_as_string(&self) -> bool {
        match self.payload {
            Payload::Real { as_string, .. } => as_string,
            _ => false,
        }
    }
}

/// A writable dictionary with insertion-ordered entries.
#[derive(Debug, Default)]
pub struct OwnedDict {
    entries: IndexMap<String, Rc<OwnedObject>>,
}

impl OwnedDict {
    /// An empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, taking ownership of `value`.
    ///
    /// Overwrites (and drops) any previous occupant of `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: OwnedObject) -> &mut Self {
        self.entries.insert(key.into(), Rc::new(value));
        self
    }

    /// Remove an entry, dropping its value. No-op when absent.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.entries.shift_remove(key);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CosDict for OwnedDict {
    fn get(&self, key: &str) -> Option<ObjectHandle> {
        self.entries
            .get(key)
            .map(|obj| obj.clone() as ObjectHandle)
    }

    fn entries(&self) -> Vec<(String, ObjectHandle)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone() as ObjectHandle))
            .collect()
    }
}

/// A writable array that grows dynamically.
#[derive(Debug, Default)]
pub struct OwnedArray {
    items: Vec<Rc<OwnedObject>>,
}

impl OwnedArray {
    /// An empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element, taking ownership of `value`.
    pub fn push(&mut self, value: OwnedObject) -> &mut Self {
        self.items.push(Rc::new(value));
        self
    }

    /// Append a run of real numbers, optionally string-representable.
    pub fn push_reals(&mut self, values: &[f64], as_string: bool) -> &mut Self {
        for &value in values {
            let obj = if as_string {
                OwnedObject::real_as_string(value)
            } else {
                OwnedObject::real(value)
            };
            self.items.push(Rc::new(obj));
        }
        self
    }
}

impl CosArray for OwnedArray {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<ObjectHandle> {
        self.items.get(index).map(|obj| obj.clone() as ObjectHandle)
    }
}

/// Deep-copy any contract object into the writable model.
///
/// An object carrying a reference identity clones to an indirect placeholder
/// (the reference is never dereferenced). Composites deep-copy every child
/// through the contract. [`ObjectKind::Unknown`] objects cannot be cloned;
/// a warning is logged and `None` returned.
pub fn to_owned_object(obj: &dyn CosObject) -> Option<OwnedObject> {
    if let Some(r) = obj.indirect_ref() {
        return Some(OwnedObject::indirect(r.num, r.generation));
    }

    match obj.kind() {
        ObjectKind::Null => Some(OwnedObject::null()),
        ObjectKind::Bool => Some(OwnedObject::boolean(obj.as_bool())),
        ObjectKind::Int => Some(OwnedObject::int(obj.as_int())),
        ObjectKind::Real => Some(if obj.real_as_string() {
            OwnedObject::real_as_string(obj.as_real())
        } else {
            OwnedObject::real_with_precision(obj.as_real(), obj.precision())
        }),
        ObjectKind::String => Some(OwnedObject::string(obj.as_string())),
        ObjectKind::Name => Some(OwnedObject::name(obj.as_name())),
        ObjectKind::Array => Some(OwnedObject::array(to_owned_array(&*obj.array()?))),
        ObjectKind::Dictionary => Some(OwnedObject::dictionary(to_owned_dict(&*obj.dict()?))),
        ObjectKind::Unknown => {
            log::warn!("cannot clone object of unknown type");
            None
        }
    }
}

/// Deep-copy a dictionary into the writable model.
///
/// Children that cannot be cloned are skipped with a warning.
pub fn to_owned_dict(dict: &dyn CosDict) -> OwnedDict {
    let mut clone = OwnedDict::new();
    for (key, value) in dict.entries() {
        match to_owned_object(&*value) {
            Some(child) => {
                clone.insert(key, child);
            }
            None => log::warn!("skipping unclonable dictionary entry /{key}"),
        }
    }
    clone
}

/// Deep-copy an array into the writable model.
pub fn to_owned_array(array: &dyn CosArray) -> OwnedArray {
    let mut clone = OwnedArray::new();
    for index in 0..array.len() {
        match array.get(index).as_deref().and_then(to_owned_object) {
            Some(child) => {
                clone.push(child);
            }
            None => log::warn!("skipping unclonable array element [{index}]"),
        }
    }
    clone
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_produce_expected_kinds_and_values() {
        assert_eq!(OwnedObject::null().kind(), ObjectKind::Null);
        assert!(OwnedObject::boolean(true).as_bool());
        assert_eq!(OwnedObject::int(-42).as_int(), -42);
        assert_eq!(OwnedObject::real(1.5).as_real(), 1.5);
        assert_eq!(OwnedObject::string("hello").as_string(), "hello");
        assert_eq!(OwnedObject::name("Catalog").as_name(), "Catalog");
    }

    #[test]
    fn real_precision_and_string_flag() {
        let r = OwnedObject::real_with_precision(3.25, 2);
        assert_eq!(r.precision(), 2);
        assert!(!r.real_as_string());

        let s = OwnedObject::real_as_string(3.25);
        assert!(s.real_as_string());
    }

    #[test]
    fn indirect_placeholder_has_ref_and_unknown_kind() {
        let obj = OwnedObject::indirect(12, 0);
        assert_eq!(obj.kind(), ObjectKind::Unknown);
        assert_eq!(obj.indirect_ref(), Some(ObjectRef { num: 12, generation: 0 }));
        assert_eq!(obj.type_name(), "indirect");
    }

    #[test]
    fn direct_objects_have_no_ref() {
        assert!(OwnedObject::int(5).indirect_ref().is_none());
    }

    #[test]
    fn dict_insert_overwrites_previous_value() {
        let mut dict = OwnedDict::new();
        dict.insert("K", OwnedObject::int(1));
        dict.insert("K", OwnedObject::int(2));
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("K").unwrap().as_int(), 2);
    }

    #[test]
    fn dict_remove_drops_entry_and_tolerates_absent_keys() {
        let mut dict = OwnedDict::new();
        dict.insert("K", OwnedObject::int(1));
        dict.remove("K").remove("NeverThere");
        assert!(dict.is_empty());
        assert!(dict.get("K").is_none());
    }

    #[test]
    fn dict_entries_preserve_insertion_order() {
        let mut dict = OwnedDict::new();
        dict.insert("Zebra", OwnedObject::int(1))
            .insert("Alpha", OwnedObject::int(2))
            .insert("Mid", OwnedObject::int(3));
        let keys: Vec<String> = dict.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Zebra", "Alpha", "Mid"]);
    }

    #[test]
    fn array_push_and_get() {
        let mut array = OwnedArray::new();
        array.push(OwnedObject::int(10)).push(OwnedObject::int(20));
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(1).unwrap().as_int(), 20);
        assert!(array.get(2).is_none());
    }

    #[test]
    fn array_push_reals() {
        let mut array = OwnedArray::new();
        array.push_reals(&[1.0, 2.5], false);
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(1).unwrap().as_real(), 2.5);
    }

    #[test]
    fn clone_is_structurally_equal_but_independent() {
        let mut inner = OwnedDict::new();
        inner.insert("Count", OwnedObject::int(2));
        let mut dict = OwnedDict::new();
        dict.insert("Pages", OwnedObject::dictionary(inner));
        dict.insert("Version", OwnedObject::name("1.5"));

        let mut clone = to_owned_dict(&dict);
        assert_eq!(clone.len(), 2);
        assert_eq!(clone.lookup("Pages.Count").unwrap().as_int(), 2);

        // Mutating the clone must not affect the original.
        clone.insert("Version", OwnedObject::name("2.0"));
        clone.remove("Pages");
        assert_eq!(dict.get("Version").unwrap().as_name(), "1.5");
        assert_eq!(dict.lookup("Pages.Count").unwrap().as_int(), 2);
    }

    #[test]
    fn clone_of_referenced_object_is_indirect_placeholder() {
        let obj = OwnedObject::indirect(7, 1);
        let clone = to_owned_object(&obj).unwrap();
        assert_eq!(clone.kind(), ObjectKind::Unknown);
        assert_eq!(clone.indirect_ref(), Some(ObjectRef { num: 7, generation: 1 }));
    }

    #[test]
    fn clone_preserves_real_flags() {
        let clone = to_owned_object(&OwnedObject::real_with_precision(1.25, 4)).unwrap();
        assert_eq!(clone.precision(), 4);

        let clone = to_owned_object(&OwnedObject::real_as_string(1.25)).unwrap();
        assert!(clone.real_as_string());
    }

    #[test]
    fn clone_of_array_deep_copies_elements() {
        let mut array = OwnedArray::new();
        array
            .push(OwnedObject::int(1))
            .push(OwnedObject::string("two"));
        let clone = to_owned_array(&array);
        assert_eq!(clone.len(), 2);
        assert_eq!(clone.get(0).unwrap().as_int(), 1);
        assert_eq!(clone.get(1).unwrap().as_string(), "two");
    }
}
