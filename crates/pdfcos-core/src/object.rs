//! The abstract PDF object contract.
//!
//! Defines the [`CosObject`] trait that every engine adapter and the writable
//! model implement, together with its composite companions [`CosDict`],
//! [`CosArray`], and [`CosStream`]. This enables pluggable backends: callers
//! navigate, serialize, and clone object graphs through these traits without
//! knowing which engine parsed the document.
//!
//! Handles are `Rc`-based and the lazy caches behind them use `RefCell`/
//! `OnceCell`, so a graph is owned by a single logical thread; callers that
//! need cross-thread access must confine each document to one thread.

use std::rc::Rc;

/// Default number of fraction digits used when serializing real numbers.
pub const DEFAULT_REAL_PRECISION: usize = 16;

/// The kind of a PDF object.
///
/// Streams present as [`Dictionary`](ObjectKind::Dictionary) (their metadata
/// dictionary) with the payload reachable through [`CosObject::stream`].
/// `Unknown` covers unresolved references and engine-specific types that have
/// no counterpart in this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Unresolved or engine-specific object.
    Unknown,
    /// The `null` object.
    Null,
    /// `true` or `false`.
    Bool,
    /// Integer number.
    Int,
    /// Real (floating-point) number.
    Real,
    /// Text or byte string.
    String,
    /// Name (written `/Name`).
    Name,
    /// Ordered sequence of objects.
    Array,
    /// Key/value mapping (also the face of streams).
    Dictionary,
}

/// Identity of an indirect object: object number and generation number.
///
/// The PDF convention "object number 0 means not an indirect reference" is
/// expressed as `Option<ObjectRef>` throughout this crate; a constructed
/// `ObjectRef` always has a non-zero `num`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number (never 0).
    pub num: u32,
    /// Generation number.
    pub generation: u16,
}

impl ObjectRef {
    /// Create a reference identity, mapping the num-0 sentinel to `None`.
    pub fn from_parts(num: u32, generation: u16) -> Option<Self> {
        if num == 0 { None } else { Some(Self { num, generation }) }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.num, self.generation)
    }
}

/// Shared handle to an object in the abstract model.
pub type ObjectHandle = Rc<dyn CosObject>;

/// A PDF object of any kind, read through the abstract contract.
///
/// Typed accessors are valid only when [`kind`](CosObject::kind) matches;
/// on a mismatch they return a zero/empty default rather than panicking, so
/// callers probing a malformed document see missing values, not crashes.
pub trait CosObject {
    /// The kind of this object.
    fn kind(&self) -> ObjectKind;

    /// Engine-native type name, used for [`ObjectKind::Unknown`] objects.
    fn native_type_name(&self) -> &'static str {
        ""
    }

    /// Human-readable type name.
    fn type_name(&self) -> &'static str {
        match self.kind() {
            ObjectKind::Unknown => self.native_type_name(),
            ObjectKind::Null => "null",
            ObjectKind::Bool => "bool",
            ObjectKind::Int => "int",
            ObjectKind::Real => "real",
            ObjectKind::String => "string",
            ObjectKind::Name => "name",
            ObjectKind::Array => "array",
            ObjectKind::Dictionary => "dictionary",
        }
    }

    /// Boolean value; `false` unless this is a [`ObjectKind::Bool`].
    fn as_bool(&self) -> bool {
        false
    }

    /// Integer value; `0` unless this is an [`ObjectKind::Int`].
    fn as_int(&self) -> i64 {
        0
    }

    /// Real value; `0.0` unless this is a [`ObjectKind::Real`].
    fn as_real(&self) -> f64 {
        0.0
    }

    /// Decoded text value; empty unless this is a [`ObjectKind::String`].
    fn as_string(&self) -> String {
        String::new()
    }

    /// Name value; empty unless this is a [`ObjectKind::Name`].
    fn as_name(&self) -> String {
        String::new()
    }

    /// Dictionary view of this object.
    ///
    /// Built on first access and cached for the object's lifetime: repeated
    /// calls return the identical (pointer-equal) instance. `None` when the
    /// kind does not match.
    fn dict(&self) -> Option<Rc<dyn CosDict>> {
        None
    }

    /// Array view of this object; same caching contract as
    /// [`dict`](CosObject::dict).
    fn array(&self) -> Option<Rc<dyn CosArray>> {
        None
    }

    /// Stream payload of this object; same caching contract as
    /// [`dict`](CosObject::dict).
    fn stream(&self) -> Option<Rc<dyn CosStream>> {
        None
    }

    /// Indirect-reference identity, if this object was reached through one.
    ///
    /// Adapters record the original `(num, gen)` before dereferencing, so
    /// the identity stays stable after resolution.
    fn indirect_ref(&self) -> Option<ObjectRef> {
        None
    }

    /// Fraction digits to use when serializing a real value.
    fn precision(&self) -> usize {
        DEFAULT_REAL_PRECISION
    }

    /// Whether a real value serializes as a string of significant digits
    /// (`(297.84)`), the form used by OGC best-practice numeric fields.
    fn real_as_string(&self) -> bool {
        false
    }

    /// Resolve a path expression starting at this object.
    ///
    /// Returns `None` unless this object is a dictionary; see
    /// [`CosDict::lookup`] for the path syntax.
    fn lookup(&self, path: &str) -> Option<ObjectHandle> {
        if self.kind() != ObjectKind::Dictionary {
            return None;
        }
        self.dict()?.lookup(path)
    }
}

/// A PDF dictionary: unique string keys mapped to objects.
///
/// Adapter implementations populate lazily, entry by entry, and cache every
/// result (including misses) for the dictionary's lifetime.
pub trait CosDict {
    /// Look up a key. `None` for absent keys and unresolvable values.
    fn get(&self, key: &str) -> Option<ObjectHandle>;

    /// All entries, in engine-native (or insertion) order, not sorted.
    ///
    /// Forces full population of the lazy cache.
    fn entries(&self) -> Vec<(String, ObjectHandle)>;

    /// Resolve a dot-separated path of dictionary keys, each segment
    /// optionally carrying an `[index]` array subscript:
    /// `"Root.Pages.Kids[0]"`.
    ///
    /// Evaluation is strictly left-to-right and stops at the first missing
    /// key, kind mismatch, or out-of-range index, returning `None`.
    fn lookup(&self, path: &str) -> Option<ObjectHandle> {
        let mut current: Option<ObjectHandle> = None;
        for token in path.split('.') {
            let (key, index) = split_subscript(token)?;
            let next = match current {
                None => self.get(key)?,
                Some(cur) => {
                    if cur.kind() != ObjectKind::Dictionary {
                        return None;
                    }
                    cur.dict()?.get(key)?
                }
            };
            current = Some(match index {
                Some(idx) => {
                    if next.kind() != ObjectKind::Array {
                        return None;
                    }
                    next.array()?.get(idx)?
                }
                None => next,
            });
        }
        current
    }
}

/// A PDF array: 0-indexed, fixed length for adapters.
pub trait CosArray {
    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the array has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`; `None` when out of range or unresolvable.
    fn get(&self, index: usize) -> Option<ObjectHandle>;
}

/// A PDF stream: binary payload plus its metadata dictionary.
///
/// Decoded (filters applied) and raw (as stored) content are each computed
/// once and memoized. Computing a length may require materializing the
/// bytes; that is expected for engines that only expose pull-style reads.
pub trait CosStream {
    /// Decoded byte count.
    ///
    /// With `limit` set, decoding aborts once the size exceeds it and
    /// `u64::MAX` is returned as a "too large" sentinel. Returns 0 when the
    /// stream cannot be decoded.
    fn decoded_len(&self, limit: Option<u64>) -> u64;

    /// Decoded bytes; `None` when decoding fails (logged).
    fn decoded_bytes(&self) -> Option<Vec<u8>>;

    /// Undecoded byte count, as stored in the file.
    fn raw_len(&self) -> u64;

    /// Undecoded bytes; `None` when retrieval fails (logged).
    fn raw_bytes(&self) -> Option<Vec<u8>>;
}

/// Split a path segment into its key and optional `[index]` subscript.
///
/// Returns `None` for a malformed subscript (non-numeric index).
fn split_subscript(token: &str) -> Option<(&str, Option<usize>)> {
    match token.find('[') {
        Some(pos) => {
            let idx = token[pos + 1..].trim_end_matches(']').parse::<usize>().ok()?;
            Some((&token[..pos], Some(idx)))
        }
        None => Some((token, None)),
    }
}
