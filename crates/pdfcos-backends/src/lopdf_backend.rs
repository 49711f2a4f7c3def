//! lopdf-based object adapter.
//!
//! Implements the pdfcos object contract on top of the
//! [lopdf](https://crates.io/crates/lopdf) crate. This is the default
//! engine.
//!
//! Every wrapper holds an `Rc<lopdf::Document>` for indirect-reference
//! resolution plus a shared handle to the native object it adapts. Indirect
//! references resolve at construction while the original `(num, gen)` is
//! recorded, so `indirect_ref()` keeps reporting the reference identity
//! after dereferencing. Composite views and dictionary/array entries are
//! built lazily and cached for the wrapper's lifetime; the wrapper owns its
//! cached sub-graph but never the engine's document.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use pdfcos_core::PdfError;
use pdfcos_core::encoding::decode_text_bytes;
use pdfcos_core::numeric::round_to_likely_double;
use pdfcos_core::object::{
    CosArray, CosDict, CosObject, CosStream, ObjectHandle, ObjectKind, ObjectRef,
};

use crate::error::BackendError;

/// Longest chain of reference-to-reference hops followed before giving up.
const MAX_REFERENCE_DEPTH: usize = 32;

/// Parse a document from memory, rejecting encrypted files.
pub fn open_document(bytes: &[u8]) -> Result<lopdf::Document, BackendError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

    if doc.is_encrypted() {
        return Err(BackendError::Core(PdfError::PasswordRequired));
    }
    Ok(doc)
}

/// A PDF object backed by lopdf.
pub struct LopdfObject {
    doc: Rc<lopdf::Document>,
    obj: Rc<lopdf::Object>,
    origin: Option<ObjectRef>,
    dict_cache: OnceCell<Option<Rc<LopdfDict>>>,
    array_cache: OnceCell<Option<Rc<LopdfArray>>>,
    stream_cache: OnceCell<Option<Rc<LopdfStream>>>,
}

impl LopdfObject {
    /// Wrap a native object, resolving indirect references.
    ///
    /// The first reference's `(num, gen)` is recorded as the wrapper's
    /// identity. A dangling or circular reference chain logs a warning and
    /// yields `None`.
    pub fn build(doc: Rc<lopdf::Document>, obj: lopdf::Object) -> Option<Rc<Self>> {
        let mut origin = None;
        let mut current = obj;
        let mut depth = 0;
        while let lopdf::Object::Reference(id) = current {
            if origin.is_none() {
                origin = ObjectRef::from_parts(id.0, id.1);
            }
            depth += 1;
            if depth > MAX_REFERENCE_DEPTH {
                log::warn!("reference chain too deep at {} {} R", id.0, id.1);
                return None;
            }
            match doc.get_object(id) {
                Ok(next) => current = next.clone(),
                Err(err) => {
                    log::warn!("cannot resolve indirect object {} {} R: {err}", id.0, id.1);
                    return None;
                }
            }
        }
        Some(Rc::new(Self::direct(doc, current, origin)))
    }

    /// Wrap a direct (non-reference) object without resolution.
    pub fn from_direct(doc: Rc<lopdf::Document>, obj: lopdf::Object) -> Rc<Self> {
        Rc::new(Self::direct(doc, obj, None))
    }

    fn direct(doc: Rc<lopdf::Document>, obj: lopdf::Object, origin: Option<ObjectRef>) -> Self {
        Self {
            doc,
            obj: Rc::new(obj),
            origin,
            dict_cache: OnceCell::new(),
            array_cache: OnceCell::new(),
            stream_cache: OnceCell::new(),
        }
    }
}

impl CosObject for LopdfObject {
    fn kind(&self) -> ObjectKind {
        match &*self.obj {
            lopdf::Object::Null => ObjectKind::Null,
            lopdf::Object::Boolean(_) => ObjectKind::Bool,
            lopdf::Object::Integer(_) => ObjectKind::Int,
            lopdf::Object::Real(_) => ObjectKind::Real,
            lopdf::Object::String(..) => ObjectKind::String,
            lopdf::Object::Name(_) => ObjectKind::Name,
            lopdf::Object::Array(_) => ObjectKind::Array,
            lopdf::Object::Dictionary(_) => ObjectKind::Dictionary,
            // A stream presents as its metadata dictionary.
            lopdf::Object::Stream(_) => ObjectKind::Dictionary,
            // Only reachable when resolution was bypassed.
            lopdf::Object::Reference(_) => ObjectKind::Unknown,
        }
    }

    fn native_type_name(&self) -> &'static str {
        match &*self.obj {
            lopdf::Object::Stream(_) => "stream",
            lopdf::Object::Reference(_) => "reference",
            _ => "",
        }
    }

    fn as_bool(&self) -> bool {
        match &*self.obj {
            lopdf::Object::Boolean(value) => *value,
            _ => false,
        }
    }

    fn as_int(&self) -> i64 {
        match &*self.obj {
            lopdf::Object::Integer(value) => *value,
            _ => 0,
        }
    }

    fn as_real(&self) -> f64 {
        match &*self.obj {
            // lopdf parses reals into f32; recover the intended decimal.
            lopdf::Object::Real(value) => round_to_likely_double(*value),
            _ => 0.0,
        }
    }

    fn as_string(&self) -> String {
        match &*self.obj {
            lopdf::Object::String(bytes, _) => decode_text_bytes(bytes),
            _ => String::new(),
        }
    }

    fn as_name(&self) -> String {
        match &*self.obj {
            lopdf::Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            _ => String::new(),
        }
    }

    fn dict(&self) -> Option<Rc<dyn CosDict>> {
        let cached = self.dict_cache.get_or_init(|| {
            matches!(
                &*self.obj,
                lopdf::Object::Dictionary(_) | lopdf::Object::Stream(_)
            )
            .then(|| {
                Rc::new(LopdfDict {
                    doc: self.doc.clone(),
                    obj: self.obj.clone(),
                    cache: RefCell::new(HashMap::new()),
                })
            })
        });
        cached.clone().map(|d| d as Rc<dyn CosDict>)
    }

    fn array(&self) -> Option<Rc<dyn CosArray>> {
        let cached = self.array_cache.get_or_init(|| {
            matches!(&*self.obj, lopdf::Object::Array(_)).then(|| {
                Rc::new(LopdfArray {
                    doc: self.doc.clone(),
                    obj: self.obj.clone(),
                    cache: RefCell::new(Vec::new()),
                })
            })
        });
        cached.clone().map(|a| a as Rc<dyn CosArray>)
    }

    fn stream(&self) -> Option<Rc<dyn CosStream>> {
        let cached = self.stream_cache.get_or_init(|| {
            matches!(&*self.obj, lopdf::Object::Stream(_)).then(|| {
                Rc::new(LopdfStream {
                    obj: self.obj.clone(),
                    decoded: RefCell::new(None),
                })
            })
        });
        cached.clone().map(|s| s as Rc<dyn CosStream>)
    }

    fn indirect_ref(&self) -> Option<ObjectRef> {
        self.origin
    }
}

/// Dictionary view over a native lopdf dictionary (or a stream's
/// metadata dictionary).
pub struct LopdfDict {
    doc: Rc<lopdf::Document>,
    obj: Rc<lopdf::Object>,
    /// Entry cache; misses are cached as `None` to avoid repeated engine
    /// lookups.
    cache: RefCell<HashMap<String, Option<ObjectHandle>>>,
}

impl LopdfDict {
    fn native(&self) -> Option<&lopdf::Dictionary> {
        match &*self.obj {
            lopdf::Object::Dictionary(dict) => Some(dict),
            lopdf::Object::Stream(stream) => Some(&stream.dict),
            _ => None,
        }
    }
}

impl CosDict for LopdfDict {
    fn get(&self, key: &str) -> Option<ObjectHandle> {
        if let Some(cached) = self.cache.borrow().get(key) {
            return cached.clone();
        }

        let built = self
            .native()
            .and_then(|dict| dict.get(key.as_bytes()).ok())
            .and_then(|value| {
                LopdfObject::build(self.doc.clone(), value.clone())
                    .map(|obj| obj as ObjectHandle)
            });
        self.cache
            .borrow_mut()
            .insert(key.to_string(), built.clone());
        built
    }

    fn entries(&self) -> Vec<(String, ObjectHandle)> {
        let Some(dict) = self.native() else {
            return Vec::new();
        };
        let keys: Vec<String> = dict
            .iter()
            .map(|(key, _)| String::from_utf8_lossy(key).into_owned())
            .collect();
        keys.into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }
}

/// Array view over a native lopdf array.
pub struct LopdfArray {
    doc: Rc<lopdf::Document>,
    obj: Rc<lopdf::Object>,
    /// Position-indexed cache, allocated to the array length on first use.
    /// Outer `None` means "not computed yet".
    cache: RefCell<Vec<Option<Option<ObjectHandle>>>>,
}

impl LopdfArray {
    fn native(&self) -> Option<&Vec<lopdf::Object>> {
        match &*self.obj {
            lopdf::Object::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl CosArray for LopdfArray {
    fn len(&self) -> usize {
        self.native().map_or(0, Vec::len)
    }

    fn get(&self, index: usize) -> Option<ObjectHandle> {
        let items = self.native()?;
        if index >= items.len() {
            return None;
        }

        {
            let cache = self.cache.borrow();
            if let Some(Some(cached)) = cache.get(index) {
                return cached.clone();
            }
        }

        let built = LopdfObject::build(self.doc.clone(), items[index].clone())
            .map(|obj| obj as ObjectHandle);
        let mut cache = self.cache.borrow_mut();
        if cache.len() < items.len() {
            cache.resize(items.len(), None);
        }
        cache[index] = Some(built.clone());
        built
    }
}

/// Stream payload access with memoized decode.
pub struct LopdfStream {
    obj: Rc<lopdf::Object>,
    decoded: RefCell<Option<Option<Vec<u8>>>>,
}

impl LopdfStream {
    fn native(&self) -> Option<&lopdf::Stream> {
        match &*self.obj {
            lopdf::Object::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    fn decoded_content(&self) -> Option<Vec<u8>> {
        if let Some(cached) = self.decoded.borrow().as_ref() {
            return cached.clone();
        }

        let computed = self.native().and_then(|stream| {
            if stream.dict.get(b"Filter").is_err() {
                // Unfiltered stream: decoded content is the stored content.
                return Some(stream.content.clone());
            }
            match stream.decompressed_content() {
                Ok(data) => Some(data),
                Err(err) => {
                    log::warn!("failed to decode stream content: {err}");
                    None
                }
            }
        });
        *self.decoded.borrow_mut() = Some(computed.clone());
        computed
    }
}

impl CosStream for LopdfStream {
    fn decoded_len(&self, limit: Option<u64>) -> u64 {
        let len = self.decoded_content().map_or(0, |data| data.len() as u64);
        match limit {
            Some(max) if len > max => u64::MAX,
            _ => len,
        }
    }

    fn decoded_bytes(&self) -> Option<Vec<u8>> {
        self.decoded_content()
    }

    fn raw_len(&self) -> u64 {
        self.native().map_or(0, |stream| stream.content.len() as u64)
    }

    fn raw_bytes(&self) -> Option<Vec<u8>> {
        self.native().map(|stream| stream.content.clone())
    }
}
