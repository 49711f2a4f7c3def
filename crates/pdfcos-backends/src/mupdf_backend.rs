//! MuPDF engine adapter (feature `backend-mupdf`).
//!
//! Implements the pdfcos object contract over [`mupdf::pdf::PdfObject`],
//! the reference-counted handle into the native MuPDF object store. Unlike
//! the pure-Rust engines, every accessor here crosses an FFI boundary and
//! returns a `Result`; failures are logged and degrade to the contract's
//! defaults so no engine error escapes this module.
//!
//! MuPDF resolves an indirect handle with `resolve()`; the object number is
//! captured first so `indirect_ref()` stays stable afterwards. The engine
//! does not expose the generation number on a resolved handle, so it is
//! reported as 0, which is what documents in the wild carry almost
//! universally.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use mupdf::pdf::PdfObject;

use pdfcos_core::encoding::decode_text_bytes;
use pdfcos_core::numeric::round_to_likely_double;
use pdfcos_core::object::{
    CosArray, CosDict, CosObject, CosStream, ObjectHandle, ObjectKind, ObjectRef,
};

fn probe(result: Result<bool, mupdf::Error>) -> bool {
    result.unwrap_or(false)
}

/// A PDF object backed by MuPDF.
pub struct MupdfObject {
    obj: Rc<PdfObject>,
    origin: Option<ObjectRef>,
    dict_cache: OnceCell<Option<Rc<MupdfDict>>>,
    array_cache: OnceCell<Option<Rc<MupdfArray>>>,
    stream_cache: OnceCell<Option<Rc<MupdfStream>>>,
}

impl MupdfObject {
    /// Wrap a native handle, resolving an indirect handle to its direct
    /// object while recording the object number it was reached through.
    pub fn build(obj: PdfObject) -> Option<Rc<Self>> {
        let mut origin = None;
        let mut current = obj;
        if probe(current.is_indirect()) {
            let num = current.as_indirect().unwrap_or(0);
            if num > 0 {
                origin = ObjectRef::from_parts(num as u32, 0);
            }
            match current.resolve() {
                Ok(Some(direct)) => current = direct,
                Ok(None) => {
                    log::warn!("cannot resolve indirect object {num} R");
                    return None;
                }
                Err(err) => {
                    log::warn!("cannot resolve indirect object {num} R: {err}");
                    return None;
                }
            }
        }
        Some(Rc::new(Self {
            obj: Rc::new(current),
            origin,
            dict_cache: OnceCell::new(),
            array_cache: OnceCell::new(),
            stream_cache: OnceCell::new(),
        }))
    }
}

impl CosObject for MupdfObject {
    fn kind(&self) -> ObjectKind {
        if probe(self.obj.is_null()) {
            ObjectKind::Null
        } else if probe(self.obj.is_bool()) {
            ObjectKind::Bool
        } else if probe(self.obj.is_int()) {
            ObjectKind::Int
        } else if probe(self.obj.is_real()) {
            ObjectKind::Real
        } else if probe(self.obj.is_string()) {
            ObjectKind::String
        } else if probe(self.obj.is_name()) {
            ObjectKind::Name
        } else if probe(self.obj.is_array()) {
            ObjectKind::Array
        } else if probe(self.obj.is_dict()) || probe(self.obj.is_stream()) {
            // A stream presents as its metadata dictionary; MuPDF answers
            // dictionary queries on the stream handle directly.
            ObjectKind::Dictionary
        } else {
            ObjectKind::Unknown
        }
    }

    fn native_type_name(&self) -> &'static str {
        if probe(self.obj.is_stream()) {
            "stream"
        } else if probe(self.obj.is_indirect()) {
            "reference"
        } else {
            ""
        }
    }

    fn as_bool(&self) -> bool {
        if probe(self.obj.is_bool()) {
            self.obj.as_bool().unwrap_or(false)
        } else {
            false
        }
    }

    fn as_int(&self) -> i64 {
        if probe(self.obj.is_int()) {
            self.obj.as_int().map_or(0, i64::from)
        } else {
            0
        }
    }

    fn as_real(&self) -> f64 {
        if probe(self.obj.is_real()) {
            // MuPDF stores numbers as 32-bit floats; recover the intended
            // decimal.
            self.obj
                .as_float()
                .map_or(0.0, round_to_likely_double)
        } else {
            0.0
        }
    }

    fn as_string(&self) -> String {
        if !probe(self.obj.is_string()) {
            return String::new();
        }
        match self.obj.as_bytes() {
            Ok(bytes) => decode_text_bytes(&bytes),
            Err(err) => {
                log::warn!("failed to read string bytes: {err}");
                String::new()
            }
        }
    }

    fn as_name(&self) -> String {
        if !probe(self.obj.is_name()) {
            return String::new();
        }
        self.obj.as_name().map(Into::into).unwrap_or_default()
    }

    fn dict(&self) -> Option<Rc<dyn CosDict>> {
        let cached = self.dict_cache.get_or_init(|| {
            (probe(self.obj.is_dict()) || probe(self.obj.is_stream())).then(|| {
                Rc::new(MupdfDict {
                    obj: self.obj.clone(),
                    cache: RefCell::new(HashMap::new()),
                })
            })
        });
        cached.clone().map(|d| d as Rc<dyn CosDict>)
    }

    fn array(&self) -> Option<Rc<dyn CosArray>> {
        let cached = self.array_cache.get_or_init(|| {
            probe(self.obj.is_array()).then(|| {
                Rc::new(MupdfArray {
                    obj: self.obj.clone(),
                    cache: RefCell::new(Vec::new()),
                })
            })
        });
        cached.clone().map(|a| a as Rc<dyn CosArray>)
    }

    fn stream(&self) -> Option<Rc<dyn CosStream>> {
        let cached = self.stream_cache.get_or_init(|| {
            probe(self.obj.is_stream()).then(|| {
                Rc::new(MupdfStream {
                    obj: self.obj.clone(),
                    decoded: RefCell::new(None),
                    raw: RefCell::new(None),
                })
            })
        });
        cached.clone().map(|s| s as Rc<dyn CosStream>)
    }

    fn indirect_ref(&self) -> Option<ObjectRef> {
        self.origin
    }
}

/// Dictionary view over a native MuPDF dictionary (or stream) handle.
pub struct MupdfDict {
    obj: Rc<PdfObject>,
    cache: RefCell<HashMap<String, Option<ObjectHandle>>>,
}

impl CosDict for MupdfDict {
    fn get(&self, key: &str) -> Option<ObjectHandle> {
        if let Some(cached) = self.cache.borrow().get(key) {
            return cached.clone();
        }

        let built = match self.obj.get_dict(key) {
            Ok(Some(value)) => MupdfObject::build(value).map(|obj| obj as ObjectHandle),
            Ok(None) => None,
            Err(err) => {
                log::warn!("dictionary lookup of /{key} failed: {err}");
                None
            }
        };
        self.cache
            .borrow_mut()
            .insert(key.to_string(), built.clone());
        built
    }

    fn entries(&self) -> Vec<(String, ObjectHandle)> {
        let len = self.obj.dict_len().unwrap_or(0);
        let mut keys = Vec::with_capacity(len);
        for index in 0..len {
            let Ok(Some(key_obj)) = self.obj.get_dict_key(index as i32) else {
                continue;
            };
            if let Ok(key) = key_obj.as_name() {
                keys.push(key.to_string());
            }
        }
        keys.into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }
}

/// Array view over a native MuPDF array handle.
pub struct MupdfArray {
    obj: Rc<PdfObject>,
    cache: RefCell<Vec<Option<Option<ObjectHandle>>>>,
}

impl CosArray for MupdfArray {
    fn len(&self) -> usize {
        self.obj.len().unwrap_or(0)
    }

    fn get(&self, index: usize) -> Option<ObjectHandle> {
        let len = self.len();
        if index >= len {
            return None;
        }

        {
            let cache = self.cache.borrow();
            if let Some(Some(cached)) = cache.get(index) {
                return cached.clone();
            }
        }

        let built = match self.obj.get_array(index as i32) {
            Ok(Some(value)) => MupdfObject::build(value).map(|obj| obj as ObjectHandle),
            Ok(None) => None,
            Err(err) => {
                log::warn!("array lookup at [{index}] failed: {err}");
                None
            }
        };
        let mut cache = self.cache.borrow_mut();
        if cache.len() < len {
            cache.resize(len, None);
        }
        cache[index] = Some(built.clone());
        built
    }
}

/// Stream payload access with memoized reads through the engine.
pub struct MupdfStream {
    obj: Rc<PdfObject>,
    decoded: RefCell<Option<Option<Vec<u8>>>>,
    raw: RefCell<Option<Option<Vec<u8>>>>,
}

impl MupdfStream {
    fn decoded_content(&self) -> Option<Vec<u8>> {
        if let Some(cached) = self.decoded.borrow().as_ref() {
            return cached.clone();
        }
        let computed = match self.obj.read_stream() {
            Ok(data) => Some(data),
            Err(err) => {
                log::warn!("failed to decode stream content: {err}");
                None
            }
        };
        *self.decoded.borrow_mut() = Some(computed.clone());
        computed
    }

    fn raw_content(&self) -> Option<Vec<u8>> {
        if let Some(cached) = self.raw.borrow().as_ref() {
            return cached.clone();
        }
        let computed = match self.obj.read_raw_stream() {
            Ok(data) => Some(data),
            Err(err) => {
                log::warn!("failed to read raw stream content: {err}");
                None
            }
        };
        *self.raw.borrow_mut() = Some(computed.clone());
        computed
    }
}

impl CosStream for MupdfStream {
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
        self.raw_content().map_or(0, |data| data.len() as u64)
    }

    fn raw_bytes(&self) -> Option<Vec<u8>> {
        self.raw_content()
    }
}
