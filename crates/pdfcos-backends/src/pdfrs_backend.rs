//! pdf-rs engine adapter (feature `backend-pdf`).
//!
//! Implements the pdfcos object contract over [`pdf::primitive::Primitive`]
//! values. Unlike lopdf, the pdf crate separates object storage from the
//! resolution machinery, so every wrapper carries a document-lookup handle
//! ([`ResolveRef`]) next to the primitive it adapts, the same
//! owner-table-beside-the-object arrangement the lopdf adapter gets from
//! its `Rc<Document>`.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use pdf::object::PlainRef;
use pdf::primitive::{PdfStream, Primitive};

use pdfcos_core::encoding::decode_text_bytes;
use pdfcos_core::numeric::round_to_likely_double;
use pdfcos_core::object::{
    CosArray, CosDict, CosObject, CosStream, ObjectHandle, ObjectKind, ObjectRef,
};

/// Longest chain of reference-to-reference hops followed before giving up.
const MAX_REFERENCE_DEPTH: usize = 32;

/// Document-lookup seam for indirect references and stream content.
///
/// Blanket-implemented for every [`pdf::object::Resolve`] (an open
/// `pdf::file::File` in practice); tests substitute a map-backed resolver.
pub trait ResolveRef {
    /// Resolve an indirect reference to its direct primitive.
    fn resolve_ref(&self, reference: PlainRef) -> Option<Primitive>;

    /// Decoded (filters applied) stream content.
    fn decoded_stream_data(&self, stream: &PdfStream) -> Option<Vec<u8>>;

    /// Raw stream content as stored in the file.
    fn raw_stream_data(&self, stream: &PdfStream) -> Option<Vec<u8>>;
}

impl<T: pdf::object::Resolve> ResolveRef for T {
    fn resolve_ref(&self, reference: PlainRef) -> Option<Primitive> {
        self.resolve(reference).ok()
    }

    fn decoded_stream_data(&self, stream: &PdfStream) -> Option<Vec<u8>> {
        match pdf::object::Stream::<()>::from_stream(stream.clone(), self) {
            Ok(decoder) => match decoder.data(self) {
                Ok(data) => Some(data.to_vec()),
                Err(err) => {
                    log::warn!("failed to decode stream content: {err}");
                    None
                }
            },
            Err(err) => {
                log::warn!("failed to interpret stream dictionary: {err}");
                None
            }
        }
    }

    fn raw_stream_data(&self, stream: &PdfStream) -> Option<Vec<u8>> {
        match stream.raw_data(self) {
            Ok(data) => Some(data.to_vec()),
            Err(err) => {
                log::warn!("failed to read raw stream content: {err}");
                None
            }
        }
    }
}

/// A PDF object backed by the pdf crate.
pub struct PdfrsObject {
    resolver: Rc<dyn ResolveRef>,
    prim: Rc<Primitive>,
    origin: Option<ObjectRef>,
    dict_cache: OnceCell<Option<Rc<PdfrsDict>>>,
    array_cache: OnceCell<Option<Rc<PdfrsArray>>>,
    stream_cache: OnceCell<Option<Rc<PdfrsStream>>>,
}

impl PdfrsObject {
    /// Wrap a primitive, resolving indirect references.
    ///
    /// The first reference's `(num, gen)` is recorded as the wrapper's
    /// identity. A dangling reference logs a warning and yields `None`.
    pub fn build(resolver: Rc<dyn ResolveRef>, prim: Primitive) -> Option<Rc<Self>> {
        let mut origin = None;
        let mut current = prim;
        let mut depth = 0;
        while let Primitive::Reference(reference) = current {
            if origin.is_none() {
                origin = ObjectRef::from_parts(reference.id as u32, reference.r#gen as u16);
            }
            depth += 1;
            if depth > MAX_REFERENCE_DEPTH {
                log::warn!("reference chain too deep at {} R", reference.id);
                return None;
            }
            match resolver.resolve_ref(reference) {
                Some(next) => current = next,
                None => {
                    log::warn!("cannot resolve indirect object {} R", reference.id);
                    return None;
                }
            }
        }
        Some(Rc::new(Self {
            resolver,
            prim: Rc::new(current),
            origin,
            dict_cache: OnceCell::new(),
            array_cache: OnceCell::new(),
            stream_cache: OnceCell::new(),
        }))
    }
}

impl CosObject for PdfrsObject {
    fn kind(&self) -> ObjectKind {
        match &*self.prim {
            Primitive::Null => ObjectKind::Null,
            Primitive::Boolean(_) => ObjectKind::Bool,
            Primitive::Integer(_) => ObjectKind::Int,
            Primitive::Number(_) => ObjectKind::Real,
            Primitive::String(_) => ObjectKind::String,
            Primitive::Name(_) => ObjectKind::Name,
            Primitive::Array(_) => ObjectKind::Array,
            Primitive::Dictionary(_) => ObjectKind::Dictionary,
            // A stream presents as its metadata dictionary.
            Primitive::Stream(_) => ObjectKind::Dictionary,
            // Only reachable when resolution was bypassed.
            Primitive::Reference(_) => ObjectKind::Unknown,
        }
    }

    fn native_type_name(&self) -> &'static str {
        match &*self.prim {
            Primitive::Stream(_) => "stream",
            Primitive::Reference(_) => "reference",
            _ => "",
        }
    }

    fn as_bool(&self) -> bool {
        match &*self.prim {
            Primitive::Boolean(value) => *value,
            _ => false,
        }
    }

    fn as_int(&self) -> i64 {
        match &*self.prim {
            Primitive::Integer(value) => i64::from(*value),
            _ => 0,
        }
    }

    fn as_real(&self) -> f64 {
        match &*self.prim {
            // The pdf crate parses reals into f32; recover the intended
            // decimal.
            Primitive::Number(value) => round_to_likely_double(*value),
            _ => 0.0,
        }
    }

    fn as_string(&self) -> String {
        match &*self.prim {
            Primitive::String(value) => decode_text_bytes(value.as_bytes()),
            _ => String::new(),
        }
    }

    fn as_name(&self) -> String {
        match &*self.prim {
            Primitive::Name(name) => name.to_string(),
            _ => String::new(),
        }
    }

    fn dict(&self) -> Option<Rc<dyn CosDict>> {
        let cached = self.dict_cache.get_or_init(|| {
            matches!(
                &*self.prim,
                Primitive::Dictionary(_) | Primitive::Stream(_)
            )
            .then(|| {
                Rc::new(PdfrsDict {
                    resolver: self.resolver.clone(),
                    prim: self.prim.clone(),
                    cache: RefCell::new(HashMap::new()),
                })
            })
        });
        cached.clone().map(|d| d as Rc<dyn CosDict>)
    }

    fn array(&self) -> Option<Rc<dyn CosArray>> {
        let cached = self.array_cache.get_or_init(|| {
            matches!(&*self.prim, Primitive::Array(_)).then(|| {
                Rc::new(PdfrsArray {
                    resolver: self.resolver.clone(),
                    prim: self.prim.clone(),
                    cache: RefCell::new(Vec::new()),
                })
            })
        });
        cached.clone().map(|a| a as Rc<dyn CosArray>)
    }

    fn stream(&self) -> Option<Rc<dyn CosStream>> {
        let cached = self.stream_cache.get_or_init(|| {
            matches!(&*self.prim, Primitive::Stream(_)).then(|| {
                Rc::new(PdfrsStream {
                    resolver: self.resolver.clone(),
                    prim: self.prim.clone(),
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

/// Dictionary view over a native pdf-rs dictionary (or a stream's
/// metadata dictionary).
pub struct PdfrsDict {
    resolver: Rc<dyn ResolveRef>,
    prim: Rc<Primitive>,
    cache: RefCell<HashMap<String, Option<ObjectHandle>>>,
}

impl PdfrsDict {
    fn native(&self) -> Option<&pdf::primitive::Dictionary> {
        match &*self.prim {
            Primitive::Dictionary(dict) => Some(dict),
            Primitive::Stream(stream) => Some(&stream.info),
            _ => None,
        }
    }
}

impl CosDict for PdfrsDict {
    fn get(&self, key: &str) -> Option<ObjectHandle> {
        if let Some(cached) = self.cache.borrow().get(key) {
            return cached.clone();
        }

        let built = self
            .native()
            .and_then(|dict| dict.get(key))
            .and_then(|value| {
                PdfrsObject::build(self.resolver.clone(), value.clone())
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
        let keys: Vec<String> = dict.iter().map(|(key, _)| key.to_string()).collect();
        keys.into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }
}

/// Array view over a native pdf-rs array.
pub struct PdfrsArray {
    resolver: Rc<dyn ResolveRef>,
    prim: Rc<Primitive>,
    cache: RefCell<Vec<Option<Option<ObjectHandle>>>>,
}

impl PdfrsArray {
    fn native(&self) -> Option<&Vec<Primitive>> {
        match &*self.prim {
            Primitive::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl CosArray for PdfrsArray {
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

        let built = PdfrsObject::build(self.resolver.clone(), items[index].clone())
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
pub struct PdfrsStream {
    resolver: Rc<dyn ResolveRef>,
    prim: Rc<Primitive>,
    decoded: RefCell<Option<Option<Vec<u8>>>>,
    raw: RefCell<Option<Option<Vec<u8>>>>,
}

impl PdfrsStream {
    fn native(&self) -> Option<&PdfStream> {
        match &*self.prim {
            Primitive::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    fn decoded_content(&self) -> Option<Vec<u8>> {
        if let Some(cached) = self.decoded.borrow().as_ref() {
            return cached.clone();
        }
        let computed = self
            .native()
            .and_then(|stream| self.resolver.decoded_stream_data(stream));
        *self.decoded.borrow_mut() = Some(computed.clone());
        computed
    }

    fn raw_content(&self) -> Option<Vec<u8>> {
        if let Some(cached) = self.raw.borrow().as_ref() {
            return cached.clone();
        }
        let computed = self
            .native()
            .and_then(|stream| self.resolver.raw_stream_data(stream));
        *self.raw.borrow_mut() = Some(computed.clone());
        computed
    }
}

impl CosStream for PdfrsStream {
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

#[cfg(test)]
mod tests {
    use super::*;

    /// Map-backed resolver: enough machinery to exercise reference
    /// resolution without opening a file.
    struct MapResolver {
        objects: HashMap<u64, Primitive>,
    }

    impl ResolveRef for MapResolver {
        fn resolve_ref(&self, reference: PlainRef) -> Option<Primitive> {
            self.objects.get(&reference.id).cloned()
        }

        fn decoded_stream_data(&self, _stream: &PdfStream) -> Option<Vec<u8>> {
            None
        }

        fn raw_stream_data(&self, _stream: &PdfStream) -> Option<Vec<u8>> {
            None
        }
    }

    fn resolver_with(objects: Vec<(u64, Primitive)>) -> Rc<dyn ResolveRef> {
        Rc::new(MapResolver {
            objects: objects.into_iter().collect(),
        })
    }

    fn plain_ref(id: u64) -> PlainRef {
        PlainRef { id, r#gen: 0 }
    }

    #[test]
    fn scalar_kinds_and_values() {
        let resolver = resolver_with(Vec::new());
        let int = PdfrsObject::build(resolver.clone(), Primitive::Integer(-7)).unwrap();
        assert_eq!(int.kind(), ObjectKind::Int);
        assert_eq!(int.as_int(), -7);

        let boolean = PdfrsObject::build(resolver.clone(), Primitive::Boolean(true)).unwrap();
        assert!(boolean.as_bool());

        let null = PdfrsObject::build(resolver, Primitive::Null).unwrap();
        assert_eq!(null.kind(), ObjectKind::Null);
    }

    #[test]
    fn real_recovers_double_precision_decimal() {
        let resolver = resolver_with(Vec::new());
        let obj = PdfrsObject::build(resolver, Primitive::Number(297.84)).unwrap();
        assert_eq!(obj.as_real(), 297.84);
    }

    #[test]
    fn reference_resolves_and_keeps_identity() {
        let resolver = resolver_with(vec![(3, Primitive::Integer(42))]);
        let obj = PdfrsObject::build(resolver, Primitive::Reference(plain_ref(3))).unwrap();
        assert_eq!(obj.kind(), ObjectKind::Int);
        assert_eq!(obj.as_int(), 42);
        assert_eq!(obj.indirect_ref(), Some(ObjectRef { num: 3, generation: 0 }));
    }

    #[test]
    fn dangling_reference_yields_none() {
        let resolver = resolver_with(Vec::new());
        assert!(PdfrsObject::build(resolver, Primitive::Reference(plain_ref(9))).is_none());
    }

    #[test]
    fn array_elements_resolve_and_cache() {
        let resolver = resolver_with(vec![(5, Primitive::Integer(11))]);
        let prim = Primitive::Array(vec![
            Primitive::Integer(1),
            Primitive::Reference(plain_ref(5)),
        ]);
        let obj = PdfrsObject::build(resolver, prim).unwrap();
        let array = obj.array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(1).unwrap().as_int(), 11);
        assert_eq!(
            array.get(1).unwrap().indirect_ref(),
            Some(ObjectRef { num: 5, generation: 0 })
        );
        assert!(Rc::ptr_eq(&array.get(0).unwrap(), &array.get(0).unwrap()));
        assert!(array.get(2).is_none());
    }

    #[test]
    fn array_view_is_cached_per_object() {
        let resolver = resolver_with(Vec::new());
        let obj =
            PdfrsObject::build(resolver, Primitive::Array(vec![Primitive::Null])).unwrap();
        let first = obj.array().unwrap();
        let second = obj.array().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }
}
