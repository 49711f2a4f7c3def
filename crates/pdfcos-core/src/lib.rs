//! pdfcos-core: Backend-independent PDF object model.
//!
//! This crate defines the abstract contract for the PDF document object
//! graph (the COS layer): null, boolean, integer, real, string, name,
//! array, dictionary, stream, and indirect references. It adds an
//! owning writable implementation, byte-exact PDF-syntax serialization,
//! deep cloning, and the text/value codec. Engine adapters that satisfy the
//! contract live in `pdfcos-backends`.
//!
//! # Architecture
//!
//! - **pdfcos-core** (this crate): the contract, writable model, codec
//! - **pdfcos-backends**: adapters wrapping concrete PDF engines
//! - **pdfcos**: public API facade that ties everything together

pub mod encoding;
pub mod error;
pub mod numeric;
pub mod object;
pub mod owned;
pub mod serialize;

pub use error::PdfError;
pub use object::{
    CosArray, CosDict, CosObject, CosStream, ObjectHandle, ObjectKind, ObjectRef,
};
pub use owned::{OwnedArray, OwnedDict, OwnedObject, to_owned_array, to_owned_dict, to_owned_object};
pub use serialize::{serialize_array, serialize_dict, serialize_object};
