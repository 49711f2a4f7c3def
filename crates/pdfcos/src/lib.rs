//! pdfcos: Backend-agnostic access to the PDF document object graph.
//!
//! This is the public API facade crate for pdfcos-rs. It re-exports the
//! abstract object contract and writable model from pdfcos-core, the engine
//! adapters from pdfcos-backends, and adds [`PdfFile`] for opening a
//! document with the default engine.
//!
//! # Architecture
//!
//! - **pdfcos-core**: object kinds, the read contract, the writable model,
//!   PDF-syntax serialization, and the text/value codec
//! - **pdfcos-backends**: adapters wrapping concrete PDF engines (lopdf by
//!   default; pdf-rs and MuPDF behind features)
//! - **pdfcos** (this crate): public API that ties everything together
//!
//! # Example
//!
//! ```no_run
//! use pdfcos::{PdfFile, serialize_object};
//!
//! # fn main() -> Result<(), pdfcos::PdfError> {
//! let bytes = std::fs::read("map.pdf")?;
//! let pdf = PdfFile::open(&bytes)?;
//! if let Some(media_box) = pdf.lookup("Root.Pages.Kids[0].MediaBox") {
//!     println!("{}", serialize_object(&*media_box, false));
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;

pub use document::PdfFile;

pub use pdfcos_backends::{self, BackendError, lopdf_backend};
pub use pdfcos_core::{
    self, CosArray, CosDict, CosObject, CosStream, ObjectHandle, ObjectKind, ObjectRef,
    OwnedArray, OwnedDict, OwnedObject, PdfError, serialize_array, serialize_dict,
    serialize_object, to_owned_array, to_owned_dict, to_owned_object,
};
