//! Document-level access over the default engine.
//!
//! [`PdfFile`] opens a document with the lopdf engine and hands out its
//! trailer and catalog as abstract objects, the entry points for path
//! lookups like `"Root.Pages.Kids[0]"`.

use std::rc::Rc;

use pdfcos_backends::lopdf;
use pdfcos_backends::lopdf_backend::{LopdfObject, open_document};
use pdfcos_core::{CosDict, CosObject, ObjectHandle, PdfError};

/// An open PDF document backed by the default engine.
pub struct PdfFile {
    doc: Rc<lopdf::Document>,
}

impl PdfFile {
    /// Parse a document from memory.
    ///
    /// Encrypted documents are rejected with
    /// [`PdfError::PasswordRequired`].
    pub fn open(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = open_document(bytes).map_err(PdfError::from)?;
        Ok(Self { doc: Rc::new(doc) })
    }

    /// The PDF version from the file header (e.g. `"1.5"`).
    pub fn version(&self) -> &str {
        &self.doc.version
    }

    /// Number of indirect objects in the document.
    pub fn object_count(&self) -> usize {
        self.doc.objects.len()
    }

    /// The trailer dictionary as an abstract object.
    pub fn trailer(&self) -> ObjectHandle {
        LopdfObject::from_direct(
            self.doc.clone(),
            lopdf::Object::Dictionary(self.doc.trailer.clone()),
        )
    }

    /// The document catalog (the trailer's `/Root`).
    pub fn catalog(&self) -> Option<ObjectHandle> {
        self.trailer().dict()?.get("Root")
    }

    /// Resolve a path expression starting at the trailer, e.g.
    /// `"Root.Pages.Kids[0].MediaBox"`.
    pub fn lookup(&self, path: &str) -> Option<ObjectHandle> {
        self.trailer().dict()?.lookup(path)
    }

    /// Access an indirect object by its `(num, gen)` identity.
    pub fn object(&self, num: u32, generation: u16) -> Option<ObjectHandle> {
        LopdfObject::build(self.doc.clone(), lopdf::Object::Reference((num, generation)))
            .map(|obj| obj as ObjectHandle)
    }
}

impl std::fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFile")
            .field("version", &self.doc.version)
            .field("object_count", &self.doc.objects.len())
            .finish_non_exhaustive()
    }
}
