//! `pdfcos lookup`: resolve a path expression and print the object.

use std::path::Path;

use pdfcos::{PdfFile, serialize_object};

pub fn run(file: &Path, path: &str, emit_ref: bool) -> Result<(), i32> {
    let bytes = std::fs::read(file).map_err(|err| {
        eprintln!("error: cannot read {}: {err}", file.display());
        1
    })?;
    let pdf = PdfFile::open(&bytes).map_err(|err| {
        eprintln!("error: {err}");
        1
    })?;

    match pdf.lookup(path) {
        Some(obj) => {
            println!("{}", serialize_object(&*obj, emit_ref));
            Ok(())
        }
        None => {
            eprintln!("error: no object at path '{path}'");
            Err(1)
        }
    }
}
