//! `pdfcos info`: document summary.

use std::path::Path;

use pdfcos::{CosDict, CosObject, PdfFile};

pub fn run(file: &Path) -> Result<(), i32> {
    let bytes = std::fs::read(file).map_err(|err| {
        eprintln!("error: cannot read {}: {err}", file.display());
        1
    })?;
    let pdf = PdfFile::open(&bytes).map_err(|err| {
        eprintln!("error: {err}");
        1
    })?;

    println!("version: {}", pdf.version());
    println!("objects: {}", pdf.object_count());

    match pdf.catalog() {
        Some(catalog) => {
            match catalog.indirect_ref() {
                Some(r) => println!("catalog: {r}"),
                None => println!("catalog: (direct)"),
            }
            if let Some(dict) = catalog.dict() {
                for (key, value) in dict.entries() {
                    println!("  /{key}: {}", value.type_name());
                }
            }
        }
        None => eprintln!("warning: document has no catalog"),
    }
    Ok(())
}
