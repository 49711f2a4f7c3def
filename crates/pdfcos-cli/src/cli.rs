use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect the object graph of PDF documents.
#[derive(Debug, Parser)]
#[command(name = "pdfcos", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a document summary: version, object count, catalog entries
    Info {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Resolve a path expression and print the object in PDF syntax
    Lookup {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path expression rooted at the trailer (e.g. 'Root.Pages.Kids[0]')
        #[arg(value_name = "PATH")]
        path: String,

        /// Print the reference shorthand instead of expanding the body
        #[arg(long)]
        emit_ref: bool,
    },
}
