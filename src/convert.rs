use std::path::Path;

use crate::error::Error;

/// The capability that actually turns Word documents into PDFs.
///
/// `input` is either a single `.docx` file or a directory of them. For a file,
/// `output` is the PDF path or a directory to place it in; for a directory it
/// is the destination directory. `None` means "next to the input".
pub trait Converter {
    fn convert(&self, input: &Path, output: Option<&Path>) -> Result<(), Error>;
}
