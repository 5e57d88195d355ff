use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "docx";

/// True when `path` carries the `.docx` extension, ignoring ASCII case.
pub fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Word's owner file for an open document, e.g. `~$report.docx`.
pub fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"))
}

/// Regular files directly inside `dir` that carry the `.docx` extension,
/// sorted. Word lock files are left out.
pub fn find_docx_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_docx(p) && !is_lock_file(p))
        .collect();
    files.sort();
    Ok(files)
}

/// File name of the PDF produced for `source`: its stem with `.pdf` appended.
pub fn pdf_name(source: &Path) -> OsString {
    let mut name = source.file_stem().unwrap_or_default().to_os_string();
    name.push(".pdf");
    name
}
