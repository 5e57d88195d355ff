use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::source;

/// A validated conversion request.
#[derive(Debug)]
pub enum Job {
    File {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    Directory {
        input: PathBuf,
        output: Option<PathBuf>,
        sources: Vec<PathBuf>,
    },
}

impl Job {
    /// Checks `input` and decides which kind of conversion it calls for.
    pub fn plan(input: &Path, output: Option<&Path>) -> Result<Job, Error> {
        if !input.exists() {
            return Err(Error::NotFound(input.to_path_buf()));
        }
        let output = output.map(Path::to_path_buf);
        if input.is_file() {
            if !source::is_docx(input) {
                return Err(Error::NotDocx(input.to_path_buf()));
            }
            Ok(Job::File {
                input: input.to_path_buf(),
                output,
            })
        } else if input.is_dir() {
            let sources = source::find_docx_files(input)?;
            if sources.is_empty() {
                return Err(Error::NoDocxFiles(input.to_path_buf()));
            }
            Ok(Job::Directory {
                input: input.to_path_buf(),
                output,
                sources,
            })
        } else {
            Err(Error::NotFileOrDir(input.to_path_buf()))
        }
    }
}

/// Where the PDF for a single `input` document ends up.
///
/// Without an output the PDF sits next to the input. An output naming an
/// existing directory receives `<stem>.pdf`; any other output is the PDF path.
pub fn pdf_target(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        None => input.with_extension("pdf"),
        Some(dir) if dir.is_dir() => dir.join(source::pdf_name(input)),
        Some(file) => file.to_path_buf(),
    }
}

/// Destination directory for a directory run.
pub fn pdf_dir<'a>(input: &'a Path, output: Option<&'a Path>) -> &'a Path {
    output.unwrap_or(input)
}

/// Absolute form of `path` for reporting. Canonical when it exists, or when
/// at least its parent does.
pub fn resolve(path: &Path) -> PathBuf {
    if let Ok(full) = path.canonicalize() {
        return full;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}
