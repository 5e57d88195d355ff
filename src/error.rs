use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    NotFound(PathBuf),
    NotDocx(PathBuf),
    NoDocxFiles(PathBuf),
    NotFileOrDir(PathBuf),
    /// Failure reported by a conversion backend, as a human-readable reason.
    Backend(String),
    /// A backend failure as seen by the front end. `batch` is set for directory runs.
    Conversion { batch: bool, reason: String },
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(p) => write!(f, "Error: '{}' does not exist.", p.display()),
            Error::NotDocx(p) => write!(f, "Error: '{}' is not a .docx file.", p.display()),
            Error::NoDocxFiles(p) => write!(f, "No .docx files found in '{}'", p.display()),
            Error::NotFileOrDir(p) => {
                write!(f, "Error: '{}' is not a valid file or directory.", p.display())
            }
            Error::Backend(reason) => f.write_str(reason),
            Error::Conversion { batch: false, reason } => {
                write!(f, "Error converting file: {reason}")
            }
            Error::Conversion { batch: true, reason } => {
                write!(f, "Error converting files: {reason}")
            }
            Error::Io(e) => write!(f, "Error: IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
