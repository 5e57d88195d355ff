use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use url::Url;

use crate::convert::Converter;
use crate::error::Error;
use crate::job;
use crate::source;

pub const PROGRAM_ENV: &str = "DOCX2PDF_SOFFICE";

const PROGRAM_NAMES: &[&str] = &["soffice", "libreoffice"];

/// Converts documents by running LibreOffice headless.
#[derive(Debug, Default, Clone)]
pub struct Office {
    program: Option<PathBuf>,
}

impl Office {
    /// Looks the office program up on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `program` instead of searching for one.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    fn program(&self) -> Result<PathBuf, Error> {
        if let Some(program) = &self.program {
            return Ok(program.clone());
        }
        locate_program().ok_or_else(|| {
            Error::Backend(format!(
                "LibreOffice not found; install it or set {PROGRAM_ENV} to the soffice program"
            ))
        })
    }

    /// Converts each `(source, target)` pair in one office run.
    ///
    /// The office suite writes into a staging directory inside `dest`; the
    /// results are then moved onto their targets, which must live in `dest`.
    fn convert_into(&self, pairs: &[(PathBuf, PathBuf)], dest: &Path) -> Result<(), Error> {
        reject_collisions(pairs)?;
        let program = self.program()?;
        fs::create_dir_all(dest).map_err(|e| io_failure("cannot create", dest, e))?;

        let staging = tempfile::Builder::new()
            .prefix(".docx2pdf-")
            .tempdir_in(dest)
            .map_err(|e| io_failure("cannot stage output in", dest, e))?;
        let profile = tempfile::Builder::new()
            .prefix("docx2pdf-profile-")
            .tempdir()
            .map_err(|e| Error::Backend(format!("cannot create office profile: {e}")))?;

        let result = profile_url(profile.path())
            .and_then(|url| run_office(&program, pairs, staging.path(), &url))
            .and_then(|()| collect(pairs, staging.path()));

        cleanup(staging);
        cleanup(profile);
        result
    }
}

impl Converter for Office {
    fn convert(&self, input: &Path, output: Option<&Path>) -> Result<(), Error> {
        if input.is_dir() {
            let sources = source::find_docx_files(input)
                .map_err(|e| io_failure("cannot read", input, e))?;
            if sources.is_empty() {
                return Err(Error::Backend(format!(
                    "no .docx files in '{}'",
                    input.display()
                )));
            }
            let dest = job::pdf_dir(input, output);
            let pairs: Vec<_> = sources
                .into_iter()
                .map(|src| {
                    let target = dest.join(source::pdf_name(&src));
                    (src, target)
                })
                .collect();
            self.convert_into(&pairs, dest)
        } else {
            let target = job::pdf_target(input, output);
            let dest = match target.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            self.convert_into(&[(input.to_path_buf(), target)], &dest)
        }
    }
}

fn run_office(
    program: &Path,
    pairs: &[(PathBuf, PathBuf)],
    outdir: &Path,
    profile: &Url,
) -> Result<(), Error> {
    let mut cmd = Command::new(program);
    cmd.arg("--headless")
        .arg("--norestore")
        .arg(format!("-env:UserInstallation={}", profile))
        .args(["--convert-to", "pdf", "--outdir"])
        .arg(outdir)
        .args(pairs.iter().map(|(src, _)| src));
    log::debug!("running {cmd:?}");

    let out = cmd
        .output()
        .map_err(|e| Error::Backend(format!("failed to start {}: {e}", program.display())))?;
    if out.status.success() {
        return Ok(());
    }
    let name = program.file_name().unwrap_or(program.as_os_str()).to_string_lossy();
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stderr = stderr.trim();
    Err(Error::Backend(if stderr.is_empty() {
        format!("{name} exited with {}", out.status)
    } else {
        format!("{name} exited with {}: {stderr}", out.status)
    }))
}

/// Moves every produced PDF from `staging` onto its target.
fn collect(pairs: &[(PathBuf, PathBuf)], staging: &Path) -> Result<(), Error> {
    let missing: Vec<String> = pairs
        .iter()
        .filter(|(src, _)| !staging.join(source::pdf_name(src)).is_file())
        .map(|(src, _)| src.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::Backend(format!(
            "no PDF was produced for {}",
            missing.join(", ")
        )));
    }
    for (src, target) in pairs {
        let produced = staging.join(source::pdf_name(src));
        fs::rename(&produced, target).map_err(|e| io_failure("cannot write", target, e))?;
        log::info!("{} -> {}", src.display(), target.display());
    }
    Ok(())
}

fn cleanup(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        log::warn!("failed to remove {}: {e}", path.display());
    }
}

fn io_failure(what: &str, path: &Path, e: std::io::Error) -> Error {
    Error::Backend(format!("{what} '{}': {e}", path.display()))
}

/// `file://` URL of the throwaway profile, as LibreOffice's `-env:` options expect.
fn profile_url(dir: &Path) -> Result<Url, Error> {
    Url::from_directory_path(dir).map_err(|()| {
        Error::Backend(format!(
            "cannot express office profile '{}' as a URL",
            dir.display()
        ))
    })
}

/// Sources that would land on the same PDF name, e.g. `a.docx` and `a.DOCX`.
fn reject_collisions(pairs: &[(PathBuf, PathBuf)]) -> Result<(), Error> {
    let mut seen: HashMap<OsString, &Path> = HashMap::new();
    let mut clashes = Vec::new();
    for (src, _) in pairs {
        if let Some(first) = seen.insert(source::pdf_name(src), src.as_path()) {
            clashes.push(format!("'{}' and '{}'", first.display(), src.display()));
        }
    }
    if clashes.is_empty() {
        return Ok(());
    }
    Err(Error::Backend(format!(
        "sources would overwrite each other's PDF: {}",
        clashes.join(", ")
    )))
}

fn locate_program() -> Option<PathBuf> {
    for name in PROGRAM_NAMES {
        if let Ok(path) = which::which(name) {
            log::debug!("using {}", path.display());
            return Some(path);
        }
    }
    install_locations().into_iter().find(|p| {
        let found = p.is_file();
        if found {
            log::debug!("using {}", p.display());
        }
        found
    })
}

fn install_locations() -> Vec<PathBuf> {
    #[allow(unused_mut)]
    let mut paths: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        paths.push("/Applications/LibreOffice.app/Contents/MacOS/soffice".into());
        if let Ok(home) = std::env::var("HOME") {
            paths.push(
                PathBuf::from(home).join("Applications/LibreOffice.app/Contents/MacOS/soffice"),
            );
        }
    }

    #[cfg(target_os = "linux")]
    {
        paths.extend([
            "/usr/lib/libreoffice/program/soffice".into(),
            "/opt/libreoffice/program/soffice".into(),
            "/snap/bin/libreoffice".into(),
        ]);
    }

    #[cfg(target_os = "windows")]
    {
        for var in ["ProgramFiles", "ProgramFiles(x86)"] {
            if let Ok(dir) = std::env::var(var) {
                paths.push(PathBuf::from(dir).join("LibreOffice\\program\\soffice.exe"));
            }
        }
    }

    paths
}
