mod convert;
mod error;
mod job;
mod office;
mod source;

pub use convert::Converter;
pub use error::Error;
pub use job::{Job, pdf_target};
pub use office::{Office, PROGRAM_ENV};
pub use source::{find_docx_files, is_docx};

use std::io::Write;
use std::path::PathBuf;

/// One invocation of the tool.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Suppress informational messages. Errors are still returned.
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    File { pdf: PathBuf },
    Directory { count: usize, dir: PathBuf },
}

/// Validates `opts`, hands the work to `converter` exactly once and reports
/// progress on `out`.
pub fn run(opts: &Options, converter: &dyn Converter, out: &mut dyn Write) -> Result<Outcome, Error> {
    let plan = Job::plan(&opts.input, opts.output.as_deref())?;
    let mut console = Console {
        out,
        quiet: opts.quiet,
    };

    match &plan {
        Job::File { input, output } => {
            let target = pdf_target(input, output.as_deref());
            let name = input.file_name().unwrap_or(input.as_os_str());
            console.say(format_args!("Converting: {}", name.to_string_lossy()))?;
            converter
                .convert(input, output.as_deref())
                .map_err(|e| Error::Conversion {
                    batch: false,
                    reason: reason(e),
                })?;
            let pdf = job::resolve(&target);
            console.say(format_args!("Saved: {}", pdf.display()))?;
            Ok(Outcome::File { pdf })
        }
        Job::Directory {
            input,
            output,
            sources,
        } => {
            if let Some(dir) = output {
                if !dir.exists() {
                    log::debug!("creating {}", dir.display());
                    std::fs::create_dir_all(dir)?;
                }
            }
            let count = sources.len();
            console.say(format_args!("Found {count} file(s) to convert..."))?;
            converter
                .convert(input, output.as_deref())
                .map_err(|e| Error::Conversion {
                    batch: true,
                    reason: reason(e),
                })?;
            let dir = job::resolve(job::pdf_dir(input, output.as_deref()));
            console.say(format_args!("Saved {count} PDF(s) to: {}", dir.display()))?;
            Ok(Outcome::Directory { count, dir })
        }
    }
}

/// Text of a converter failure without this crate's own `Error:` prefix.
fn reason(e: Error) -> String {
    match e {
        Error::Io(io) => io.to_string(),
        other => other.to_string(),
    }
}

struct Console<'a> {
    out: &'a mut dyn Write,
    quiet: bool,
}

impl Console<'_> {
    fn say(&mut self, line: std::fmt::Arguments<'_>) -> Result<(), Error> {
        if !self.quiet {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}
