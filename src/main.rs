use clap::Parser;
use docx2pdf::{Office, Options};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docx2pdf",
    version,
    about = "Convert Word documents (.docx) to PDF",
    after_help = "Examples:
  docx2pdf document.docx                  Convert single file
  docx2pdf document.docx -o output.pdf    Specify output name
  docx2pdf ./documents/                   Convert all .docx in folder
  docx2pdf ./docs/ -o ./pdfs/             Convert folder to folder

Progress goes to standard output; errors are printed to standard error."
)]
struct Args {
    /// Input .docx file or directory containing .docx files
    input: PathBuf,
    /// Output PDF file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
    /// LibreOffice program to convert with (searched on PATH by default)
    #[arg(long, value_name = "PATH", env = docx2pdf::PROGRAM_ENV)]
    soffice: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let office = match args.soffice {
        Some(program) => Office::with_program(program),
        None => Office::new(),
    };
    let opts = Options {
        input: args.input,
        output: args.output,
        quiet: args.quiet,
    };

    if let Err(e) = docx2pdf::run(&opts, &office, &mut std::io::stdout()) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
