//! Drives the LibreOffice backend against a stand-in `soffice` script.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use assert_cmd::Command;
use docx2pdf::{Converter, Error, Office};
use predicates::prelude::*;
use tempfile::TempDir;

/// Writes a placeholder PDF into `--outdir` for every `.docx` argument and
/// appends one line per run to `$FAKE_SOFFICE_LOG`. Options given in
/// `-env:` form are appended to `$FAKE_SOFFICE_ENV`. A source whose name
/// contains `broken` produces nothing; one containing `crash` fails the run.
const FAKE_SOFFICE: &str = r#"#!/bin/sh
[ -n "$FAKE_SOFFICE_LOG" ] && echo run >> "$FAKE_SOFFICE_LOG"
outdir=.
while [ "$#" -gt 0 ]; do
    case "$1" in
        --outdir) outdir="$2"; shift 2 ;;
        --convert-to) shift 2 ;;
        -env:*)
            [ -n "$FAKE_SOFFICE_ENV" ] && echo "$1" >> "$FAKE_SOFFICE_ENV"
            shift
            ;;
        -*) shift ;;
        *crash*) echo "soffice: fatal error" >&2; exit 81 ;;
        *broken*) shift ;;
        *)
            name=$(basename "$1")
            name="${name%.*}"
            printf '%%PDF-1.4\n' > "$outdir/$name.pdf"
            shift
            ;;
    esac
done
exit 0
"#;

// Written once before any test spawns it; concurrent writers would make the
// exec fail with ETXTBSY.
fn fake_soffice() -> &'static Path {
    static SCRIPT: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
    let (_, path) = SCRIPT.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("soffice");
        fs::write(&path, FAKE_SOFFICE).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    });
    path
}

fn touch(path: &Path) {
    fs::write(path, b"PK").unwrap();
}

fn runs(log: &Path) -> usize {
    fs::read_to_string(log).map_or(0, |s| s.lines().count())
}

fn leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(".docx2pdf-"))
        .collect()
}

fn docx2pdf(log: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docx2pdf").unwrap();
    cmd.env("DOCX2PDF_SOFFICE", fake_soffice())
        .env("FAKE_SOFFICE_LOG", log);
    cmd
}

#[test]
fn single_file_lands_next_to_input() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let input = tmp.path().join("report.docx");
    touch(&input);

    docx2pdf(&log)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Converting: report.docx"))
        .stdout(predicate::str::contains("Saved: "))
        .stdout(predicate::str::contains("report.pdf"));

    assert!(tmp.path().join("report.pdf").is_file());
    assert_eq!(runs(&log), 1);
    assert!(leftovers(tmp.path()).is_empty());
}

#[test]
fn single_file_is_renamed_to_output() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let input = tmp.path().join("report.docx");
    let output = tmp.path().join("out/final.pdf");
    touch(&input);

    docx2pdf(&log)
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(output.is_file());
    assert!(!tmp.path().join("out/report.pdf").exists());
    assert!(leftovers(&tmp.path().join("out")).is_empty());
}

#[test]
fn directory_converts_in_one_run() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let docs = tmp.path().join("docs");
    fs::create_dir(&docs).unwrap();
    for name in ["a.docx", "b.docx", "c.DOCX", "ignore.txt"] {
        touch(&docs.join(name));
    }
    let outdir = tmp.path().join("pdfs");

    docx2pdf(&log)
        .arg(&docs)
        .arg("--output")
        .arg(&outdir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 file(s) to convert..."))
        .stdout(predicate::str::contains("Saved 3 PDF(s) to: "));

    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        assert!(outdir.join(name).is_file(), "{name} missing");
    }
    assert_eq!(runs(&log), 1);
    assert!(leftovers(&outdir).is_empty());
}

#[test]
fn office_failure_carries_stderr() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let input = tmp.path().join("crash.docx");
    touch(&input);

    docx2pdf(&log)
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error converting file:"))
        .stderr(predicate::str::contains("soffice: fatal error"));

    assert!(!tmp.path().join("crash.pdf").exists());
    assert!(leftovers(tmp.path()).is_empty());
}

#[test]
fn missing_output_fails_even_on_clean_exit() {
    let tmp = TempDir::new().unwrap();
    for name in ["fine.docx", "broken.docx"] {
        touch(&tmp.path().join(name));
    }

    let err = Office::with_program(fake_soffice())
        .convert(tmp.path(), None)
        .unwrap_err();

    assert!(matches!(err, Error::Backend(_)));
    assert!(err.to_string().contains("broken.docx"));
    assert!(!tmp.path().join("fine.pdf").exists());
    assert!(leftovers(tmp.path()).is_empty());
}

#[test]
fn existing_output_directory_receives_named_pdf() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("memo.docx");
    let outdir = tmp.path().join("pdfs");
    touch(&input);
    fs::create_dir(&outdir).unwrap();

    Office::with_program(fake_soffice())
        .convert(&input, Some(&outdir))
        .unwrap();

    assert!(outdir.join("memo.pdf").is_file());
}

#[test]
fn profile_url_escapes_reserved_characters() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let env_log = tmp.path().join("env.log");
    let scratch = tmp.path().join("a#b c?é");
    fs::create_dir(&scratch).unwrap();
    let input = tmp.path().join("report.docx");
    touch(&input);

    docx2pdf(&log)
        .env("TMPDIR", &scratch)
        .env("FAKE_SOFFICE_ENV", &env_log)
        .arg(&input)
        .assert()
        .success();

    let recorded = fs::read_to_string(&env_log).unwrap();
    let line = recorded.trim();
    assert!(line.starts_with("-env:UserInstallation=file:///"), "{line}");
    assert!(line.contains("/a%23b%20c%3F%C3%A9/docx2pdf-profile-"), "{line}");
    assert!(!line.contains('#') && !line.contains('?'), "{line}");
}

#[test]
fn word_lock_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("calls.log");
    let docs = tmp.path().join("docs");
    fs::create_dir(&docs).unwrap();
    touch(&docs.join("x.docx"));
    touch(&docs.join("~$x.docx"));

    docx2pdf(&log)
        .arg(&docs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 file(s) to convert..."))
        .stdout(predicate::str::contains("Saved 1 PDF(s) to: "));

    assert!(docs.join("x.pdf").is_file());
    assert!(!docs.join("~$x.pdf").exists());
}

#[test]
fn colliding_pdf_names_fail_before_anything_is_written() {
    let tmp = TempDir::new().unwrap();
    touch(&tmp.path().join("a.docx"));
    touch(&tmp.path().join("a.DOCX"));
    if fs::read_dir(tmp.path()).unwrap().count() < 2 {
        // Case-insensitive filesystem: both names are the same file.
        return;
    }

    let err = Office::with_program(fake_soffice())
        .convert(tmp.path(), None)
        .unwrap_err();

    let message = err.to_string();
    assert!(matches!(err, Error::Backend(_)));
    assert!(message.contains("a.DOCX") && message.contains("a.docx"), "{message}");
    assert!(!tmp.path().join("a.pdf").exists());
    assert!(leftovers(tmp.path()).is_empty());
}
