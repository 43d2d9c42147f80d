//! `exifdump` — a small command-line front end over the `exifwalk` library.
//!
//! Usage: `exifdump FILE...`
//!
//! For each file, sniffs whether it looks like a JPEG (and if so locates the
//! embedded APP1 Exif segment) or a bare TIFF/RAW stream, parses it, and
//! prints every directory's tags plus any recorded parse errors.

use exifwalk::{extract_exif_segment, extract_tiff, find_app1_exif, DirectoryKind, MetadataStore};
use std::env;
use std::fs;
use std::process::ExitCode;

fn parse(contents: &[u8]) -> Result<MetadataStore, String> {
    if contents.len() >= 4 && &contents[0..2] == b"\xff\xd8" {
        let segment = find_app1_exif(contents).map_err(|e| e.to_string())?;
        extract_exif_segment(segment).map_err(|e| e.to_string())
    } else {
        extract_tiff(contents).map_err(|e| e.to_string())
    }
}

fn print_directory(kind: DirectoryKind, dir: &exifwalk::Directory) {
    println!("  {kind:?} ({} tags)", dir.len());
    for (tag_id, value) in dir.tags() {
        println!("    {tag_id:#06x} = {value:?}");
    }
    for error in dir.errors() {
        println!("    ! {error}");
    }
}

fn dump(path: &str) -> Result<(), String> {
    let contents = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let store = parse(&contents).map_err(|e| format!("{path}: {e}"))?;

    println!("{path}:");
    for (kind, dir) in store.directories() {
        if !kind.is_makernote() {
            print_directory(*kind, dir);
        }
    }
    let mut printed_makernote_heading = false;
    for (kind, dir) in store.directories() {
        if kind.is_makernote() {
            if !printed_makernote_heading {
                println!("  Makernote:");
                printed_makernote_heading = true;
            }
            print_directory(*kind, dir);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: exifdump FILE...");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for path in &paths {
        if let Err(message) = dump(path) {
            eprintln!("{message}");
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
