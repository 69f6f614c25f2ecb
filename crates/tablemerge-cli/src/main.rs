//! CLI that merges independent `*.tables.json` extraction results found
//! across one or more input directories, one output file per basename.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tablemerge_core::{MergeConfig, MergeError, TablesFile, merge_tablesfiles};

/// Merge JSON tables from multiple directories.
#[derive(Debug, Parser)]
struct Args {
    /// Directory to store merged output.
    #[arg(short = 'o', long = "output-directory", default_value = ".")]
    output_directory: PathBuf,

    /// Input directories containing .tables.json files.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() {
    let args = Args::parse();
    merge_resultsets(&args.paths, &args.output_directory);
}

/// Scans every directory in `resultset_dirs` for `*.tables.json` files,
/// then merges each distinct basename's files into `output_dir`.
fn merge_resultsets(resultset_dirs: &[PathBuf], output_dir: &Path) {
    if let Err(err) = fs::create_dir_all(output_dir) {
        eprintln!("failed to create output directory {}: {err}", output_dir.display());
        return;
    }

    let mut basenames = BTreeSet::new();
    for resultset_dir in resultset_dirs {
        let entries = match fs::read_dir(resultset_dir) {
            Ok(entries) => entries,
            Err(err) => {
                eprintln!("failed to read directory {}: {err}", resultset_dir.display());
                continue;
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(".tables.json") {
                basenames.insert(name.into_owned());
            }
        }
    }

    for basename in basenames {
        merge_tablesfiles_paths(&basename, resultset_dirs, output_dir);
    }
}

/// Merges every `resultset_dirs` file named `basename` into
/// `<output_dir>/<basename>`, reporting the outcome to stdout.
fn merge_tablesfiles_paths(basename: &str, resultset_dirs: &[PathBuf], output_dir: &Path) {
    let mut files = Vec::new();
    for resultset_dir in resultset_dirs {
        let tables_path = resultset_dir.join(basename);
        if !tables_path.exists() {
            continue;
        }
        let contents = match fs::read_to_string(&tables_path) {
            Ok(contents) => contents,
            Err(err) => {
                println!("{basename}: MERGE FAILED: {err}");
                return;
            }
        };
        let file: TablesFile = match serde_json::from_str(&contents) {
            Ok(file) => file,
            Err(err) => {
                println!("{basename}: MERGE FAILED: {err}");
                return;
            }
        };
        files.push(file);
    }

    if files.iter().all(|file| file.tables.is_empty()) {
        println!("{basename}: MERGE SKIPPED: all tables are empty");
        return;
    }

    let config = MergeConfig { row_agreement: true, column_agreement: false };
    match merge_tablesfiles(&files, config) {
        Ok(merged) => {
            let tables_count = files.len();
            let output_path = output_dir.join(basename);
            match serde_json::to_string(&merged) {
                Ok(json) => match fs::write(&output_path, json) {
                    Ok(()) => println!("{basename}: MERGED: {tables_count} files into {} tables", merged.tables.len()),
                    Err(err) => println!("{basename}: MERGE FAILED: {err}"),
                },
                Err(err) => println!("{basename}: MERGE FAILED: {err}"),
            }
        }
        Err(err) => report_merge_error(basename, &err),
    }
}

fn report_merge_error(basename: &str, err: &MergeError) {
    println!("{basename}: MERGE FAILED: {err}");
}
