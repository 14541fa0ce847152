//! Interactive data-file picker.
//!
//! Kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `sfit` and choose a table" UX when the default
//!   data file is not present
//!
//! The picker searches for `.csv`/`.tsv`/`.txt`/`.dat` tables under the current
//! working directory, the same extensions `validate_table_path` accepts.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Default directory recursion depth for finding tables.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Extensions accepted for measurement tables.
const TABLE_EXTENSIONS: [&str; 4] = ["csv", "tsv", "txt", "dat"];

/// Prompt the user to select a measurement table from the current directory tree.
///
/// Behavior:
/// - list discovered tables, each with how many measurements it yields when
///   read with `delimiter`
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_table_path(delimiter: u8) -> Result<PathBuf, AppError> {
    let files = discover_table_files();
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv/.tsv/.txt/.dat files found. Provide one with `sfit fit -f <file.csv>`.",
        ));
    }

    println!("Found {} table file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!(
            "{:>3}) {} {}",
            idx + 1,
            pretty_path(path),
            describe_table(path, delimiter)
        );
    }

    loop {
        print!("Select a file by number (1-{}) or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a data path with `sfit fit -f <file.csv>`.",
            ));
        }

        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_table_path(&files[choice - 1]);
            }
            println!("Invalid choice: {choice}. Enter a number between 1 and {}.", files.len());
            continue;
        }

        match validate_table_path(Path::new(input)) {
            Ok(path) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

/// Validate the provided path points to an existing delimited-table file.
pub fn validate_table_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(
            2,
            format!("Data file not found: {}", path.display()),
        ));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_table_extension(path) {
        return Err(AppError::new(
            2,
            format!(
                "Expected a .csv/.tsv/.txt/.dat table (got: {}). Use -f to pass a data path.",
                path.display()
            ),
        ));
    }

    Ok(path.to_path_buf())
}

fn has_table_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TABLE_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
        == Some(true)
}

/// Discover table files under the current directory (deterministic order).
pub fn discover_table_files() -> Vec<PathBuf> {
    find_table_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn find_table_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_table_files_inner(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_table_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_table_files_inner(&path, depth + 1, max_depth, out);
            }
            continue;
        }

        if file_type.is_file() && has_table_extension(&path) {
            out.push(path);
        }
    }
}

/// Short note on whether a table can be fitted as-is.
fn describe_table(path: &Path, delimiter: u8) -> String {
    let Ok(file) = fs::File::open(path) else {
        return "(unreadable)".to_string();
    };
    match crate::io::read_measurements(file, delimiter) {
        Ok(rows) => format!("({} measurement(s))", rows.len()),
        Err(err) if err.exit_code() == 3 => "(no measurements)".to_string(),
        Err(_) => "(no Conductivity/Seebeck columns or bad rows)".to_string(),
    }
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tables_and_skips_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "x").unwrap();
        fs::write(dir.path().join("a.CSV"), "x").unwrap();
        fs::write(dir.path().join("notes.md"), "x").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target").join("c.csv"), "x").unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data").join("d.csv"), "x").unwrap();

        fs::write(dir.path().join("e.tsv"), "x").unwrap();

        let found = find_table_files(dir.path(), 2);
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"e.tsv".to_string()));
        assert!(names.contains(&"a.CSV".to_string()));
        assert!(names.contains(&"d.csv".to_string()));
        assert!(!names.contains(&"c.csv".to_string()));
    }

    #[test]
    fn describes_fittable_tables() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        let empty = dir.path().join("empty.csv");
        let other = dir.path().join("other.csv");
        fs::write(&good, "Conductivity,Seebeck\n1e5,150\n5e5,80\n").unwrap();
        fs::write(&empty, "Conductivity,Seebeck\n").unwrap();
        fs::write(&other, "Date,Price\n2024-01-01,3\n").unwrap();

        assert_eq!(describe_table(&good, b','), "(2 measurement(s))");
        assert_eq!(describe_table(&empty, b','), "(no measurements)");
        assert!(describe_table(&other, b',').contains("no Conductivity/Seebeck"));
        assert_eq!(describe_table(&dir.path().join("gone.csv"), b','), "(unreadable)");
    }

    #[test]
    fn describes_tables_with_the_configured_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let semi = dir.path().join("semi.csv");
        fs::write(&semi, "Conductivity;Seebeck\n1e5;150\n").unwrap();

        assert_eq!(describe_table(&semi, b';'), "(1 measurement(s))");
        assert!(describe_table(&semi, b',').contains("no Conductivity/Seebeck"));
    }

    #[test]
    fn validates_table_paths() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("m.csv");
        let md = dir.path().join("m.md");
        fs::write(&csv, "x").unwrap();
        fs::write(&md, "x").unwrap();

        assert_eq!(validate_table_path(&csv).unwrap(), csv);
        assert!(validate_table_path(&md).is_err());
        assert!(validate_table_path(dir.path()).is_err());
        assert!(validate_table_path(&dir.path().join("missing.csv")).is_err());
    }
}
