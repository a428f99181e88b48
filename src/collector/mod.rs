// src/collector/mod.rs
pub mod models;

pub use models::FilingMetadata;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::utils::error::CollectError;

/// File name the downloader writes inside each accession directory.
const SUBMISSION_FILE: &str = "full-submission.txt";

/// Header line carrying the filing date, format YYYYMMDD.
const FILED_DATE_PREFIX: &str = "FILED AS OF DATE:";

/// How much of the submission head to scan for the date line. The SGML
/// header sits in the first couple of kilobytes.
const HEADER_SCAN_BYTES: u64 = 16 * 1024;

/// Scans the raw filings directory for downloaded submissions.
///
/// Expected layout: `<raw_dir>/<TICKER>/<FORM>/<CIK-YY-SERIAL>/full-submission.txt`.
/// Entries with unexpected names or a missing date line are skipped with a
/// warning; the scan continues. Results are ordered by path so repeated runs
/// process documents in the same order.
pub fn gather_filings(raw_dir: &Path) -> Result<Vec<FilingMetadata>, CollectError> {
    if !raw_dir.is_dir() {
        return Err(CollectError::RootNotFound(raw_dir.display().to_string()));
    }

    let mut filings = Vec::new();
    for ticker_dir in sorted_dirs(raw_dir)? {
        let ticker = dir_name(&ticker_dir);
        for form_dir in sorted_dirs(&ticker_dir)? {
            let form_type = dir_name(&form_dir);
            for accession_dir in sorted_dirs(&form_dir)? {
                let path = accession_dir.join(SUBMISSION_FILE);
                if !path.is_file() {
                    continue;
                }

                let accession = dir_name(&accession_dir);
                let Some(cik) = parse_accession_dir(&accession) else {
                    tracing::warn!(
                        "Skipping directory with unexpected name format: {}",
                        accession
                    );
                    continue;
                };

                match filing_date_from_header(&path) {
                    Ok(Some(filing_date)) => filings.push(FilingMetadata {
                        cik,
                        ticker: ticker.clone(),
                        form_type: form_type.clone(),
                        filing_date,
                        path,
                    }),
                    Ok(None) => {
                        tracing::warn!("Could not find filing date for {}, skipping", accession);
                    }
                    Err(e) => {
                        tracing::warn!("Could not read header of {}: {}", path.display(), e);
                    }
                }
            }
        }
    }

    Ok(filings)
}

fn sorted_dirs(parent: &Path) -> Result<Vec<PathBuf>, CollectError> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Accession directories are named `CIK-YY-SERIAL`. Returns the CIK, or
/// None for anything that doesn't fit the shape.
fn parse_accession_dir(name: &str) -> Option<String> {
    let mut parts = name.split('-');
    let cik = parts.next()?;
    let year = parts.next()?;
    let serial = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(cik) || year.len() != 2 || !all_digits(year) || !all_digits(serial) {
        return None;
    }

    Some(cik.to_string())
}

/// Scans the head of a submission file for the `FILED AS OF DATE` line and
/// reformats its YYYYMMDD value to YYYY-MM-DD.
fn filing_date_from_header(path: &Path) -> std::io::Result<Option<String>> {
    let mut head = Vec::new();
    fs::File::open(path)?
        .take(HEADER_SCAN_BYTES)
        .read_to_end(&mut head)?;
    let head = String::from_utf8_lossy(&head);

    for line in head.lines() {
        if let Some(rest) = line.trim().strip_prefix(FILED_DATE_PREFIX) {
            let date = rest.trim();
            if date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()) {
                return Ok(Some(format!(
                    "{}-{}-{}",
                    &date[..4],
                    &date[4..6],
                    &date[6..]
                )));
            }
            return Ok(None);
        }
    }

    Ok(None)
}
