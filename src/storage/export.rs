// src/storage/export.rs
//
// Flattened CSV exports for dashboard tools. Each file is a denormalized
// join over the persisted tables; nothing here feeds back into the core.

use std::fs;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::utils::error::StorageError;

/// One row per filing with all four scores.
const DASHBOARD_MAIN_QUERY: &str = "
    SELECT
        f.filing_id,
        f.ticker,
        f.form_type,
        f.filing_date,
        f.word_count,
        s.t_score,
        s.r_score,
        s.a_score,
        s.rai_score
    FROM filings f
    JOIN scores s ON f.filing_id = s.filing_id";

/// Per term/section frequencies with their category.
const ALL_COUNTS_QUERY: &str = "
    SELECT
        f.filing_id,
        f.ticker,
        f.filing_date,
        t.term,
        t.category,
        c.section,
        c.frequency
    FROM counts c
    JOIN filings f ON c.filing_id = f.filing_id
    JOIN terms t ON c.term_id = t.term_id";

/// Match contexts for drill-through views.
const ALL_SNIPPETS_QUERY: &str = "
    SELECT
        f.filing_id,
        f.ticker,
        t.term,
        s.context
    FROM snippets s
    JOIN filings f ON s.filing_id = f.filing_id
    JOIN terms t ON s.term_id = t.term_id";

/// Writes the three export tables plus a small manifest into `out_dir`.
pub fn export_all(conn: &Connection, out_dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(out_dir)?;

    let main_rows = export_query(conn, &out_dir.join("dashboard_main.csv"), DASHBOARD_MAIN_QUERY)?;
    let count_rows = export_query(conn, &out_dir.join("all_counts.csv"), ALL_COUNTS_QUERY)?;
    let snippet_rows = export_query(conn, &out_dir.join("all_snippets.csv"), ALL_SNIPPETS_QUERY)?;

    let manifest = serde_json::json!({
        "exported_at": chrono::Utc::now().to_rfc3339(),
        "dashboard_main_rows": main_rows,
        "all_counts_rows": count_rows,
        "all_snippets_rows": snippet_rows,
    });
    let manifest_str = serde_json::to_string_pretty(&manifest)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    fs::write(out_dir.join("export_manifest.json"), manifest_str)?;

    tracing::info!(
        "Exported {} filings, {} counts, {} snippets to {}",
        main_rows,
        count_rows,
        snippet_rows,
        out_dir.display()
    );
    Ok(())
}

/// Runs one query and writes the result as CSV, header row included.
/// Returns the number of data rows written.
fn export_query(conn: &Connection, path: &Path, sql: &str) -> Result<usize, StorageError> {
    let mut stmt = conn.prepare(sql)?;
    let column_count = stmt.column_count();
    let headers: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut out = String::new();
    out.push_str(&headers.join(","));
    out.push('\n');

    let mut row_count = 0;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut fields = Vec::with_capacity(column_count);
        for i in 0..column_count {
            fields.push(csv_field(row.get_ref(i)?));
        }
        out.push_str(&fields.join(","));
        out.push('\n');
        row_count += 1;
    }

    fs::write(path, out)?;
    tracing::debug!("Wrote {} rows to {}", row_count, path.display());
    Ok(row_count)
}

fn csv_field(value: ValueRef) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) => escape_csv(&String::from_utf8_lossy(bytes)),
        ValueRef::Blob(_) => String::new(),
    }
}

/// Quotes a field when it contains a delimiter, quote, or line break;
/// embedded quotes are doubled.
fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::storage::{schema, SqliteStore};

    #[test]
    fn escapes_fields_with_delimiters_and_quotes() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn exports_joined_tables_with_headers() {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_tables(&conn).unwrap();
        conn.execute_batch(
            "
            INSERT INTO terms (term, category) VALUES ('usage', 'usage');
            INSERT INTO filings (cik, ticker, form_type, filing_date, file_path, word_count)
                VALUES ('0000320193', 'AAPL', '10-K', '2023-11-03', '/tmp/x.txt', 1500);
            INSERT INTO scores (filing_id, t_score, r_score, a_score, rai_score)
                VALUES (1, 2.0, 1.0, 0.0, 3.0);
            INSERT INTO counts (filing_id, term_id, section, frequency)
                VALUES (1, 1, 'item 1a. risk factors', 2);
            INSERT INTO snippets (filing_id, term_id, context)
                VALUES (1, 1, '...context, with a comma...');
            ",
        )
        .unwrap();

        let out_dir = std::env::temp_dir().join(format!(
            "rai_disclosure_export_test_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&out_dir);
        export_all(&conn, &out_dir).unwrap();

        let main = fs::read_to_string(out_dir.join("dashboard_main.csv")).unwrap();
        let mut lines = main.lines();
        assert_eq!(
            lines.next(),
            Some("filing_id,ticker,form_type,filing_date,word_count,t_score,r_score,a_score,rai_score")
        );
        assert_eq!(lines.next(), Some("1,AAPL,10-K,2023-11-03,1500,2,1,0,3"));

        let counts = fs::read_to_string(out_dir.join("all_counts.csv")).unwrap();
        assert!(counts.contains("usage,usage,item 1a. risk factors,2"));

        let snippets = fs::read_to_string(out_dir.join("all_snippets.csv")).unwrap();
        assert!(snippets.contains("\"...context, with a comma...\""));

        assert!(out_dir.join("export_manifest.json").is_file());

        fs::remove_dir_all(&out_dir).unwrap();
    }

    #[test]
    fn export_runs_on_an_empty_store() {
        let config: AnalysisConfig = serde_yaml::from_str(
            r#"
terms:
  usage: ["AI"]
  governance: ["oversight"]
  action: ["audit"]
sections: ['risk factors']
weights: { transparency: 1.0, risk: 1.0, action: 1.0 }
"#,
        )
        .unwrap();
        let store =
            SqliteStore::with_connection(Connection::open_in_memory().unwrap(), &config).unwrap();

        let out_dir = std::env::temp_dir().join(format!(
            "rai_disclosure_export_empty_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&out_dir);
        export_all(store.connection(), &out_dir).unwrap();

        let main = fs::read_to_string(out_dir.join("dashboard_main.csv")).unwrap();
        assert_eq!(main.lines().count(), 1); // header only

        fs::remove_dir_all(&out_dir).unwrap();
    }
}
