// src/storage/schema.rs
//
// Table creation for the filings database. Idempotent — safe to run on
// every startup.

use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        -- Term dimension table; term ids are the stable lookup the rest of
        -- the store keys against.
        CREATE TABLE IF NOT EXISTS terms (
            term_id INTEGER PRIMARY KEY AUTOINCREMENT,
            term TEXT NOT NULL,
            category TEXT NOT NULL,
            UNIQUE (term, category)
        );

        -- One row per accepted filing, including the gate-passing word count.
        CREATE TABLE IF NOT EXISTS filings (
            filing_id INTEGER PRIMARY KEY AUTOINCREMENT,
            cik TEXT NOT NULL,
            ticker TEXT NOT NULL,
            form_type TEXT NOT NULL,
            filing_date TEXT NOT NULL,
            file_path TEXT NOT NULL,
            word_count INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS scores (
            filing_id INTEGER NOT NULL REFERENCES filings(filing_id),
            t_score REAL NOT NULL,
            r_score REAL NOT NULL,
            a_score REAL NOT NULL,
            rai_score REAL NOT NULL
        );

        -- Per (term, section) match frequencies.
        CREATE TABLE IF NOT EXISTS counts (
            filing_id INTEGER NOT NULL REFERENCES filings(filing_id),
            term_id INTEGER NOT NULL REFERENCES terms(term_id),
            section TEXT NOT NULL,
            frequency INTEGER NOT NULL
        );

        -- One row per individual match occurrence, for drill-through.
        CREATE TABLE IF NOT EXISTS snippets (
            filing_id INTEGER NOT NULL REFERENCES filings(filing_id),
            term_id INTEGER NOT NULL REFERENCES terms(term_id),
            context TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_counts_filing ON counts(filing_id);
        CREATE INDEX IF NOT EXISTS idx_snippets_filing ON snippets(filing_id);
        ",
    )
}
