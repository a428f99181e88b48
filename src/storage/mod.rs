// src/storage/mod.rs
pub mod export;
pub mod schema;

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection};

use crate::collector::FilingMetadata;
use crate::config::AnalysisConfig;
use crate::pipeline::DocumentAnalysis;
use crate::utils::error::StorageError;

/// Destination for one document's full record set (metadata + scores +
/// counts + snippets). The pipeline emits records through this seam, so
/// tests can assert on them with an in-memory sink instead of a database.
pub trait RecordSink {
    fn persist(
        &mut self,
        metadata: &FilingMetadata,
        analysis: &DocumentAnalysis,
    ) -> Result<(), StorageError>;
}

/// SQLite-backed store. Owns the term-name -> term-id lookup; the core
/// never sees term ids.
pub struct SqliteStore {
    conn: Connection,
    term_ids: HashMap<String, i64>,
}

impl SqliteStore {
    /// Opens (or creates) the database, creates tables, and seeds the terms
    /// dimension table from the taxonomy.
    pub fn open(db_path: &str, config: &AnalysisConfig) -> Result<Self, StorageError> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn, config)
    }

    /// Shared setup for file-backed and in-memory (test) connections.
    pub fn with_connection(
        conn: Connection,
        config: &AnalysisConfig,
    ) -> Result<Self, StorageError> {
        schema::create_tables(&conn)?;
        seed_terms(&conn, config)?;
        let term_ids = load_term_ids(&conn)?;
        tracing::debug!("Store ready: {} terms in dimension table", term_ids.len());
        Ok(Self { conn, term_ids })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordSink for SqliteStore {
    /// Writes the whole record set in one transaction so an interrupted run
    /// never leaves orphaned score/count/snippet rows.
    fn persist(
        &mut self,
        metadata: &FilingMetadata,
        analysis: &DocumentAnalysis,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO filings (cik, ticker, form_type, filing_date, file_path, word_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                metadata.cik,
                metadata.ticker,
                metadata.form_type,
                metadata.filing_date,
                metadata.path.display().to_string(),
                analysis.scores.word_count as i64,
            ],
        )?;
        let filing_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO scores (filing_id, t_score, r_score, a_score, rai_score)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                filing_id,
                analysis.scores.transparency_score,
                analysis.scores.risk_score,
                analysis.scores.action_score,
                analysis.scores.composite_score,
            ],
        )?;

        for count in &analysis.counts {
            let Some(term_id) = self.term_ids.get(&count.term) else {
                tracing::warn!("Dropping count for unseeded term '{}'", count.term);
                continue;
            };
            tx.execute(
                "INSERT INTO counts (filing_id, term_id, section, frequency)
                 VALUES (?1, ?2, ?3, ?4)",
                params![filing_id, term_id, count.section, count.frequency as i64],
            )?;
        }

        for snippet in &analysis.snippets {
            let Some(term_id) = self.term_ids.get(&snippet.term) else {
                continue;
            };
            tx.execute(
                "INSERT INTO snippets (filing_id, term_id, context) VALUES (?1, ?2, ?3)",
                params![filing_id, term_id, snippet.context],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn seed_terms(conn: &Connection, config: &AnalysisConfig) -> Result<(), StorageError> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO terms (term, category) VALUES (?1, ?2)")?;
    for (category, terms) in &config.terms {
        for term in terms {
            stmt.execute(params![term, category])?;
        }
    }
    Ok(())
}

fn load_term_ids(conn: &Connection) -> Result<HashMap<String, i64>, StorageError> {
    let mut stmt = conn.prepare("SELECT term_id, term FROM terms")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(0)?)))?;

    let mut map = HashMap::new();
    for row in rows {
        let (term, id) = row?;
        map.insert(term, id);
    }
    Ok(map)
}

/// In-memory sink for tests: keeps every persisted record set so assertions
/// can run against exactly what the pipeline emitted.
#[cfg(test)]
pub struct MemorySink {
    pub records: Vec<(FilingMetadata, DocumentAnalysis)>,
}

#[cfg(test)]
impl MemorySink {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

#[cfg(test)]
impl RecordSink for MemorySink {
    fn persist(
        &mut self,
        metadata: &FilingMetadata,
        analysis: &DocumentAnalysis,
    ) -> Result<(), StorageError> {
        self.records.push((
            metadata.clone(),
            DocumentAnalysis {
                scores: analysis.scores.clone(),
                counts: analysis.counts.clone(),
                snippets: analysis.snippets.clone(),
            },
        ));
        Ok(())
    }
}
