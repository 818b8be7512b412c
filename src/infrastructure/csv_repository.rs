// CSV repository implementation - one `<source>.csv` file per history table
use crate::application::history_repository::HistoryRepository;
use crate::domain::history::{normalize_header, HistoryRow, RawCell};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CsvHistoryRepository {
    data_dir: PathBuf,
}

impl CsvHistoryRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn table_path(&self, source: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", source))
    }
}

/// Parse a history table. Headers are normalized; rows with no content are skipped.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<HistoryRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| normalize_header(h.trim_start_matches('\u{feff}')))
        .collect();

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at line {}", line_num + 2))?;

        let mut row = HistoryRow::new();
        let mut has_content = false;
        for (header, raw) in headers.iter().zip(record.iter()) {
            if header.is_empty() {
                continue;
            }
            let cell = RawCell::parse(raw);
            has_content |= cell != RawCell::Empty;
            row.insert(header, cell);
        }

        if has_content {
            rows.push(row);
        }
    }

    Ok(rows)
}

#[async_trait]
impl HistoryRepository for CsvHistoryRepository {
    async fn list_sources(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir)
            .await
            .with_context(|| format!("Failed to read data directory {}", self.data_dir.display()))?;

        let mut sources = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sources.push(stem.to_string());
            }
        }

        sources.sort();
        Ok(sources)
    }

    async fn load_rows(&self, source: &str) -> Result<Vec<HistoryRow>> {
        let path = self.table_path(source);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to open '{}'", path.display()))?;

        let rows = parse_rows(bytes.as_slice())
            .with_context(|| format!("Failed to parse '{}'", path.display()))?;

        tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extractor::extract_latest;
    use crate::domain::indicator::FieldMapping;

    const SAMPLE_CSV: &str = "\
\u{feff} semana ,Realização  Semanal,meta,% Ameaças Indicador Mês,Descrição da Meta
2024-S01,0.95,0.90,,
2024-S02,0.80,0.90,0.12,Meta contratual de 90%
2024-S03,0.85,,,
,,,,
";

    #[test]
    fn test_parse_rows_normalizes_headers() {
        let rows = parse_rows(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].text("SEMANA").as_deref(), Some("2024-S01"));
        assert_eq!(rows[1].number("% AMEAÇAS INDICADOR MÊS"), Ok(Some(0.12)));
        assert_eq!(rows[2].number("META"), Ok(None));
    }

    #[test]
    fn test_parsed_rows_feed_the_extractor() {
        let rows = parse_rows(SAMPLE_CSV.as_bytes()).unwrap();
        let latest = extract_latest(&rows, &FieldMapping::new("REALIZAÇÃO  SEMANAL")).unwrap();
        assert_eq!(latest.period, "2024-S02");
        assert_eq!(latest.value, 0.80);
        assert_eq!(latest.note.as_deref(), Some("Meta contratual de 90%"));
    }

    #[tokio::test]
    async fn test_load_and_list_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("realizacao_semanal.csv"), SAMPLE_CSV).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let repository = CsvHistoryRepository::new(dir.path());
        assert_eq!(repository.list_sources().await.unwrap(), vec!["realizacao_semanal"]);

        let rows = repository.load_rows("realizacao_semanal").await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repository = CsvHistoryRepository::new(dir.path());
        assert!(repository.load_rows("pfceo").await.is_err());
    }
}
