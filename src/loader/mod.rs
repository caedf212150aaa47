
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::{RagError, Result};

/// Metadata carried by every record, with a fixed key set.
///
/// Spreadsheet rows fill `title`, `tags` and `source`; PDF pages fill
/// `title` (the file stem) and `page`. `title` labels the chunk when the
/// answer context is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMetadata {
    pub title: String,
    pub tags: Option<String>,
    pub source: Option<String>,
    /// 1-based page number, PDF sources only
    pub page: Option<usize>,
}

/// One logical unit of source content: a spreadsheet row or a PDF page.
/// Immutable after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
    pub metadata: RecordMetadata,
}

const CONTENT_COLUMN: &str = "Content";
const TITLE_COLUMN: &str = "Title";
const TAGS_COLUMN: &str = "Tags";
const SOURCE_COLUMN: &str = "Source";

/// Load records from a CSV file, one record per row.
#[inline]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RagError::SourceNotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let records = load_csv_reader(file)?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Load records from CSV data, one record per row.
///
/// The header must contain the `Content`, `Title`, `Tags` and `Source`
/// columns; the first missing one fails the whole load with
/// [`RagError::MissingColumn`] before any downstream work happens.
#[inline]
pub fn load_csv_reader<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| RagError::CorruptDocument(format!("unreadable CSV header: {e}")))?
        .clone();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| RagError::MissingColumn(name.to_string()))
    };

    let content_idx = column(CONTENT_COLUMN)?;
    let title_idx = column(TITLE_COLUMN)?;
    let tags_idx = column(TAGS_COLUMN)?;
    let source_idx = column(SOURCE_COLUMN)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row.map_err(|e| RagError::CorruptDocument(format!("unreadable CSV row: {e}")))?;

        let field = |idx: usize| row.get(idx).unwrap_or_default().to_string();
        records.push(Record {
            text: field(content_idx),
            metadata: RecordMetadata {
                title: field(title_idx),
                tags: Some(field(tags_idx)),
                source: Some(field(source_idx)),
                page: None,
            },
        });
    }

    Ok(records)
}

/// Load records from a PDF file, one record per page.
///
/// Text extraction is delegated to `pdf-extract`; a file that cannot be
/// parsed as PDF structure fails with [`RagError::CorruptDocument`].
#[inline]
pub fn load_pdf<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RagError::SourceNotFound(path.display().to_string()));
    }

    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| RagError::CorruptDocument(format!("{}: {e}", path.display())))?;

    let records: Vec<Record> = pages
        .into_iter()
        .enumerate()
        .map(|(page_idx, text)| Record {
            text,
            metadata: RecordMetadata {
                title: title.clone(),
                tags: None,
                source: None,
                page: Some(page_idx + 1),
            },
        })
        .collect();

    debug!("Loaded {} pages from {}", records.len(), path.display());
    Ok(records)
}
