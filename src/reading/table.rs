//! Raw delimited tables: preamble skipping, delimiter detection, header + string rows.

use std::{fs, path::Path};

use crate::error::{DataLoadError, RowDiagnostics, RowParseError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delimiter {
    Comma,
    Whitespace,
}

impl Delimiter {
    /// Comma if the header line has one, runs of whitespace otherwise.
    pub fn detect(header_line: &str) -> Self {
        if header_line.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }
}

/// A header row plus data rows, every field kept as trimmed text.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub diagnostics: RowDiagnostics,
}

impl RawTable {
    pub fn from_path(path: &Path, skip_rows: usize) -> Result<Self, DataLoadError> {
        let bytes = fs::read(path).map_err(|e| {
            DataLoadError::unreadable(format!("cannot read `{}`: {}", path.display(), e))
        })?;
        let text = String::from_utf8_lossy(&bytes);

        Self::from_text(&text, skip_rows)
    }

    /// Skips `skip_rows` preamble lines; the next non-blank line is the header.
    pub fn from_text(text: &str, skip_rows: usize) -> Result<Self, DataLoadError> {
        let body = skip_lines(text.trim_start_matches('\u{feff}'), skip_rows);
        let header_line = body
            .lines()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| DataLoadError::unreadable("no header line after preamble"))?;

        match Delimiter::detect(header_line) {
            Delimiter::Comma => read_comma(body.trim_start()),
            Delimiter::Whitespace => Ok(read_whitespace(body)),
        }
    }

    #[cfg(test)]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn skip_lines(text: &str, count: usize) -> &str {
    let mut offset = 0;
    for (i, line) in text.split_inclusive('\n').enumerate() {
        if i == count {
            break;
        }
        offset += line.len();
    }

    &text[offset.min(text.len())..]
}

fn read_comma(body: &str) -> Result<RawTable, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataLoadError::unreadable(format!("reading header: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = RawTable {
        headers,
        ..Default::default()
    };

    for (i, record) in reader.records().enumerate() {
        match record {
            Ok(record) => table.rows.push(record.iter().map(|f| f.to_string()).collect()),
            Err(e) => table.diagnostics.record(RowParseError::Unreadable {
                row: i + 1,
                reason: e.to_string(),
            }),
        }
    }

    Ok(table)
}

fn read_whitespace(body: &str) -> RawTable {
    let mut lines = body.lines().filter(|l| !l.trim().is_empty());
    let headers = lines
        .next()
        .map(|l| l.split_whitespace().map(|h| h.to_string()).collect())
        .unwrap_or_default();
    let rows = lines
        .map(|l| l.split_whitespace().map(|f| f.to_string()).collect())
        .collect();

    RawTable {
        headers,
        rows,
        diagnostics: RowDiagnostics::default(),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn should_skip_preamble_and_read_comma_table() {
        let text = "line one\nline two\nA,B,C\n1, 2 ,3\n4,5,6\n";
        let table = RawTable::from_text(text, 2).unwrap();

        assert_eq!(table.headers, vec!["A", "B", "C"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "2", "3"]);
        assert_eq!(table.column_index("C"), Some(2));
        assert_eq!(table.column_index("D"), None);
    }

    #[test]
    fn should_read_whitespace_table() {
        let text = "preamble\n\
            Date   Time    AOD_500nm\n\
            01:03:2024 10:00:00   0.12\n\
            \n\
            02:03:2024 11:00:00 -999.\n";
        let table = RawTable::from_text(text, 1).unwrap();

        assert_eq!(table.headers, vec!["Date", "Time", "AOD_500nm"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][2], "-999.");
    }

    #[test]
    fn should_keep_short_rows_for_later_checks() {
        let text = "A,B\n1,2\n3\n";
        let table = RawTable::from_text(text, 0).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["3"]);
    }

    #[test]
    fn should_fail_without_header() {
        let err = RawTable::from_text("only\npreamble\n", 2).unwrap_err();
        assert!(err.message.contains("no header"));
    }

    #[test]
    fn should_read_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "DATE,WND").unwrap();
        writeln!(file, "2024-01-01T00:00:00,\"090,1,N,0050,5\"").unwrap();

        let table = RawTable::from_path(file.path(), 0).unwrap();

        assert_eq!(table.headers, vec!["DATE", "WND"]);
        assert_eq!(table.rows[0][1], "090,1,N,0050,5");
    }

    #[test]
    fn should_report_missing_file() {
        let err = RawTable::from_path(Path::new("/definitely/not/here.csv"), 0).unwrap_err();
        assert!(err.message.contains("cannot read"));
    }
}
