//! Builds the timezone-aware index for a raw table.
//!
//! Source files label their timestamps in UTC. Each parsed value is read as UTC
//! first and only then converted to the civil zone, so offsets stay correct on
//! both sides of a daylight-saving change.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::{parse_measurement, Sample, Series};
use crate::{
    error::{DataLoadError, RowDiagnostics, RowParseError},
    reading::table::RawTable,
};

/// A column named in the header, or its zero-based position.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl ColumnRef {
    fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            ColumnRef::Name(name) => headers.iter().position(|h| h == name),
            ColumnRef::Index(i) => (*i < headers.len()).then_some(*i),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => write!(f, "{}", name),
            ColumnRef::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// Which fields jointly form the timestamp, and their strftime format.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampSpec {
    pub columns: Vec<ColumnRef>,
    pub format: String,
}

impl TimestampSpec {
    pub fn new(columns: Vec<ColumnRef>, format: impl Into<String>) -> Self {
        TimestampSpec {
            columns,
            format: format.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub timestamp: DateTime<Tz>,
    pub fields: Vec<String>,
}

/// Rows that parsed, each carrying its civil-zone timestamp.
#[derive(Debug, Clone)]
pub struct AlignedTable {
    pub headers: Vec<String>,
    pub rows: Vec<AlignedRow>,
    pub timezone: Tz,
    pub diagnostics: RowDiagnostics,
}

/// Reads `text` with `format` as a UTC instant, then converts it to `tz`.
/// A date-only format parses as midnight UTC.
pub fn parse_timestamp(text: &str, format: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(text, format)
        .or_else(|_| NaiveDate::parse_from_str(text, format).map(|d| d.and_time(NaiveTime::MIN)))
        .ok()?;

    Some(Utc.from_utc_datetime(&naive).with_timezone(tz))
}

/// Parses every row's timestamp. Rows that fail are skipped and counted; the
/// file fails only when a timestamp column is absent or no row survives.
pub fn parse(table: RawTable, spec: &TimestampSpec, tz: Tz) -> Result<AlignedTable, DataLoadError> {
    let expected: Vec<String> = spec.columns.iter().map(|c| c.to_string()).collect();

    let indices = spec
        .columns
        .iter()
        .map(|c| c.resolve(&table.headers))
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(|| DataLoadError::missing_columns(&expected, &table.headers))?;
    let needed = indices.iter().max().map_or(0, |i| i + 1);

    let mut diagnostics = table.diagnostics;
    let mut rows = Vec::with_capacity(table.rows.len());

    for (i, fields) in table.rows.into_iter().enumerate() {
        let row = i + 1;
        if fields.len() < needed {
            diagnostics.record(RowParseError::ShortRow {
                row,
                expected: needed,
                found: fields.len(),
            });
            continue;
        }

        let text = indices
            .iter()
            .map(|&i| fields[i].as_str())
            .collect::<Vec<_>>()
            .join(" ");

        match parse_timestamp(&text, &spec.format, &tz) {
            Some(timestamp) => rows.push(AlignedRow { timestamp, fields }),
            None => diagnostics.record(RowParseError::Timestamp {
                row,
                value: text,
                format: spec.format.clone(),
            }),
        }
    }

    if rows.is_empty() {
        return Err(DataLoadError::no_rows(&expected, &table.headers));
    }
    diagnostics.parsed = rows.len();

    Ok(AlignedTable {
        headers: table.headers,
        rows,
        timezone: tz,
        diagnostics,
    })
}

impl AlignedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Positions of `names`, or a [`DataLoadError`] listing what is missing.
    pub fn require_columns(&self, names: &[String]) -> Result<Vec<usize>, DataLoadError> {
        names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Option<Vec<usize>>>()
            .ok_or_else(|| DataLoadError::missing_columns(names, &self.headers))
    }

    /// Numeric series for `column`. Non-numeric fields become missing samples
    /// and are counted as skipped in the returned diagnostics; `parsed` stays 0
    /// so the result can be merged into the row-level counts.
    pub fn series(
        &self,
        column: &str,
        sentinels: &[f64],
    ) -> Result<(Series, RowDiagnostics), DataLoadError> {
        let index = self.require_columns(&[column.to_string()])?[0];
        let mut diagnostics = RowDiagnostics::default();

        let samples = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let raw = row.fields.get(index).map(String::as_str).unwrap_or("");
                let value = match parse_measurement(raw, sentinels) {
                    Ok(value) => value,
                    Err(_) => {
                        diagnostics.record(RowParseError::Number {
                            row: i + 1,
                            column: column.to_string(),
                            value: raw.to_string(),
                        });
                        None
                    }
                };
                Sample {
                    timestamp: row.timestamp,
                    value,
                }
            })
            .collect();

        Ok((Series::new(column, self.timezone, samples), diagnostics))
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::Offset;
    use chrono_tz::US::Pacific;

    use super::*;

    const AOD_FORMAT: &str = "%d:%m:%Y %H:%M:%S";

    fn aod_spec() -> TimestampSpec {
        TimestampSpec::new(vec![ColumnRef::Index(0), ColumnRef::Index(1)], AOD_FORMAT)
    }

    fn table(rows: &[&str]) -> RawTable {
        let mut text = String::from("Date(dd:mm:yyyy),Time(hh:mm:ss),AOD_500nm\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        RawTable::from_text(&text, 0).unwrap()
    }

    fn offset_hours(t: &DateTime<Tz>) -> i32 {
        t.offset().fix().local_minus_utc() / 3600
    }

    #[test]
    fn should_read_utc_then_convert() {
        let t = parse_timestamp("01:07:2024 12:00:00", AOD_FORMAT, &Pacific).unwrap();
        assert_eq!(t.to_rfc3339(), "2024-07-01T05:00:00-07:00");

        let t = parse_timestamp("2024-01-15", "%Y-%m-%d", &Pacific).unwrap();
        assert_eq!(t.to_rfc3339(), "2024-01-14T16:00:00-08:00");
    }

    #[test]
    fn should_shift_offset_across_spring_transition() {
        let t = table(&[
            "10:03:2024,09:00:00,0.1",
            "10:03:2024,10:00:00,0.2",
            "10:03:2024,11:00:00,0.3",
        ]);

        let aligned = parse(t, &aod_spec(), Pacific).unwrap();

        let stamps: Vec<String> = aligned.rows.iter().map(|r| r.timestamp.to_rfc3339()).collect();
        assert_eq!(
            stamps,
            vec![
                "2024-03-10T01:00:00-08:00",
                "2024-03-10T03:00:00-07:00",
                "2024-03-10T04:00:00-07:00",
            ]
        );
        assert_eq!(offset_hours(&aligned.rows[0].timestamp), -8);
        assert_eq!(offset_hours(&aligned.rows[1].timestamp), -7);
    }

    #[test]
    fn should_keep_repeated_civil_hour_distinct_in_autumn() {
        let t = table(&["03:11:2024,08:30:00,0.1", "03:11:2024,09:30:00,0.2"]);

        let aligned = parse(t, &aod_spec(), Pacific).unwrap();
        let (series, _) = aligned.series("AOD_500nm", &[-999.0]).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series.samples()[0].timestamp.to_rfc3339(),
            "2024-11-03T01:30:00-07:00"
        );
        assert_eq!(
            series.samples()[1].timestamp.to_rfc3339(),
            "2024-11-03T01:30:00-08:00"
        );
    }

    #[test]
    fn should_skip_bad_rows_and_count_them() {
        let t = table(&[
            "01:03:2024,10:00:00,0.1",
            "2024-03-01,10:00:00,0.2",
            "01:03:2024",
            "01:03:2024,12:00:00,0.3",
        ]);

        let aligned = parse(t, &aod_spec(), Pacific).unwrap();

        assert_eq!(aligned.rows.len(), 2);
        assert_eq!(aligned.diagnostics.parsed, 2);
        assert_eq!(aligned.diagnostics.skipped, 2);
        assert!(matches!(
            aligned.diagnostics.samples[0],
            RowParseError::Timestamp { row: 2, .. }
        ));
        assert!(matches!(
            aligned.diagnostics.samples[1],
            RowParseError::ShortRow { row: 3, .. }
        ));
    }

    #[test]
    fn should_fail_when_timestamp_column_missing() {
        let t = table(&["01:03:2024,10:00:00,0.1"]);
        let spec = TimestampSpec::new(vec![ColumnRef::Name("DATE".to_string())], "%Y");

        let err = parse(t, &spec, Pacific).unwrap_err();

        assert_eq!(err.expected_columns, vec!["DATE"]);
        assert_eq!(err.found_columns.len(), 3);
    }

    #[test]
    fn should_fail_when_no_rows_survive() {
        let t = table(&["garbage,row,1"]);

        let err = parse(t, &aod_spec(), Pacific).unwrap_err();

        assert_eq!(err.message, "zero rows parsed");
    }

    #[test]
    fn should_extract_series_with_sentinels_and_bad_numbers() {
        let t = table(&[
            "01:03:2024,10:00:00,0.1",
            "01:03:2024,11:00:00,-999.",
            "01:03:2024,12:00:00,bad",
        ]);
        let aligned = parse(t, &aod_spec(), Pacific).unwrap();

        let (series, diagnostics) = aligned.series("AOD_500nm", &[-999.0]).unwrap();

        let values: Vec<Option<f64>> = series.samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![Some(0.1), None, None]);
        assert_eq!(diagnostics.skipped, 1);
        assert!(aligned.series("AOD_440nm", &[]).is_err());
    }
}
