//! Save resampled series and vectors as CSV with RFC 3339 timestamps.
//!
//! Missing values are written as empty cells.

use std::{io::Write, path::Path};

use anyhow::Result;

use crate::{series::ResampledSeries, vector::VectorBucket};

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn write_lines<W: Write>(lines: &[ResampledSeries], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["bucket_start", "series", "value"])?;

    for line in lines {
        for bucket in &line.buckets {
            writer.write_record([
                bucket.start.to_rfc3339(),
                line.name.clone(),
                cell(bucket.value),
            ])?;
        }
    }
    writer.flush()?;

    Ok(())
}

pub fn write_vectors<W: Write>(vectors: &[VectorBucket], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["bucket_start", "x", "y"])?;

    for v in vectors {
        writer.write_record([v.start.to_rfc3339(), cell(v.x), cell(v.y)])?;
    }
    writer.flush()?;

    Ok(())
}

pub fn save_lines(lines: &[ResampledSeries], path: &Path) -> Result<()> {
    write_lines(lines, std::fs::File::create(path)?)
}

pub fn save_vectors(vectors: &[VectorBucket], path: &Path) -> Result<()> {
    write_vectors(vectors, std::fs::File::create(path)?)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use chrono_tz::US::Pacific;

    use super::*;
    use crate::series::Bucket;

    #[test]
    fn should_write_missing_as_empty_cell() {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 2, 8, 0, 0)
            .unwrap()
            .with_timezone(&Pacific);
        let lines = vec![ResampledSeries {
            name: "AOD_500nm".to_string(),
            buckets: vec![
                Bucket {
                    start,
                    value: Some(0.25),
                },
                Bucket {
                    start: start + chrono::Duration::hours(1),
                    value: None,
                },
            ],
        }];
        let mut out = Vec::new();

        write_lines(&lines, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "bucket_start,series,value\n\
             2024-01-02T00:00:00-08:00,AOD_500nm,0.25\n\
             2024-01-02T01:00:00-08:00,AOD_500nm,\n"
        );
    }

    #[test]
    fn should_write_vectors() {
        let start = Utc
            .with_ymd_and_hms(2024, 7, 2, 8, 0, 0)
            .unwrap()
            .with_timezone(&Pacific);
        let vectors = vec![VectorBucket {
            start,
            x: Some(-3.5),
            y: None,
        }];
        let mut out = Vec::new();

        write_vectors(&vectors, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "bucket_start,x,y\n2024-07-02T01:00:00-07:00,-3.5,\n");
    }
}
