//! Save resampled series and vectors to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{Float64Builder, StringBuilder, TimestampMillisecondBuilder},
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
};
use chrono_tz::Tz;
use parquet::{
    arrow::ArrowWriter,
    basic::{Compression, ZstdLevel},
    file::properties::WriterProperties,
};

use crate::{series::ResampledSeries, vector::VectorBucket};

fn timestamp_field(tz: Tz) -> Field {
    Field::new(
        "bucket_start",
        DataType::Timestamp(TimeUnit::Millisecond, Some(tz.name().into())),
        false,
    )
}

fn write_batch(path: &Path, schema: Arc<Schema>, batch: RecordBatch) -> Result<()> {
    let file = File::create(path)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .set_dictionary_enabled(true)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

/// Long format: one row per (series, bucket). Missing buckets are null values.
pub fn save_lines(lines: &[ResampledSeries], tz: Tz, path: &Path) -> Result<()> {
    let rows: usize = lines.iter().map(|l| l.buckets.len()).sum();

    let schema = Arc::new(Schema::new(vec![
        timestamp_field(tz),
        Field::new("series", DataType::Utf8, false),
        Field::new("value", DataType::Float64, true),
    ]));

    let mut start_builder =
        TimestampMillisecondBuilder::with_capacity(rows).with_timezone(tz.name());
    let mut series_builder = StringBuilder::with_capacity(rows, rows * 10);
    let mut value_builder = Float64Builder::with_capacity(rows);

    for line in lines {
        for bucket in &line.buckets {
            start_builder.append_value(bucket.start.timestamp_millis());
            series_builder.append_value(&line.name);
            value_builder.append_option(bucket.value);
        }
    }

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(start_builder.finish()),
            Arc::new(series_builder.finish()),
            Arc::new(value_builder.finish()),
        ],
    )?;

    write_batch(path, schema, batch)
}

pub fn save_vectors(vectors: &[VectorBucket], tz: Tz, path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        timestamp_field(tz),
        Field::new("x", DataType::Float64, true),
        Field::new("y", DataType::Float64, true),
    ]));

    let mut start_builder =
        TimestampMillisecondBuilder::with_capacity(vectors.len()).with_timezone(tz.name());
    let mut x_builder = Float64Builder::with_capacity(vectors.len());
    let mut y_builder = Float64Builder::with_capacity(vectors.len());

    for v in vectors {
        start_builder.append_value(v.start.timestamp_millis());
        x_builder.append_option(v.x);
        y_builder.append_option(v.y);
    }

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(start_builder.finish()),
            Arc::new(x_builder.finish()),
            Arc::new(y_builder.finish()),
        ],
    )?;

    write_batch(path, schema, batch)
}

// -- Tests -------------------------------------------------------------------
