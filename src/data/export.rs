use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};

use crate::spectral::Analysis;

// ---------------------------------------------------------------------------
// Row layout shared by every format
// ---------------------------------------------------------------------------

/// One exported position of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsorbanceRecord {
    pub wavelength_nm: f64,
    pub absorbance: f64,
    pub reference_intensity: f64,
    pub sample_intensity: f64,
}

/// Flatten an analysis into rows, one per absorbance point.
pub fn records(analysis: &Analysis) -> Vec<AbsorbanceRecord> {
    analysis
        .absorbance
        .wavelengths
        .iter()
        .zip(&analysis.absorbance.values)
        .zip(analysis.reference.values.iter().zip(&analysis.sample.values))
        .map(|((&wavelength_nm, &absorbance), (&reference_intensity, &sample_intensity))| {
            AbsorbanceRecord {
                wavelength_nm,
                absorbance,
                reference_intensity,
                sample_intensity,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write an analysis to a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row + one row per wavelength
/// * `.json`    – `[{ "wavelength_nm": 400.0, "absorbance": 0.1, ... }, ...]`
/// * `.parquet` – flat Float64 columns with the same names
pub fn export_file(path: &Path, analysis: &Analysis) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = records(analysis);
    match ext.as_str() {
        "csv" => export_csv(path, &rows),
        "json" => export_json(path, &rows),
        "parquet" | "pq" => export_parquet(path, &rows),
        other => bail!("Unsupported export extension: .{other}"),
    }?;

    log::info!("Exported {} points to {}", rows.len(), path.display());
    Ok(())
}

fn export_csv(path: &Path, rows: &[AbsorbanceRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn export_json(path: &Path, rows: &[AbsorbanceRecord]) -> Result<()> {
    let text = serde_json::to_string_pretty(rows).context("serializing JSON")?;
    std::fs::write(path, text).context("writing JSON file")?;
    Ok(())
}

fn export_parquet(path: &Path, rows: &[AbsorbanceRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("wavelength_nm", DataType::Float64, false),
        Field::new("absorbance", DataType::Float64, false),
        Field::new("reference_intensity", DataType::Float64, false),
        Field::new("sample_intensity", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            float_column(rows, |r| r.wavelength_nm),
            float_column(rows, |r| r.absorbance),
            float_column(rows, |r| r.reference_intensity),
            float_column(rows, |r| r.sample_intensity),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet file")?;
    Ok(())
}

fn float_column(rows: &[AbsorbanceRecord], f: impl Fn(&AbsorbanceRecord) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(rows.iter().map(f)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::SpectralSeries;
    use arrow::array::AsArray;
    use arrow::datatypes::Float64Type;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    fn sample_analysis() -> Analysis {
        let wavelengths = vec![400.0, 550.0, 700.0];
        Analysis {
            reference: SpectralSeries {
                wavelengths: wavelengths.clone(),
                values: vec![100.0, 80.0, 0.0],
            },
            sample: SpectralSeries {
                wavelengths: vec![700.0, 550.0, 400.0],
                values: vec![10.0, 80.0, 5.0],
            },
            absorbance: SpectralSeries {
                wavelengths,
                values: vec![1.0, 0.0, 0.0],
            },
        }
    }

    #[test]
    fn test_records_follow_absorbance_axis() {
        let rows = records(&sample_analysis());
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            AbsorbanceRecord {
                wavelength_nm: 400.0,
                absorbance: 1.0,
                reference_intensity: 100.0,
                sample_intensity: 10.0,
            }
        );
        assert_eq!(rows[2].reference_intensity, 0.0);
    }

    #[test]
    fn test_export_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        export_file(&path, &sample_analysis()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            ["wavelength_nm", "absorbance", "reference_intensity", "sample_intensity"]
        );
        let rows: Vec<AbsorbanceRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, records(&sample_analysis()));
    }

    #[test]
    fn test_export_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.JSON");
        export_file(&path, &sample_analysis()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<AbsorbanceRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows, records(&sample_analysis()));
    }

    #[test]
    fn test_export_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.parquet");
        export_file(&path, &sample_analysis()).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 3);

        let batch = &batches[0];
        let idx = batch.schema().index_of("absorbance").unwrap();
        let absorbance = batch.column(idx).as_primitive::<Float64Type>();
        assert_eq!(absorbance.values().to_vec(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let err = export_file(&dir.path().join("out.xlsx"), &sample_analysis()).unwrap_err();
        assert!(format!("{err:#}").contains(".xlsx"));
    }
}
