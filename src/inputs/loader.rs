//! Load model inputs from JSON or two-column CSV files
//!
//! JSON files hold a (possibly partial) inputs object keyed by wire name.
//! CSV files hold `Parameter,Value` rows applied over the base preset.

use super::ModelInputs;
use crate::error::LoadError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Raw CSV row of a parameter file
#[derive(Debug, serde::Deserialize)]
struct ParameterRow {
    #[serde(rename = "Parameter")]
    parameter: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Load inputs from a `.json` or `.csv` file, chosen by extension
pub fn load_inputs<P: AsRef<Path>>(path: P) -> Result<ModelInputs, LoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let file = File::open(path)?;
    let inputs = match extension.as_str() {
        "json" => load_inputs_from_json_reader(BufReader::new(file))?,
        "csv" => load_inputs_from_csv_reader(file)?,
        _ => return Err(LoadError::UnsupportedFormat(extension)),
    };

    log::debug!("loaded inputs from {}", path.display());
    Ok(inputs)
}

/// Load inputs from any JSON reader. Missing keys take base preset values.
pub fn load_inputs_from_json_reader<R: Read>(reader: R) -> Result<ModelInputs, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load inputs from any `Parameter,Value` CSV reader
pub fn load_inputs_from_csv_reader<R: Read>(reader: R) -> Result<ModelInputs, LoadError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut inputs = ModelInputs::default();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: ParameterRow = result?;
        let value: f64 = row.value.parse().map_err(|_| LoadError::BadValue {
            row: idx + 1,
            parameter: row.parameter.clone(),
            value: row.value.clone(),
        })?;
        inputs.set_parameter(&row.parameter, value)?;
    }

    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use std::io::Write;

    #[test]
    fn test_load_csv_parameters() {
        let data = "Parameter,Value\n\
                    InitialUsers,2000\n\
                    ChurnRate, 4.5\n\
                    ProjectionMonths,24\n";
        let inputs = load_inputs_from_csv_reader(data.as_bytes()).unwrap();

        assert_eq!(inputs.initial_users, 2000);
        assert_eq!(inputs.churn_rate, 4.5);
        assert_eq!(inputs.projection_months, 24);
        // untouched fields keep base values
        assert_eq!(inputs.cac, 50.0);
    }

    #[test]
    fn test_csv_bad_value_reports_row() {
        let data = "Parameter,Value\nCAC,50\nARPU_API,lots\n";
        let err = load_inputs_from_csv_reader(data.as_bytes()).unwrap_err();
        match err {
            LoadError::BadValue { row, parameter, value } => {
                assert_eq!(row, 2);
                assert_eq!(parameter, "ARPU_API");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_csv_unknown_parameter() {
        let data = "Parameter,Value\nBurnMultiple,2\n";
        let err = load_inputs_from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Model(ModelError::Validation { .. })));
    }

    #[test]
    fn test_load_json_reader() {
        let data = r#"{"MonthlyGrowthRate": 12.0, "ProjectionMonths": 60}"#;
        let inputs = load_inputs_from_json_reader(data.as_bytes()).unwrap();
        assert_eq!(inputs.monthly_growth_rate, 12.0);
        assert_eq!(inputs.projection_months, 60);
    }

    #[test]
    fn test_load_inputs_by_extension() {
        let dir = std::env::temp_dir();
        let json_path = dir.join(format!("startup_projection_inputs_{}.json", std::process::id()));
        let mut file = File::create(&json_path).unwrap();
        write!(file, r#"{{"InitialUsers": 42}}"#).unwrap();
        drop(file);

        let inputs = load_inputs(&json_path).unwrap();
        assert_eq!(inputs.initial_users, 42);
        std::fs::remove_file(&json_path).unwrap();

        let yaml_path = dir.join(format!("startup_projection_inputs_{}.yaml", std::process::id()));
        File::create(&yaml_path).unwrap();
        assert!(matches!(load_inputs(&yaml_path), Err(LoadError::UnsupportedFormat(_))));
        std::fs::remove_file(&yaml_path).unwrap();
    }
}
