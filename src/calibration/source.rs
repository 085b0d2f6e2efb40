use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Where parameter files live and how identifiers map onto them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Directory holding the parameter files.
    pub data_dir: PathBuf,
    /// File extension appended to identifiers.
    pub extension: String,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("MuonAnalysis/MomentumScaleCalibration/data"),
            extension: "txt".into(),
        }
    }
}

impl CalibrationConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, CalibrationError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Path of the parameter file for `identifier`.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> PathBuf {
        self.data_dir.join(format!("{identifier}.{}", self.extension))
    }
}

/// Function ids and their parameters, flattened in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub function_ids: Vec<i32>,
    pub parameters: Vec<f64>,
}

impl ParameterSet {
    /// Parses the text parameter format.
    ///
    /// ```text
    /// # background for the Z window
    /// type 1
    /// par 2.0
    /// par -0.01
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Parse`] with the 1-based line number of
    /// the first malformed line.
    pub fn parse(text: &str) -> Result<Self, CalibrationError> {
        let mut set = Self::default();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let parse_error = |message: String| CalibrationError::Parse {
                line: index + 1,
                message,
            };
            let mut tokens = line.split_whitespace();
            let keyword = tokens.next().unwrap_or("");
            let value = tokens
                .next()
                .ok_or_else(|| parse_error(format!("missing value after '{keyword}'")))?;
            if let Some(extra) = tokens.next() {
                return Err(parse_error(format!("unexpected token '{extra}'")));
            }
            match keyword {
                "type" => set.function_ids.push(
                    value
                        .parse()
                        .map_err(|_| parse_error(format!("invalid function id '{value}'")))?,
                ),
                "par" => set.parameters.push(
                    value
                        .parse()
                        .map_err(|_| parse_error(format!("invalid parameter '{value}'")))?,
                ),
                other => return Err(parse_error(format!("unknown keyword '{other}'"))),
            }
        }
        Ok(set)
    }
}

/// Something that can produce parameter sets by identifier.
pub trait ParameterSource {
    /// Loads the parameters registered under `identifier`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be found or parsed.
    fn load(&self, identifier: &str) -> Result<ParameterSet, CalibrationError>;
}

/// Reads parameter files from the configured data directory.
#[derive(Debug, Clone, Default)]
pub struct FileParameterSource {
    config: CalibrationConfig,
}

impl FileParameterSource {
    #[must_use]
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }
}

impl ParameterSource for FileParameterSource {
    fn load(&self, identifier: &str) -> Result<ParameterSet, CalibrationError> {
        let path = self.config.resolve(identifier);
        let text = fs::read_to_string(&path)?;
        ParameterSet::parse(&text)
    }
}

/// Parameters as stored in the conditions database.
///
/// One object carries the parameters of every function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DbObject {
    pub identifiers: Vec<i32>,
    pub parameters: Vec<f64>,
}

impl DbObject {
    /// Decodes a database payload from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid JSON for this type.
    pub fn from_json(json: &str) -> Result<Self, CalibrationError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet {
            function_ids: self.identifiers.clone(),
            parameters: self.parameters.clone(),
        }
    }
}
