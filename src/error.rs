use thiserror::Error;

/// Top-level error type for detector geometry and calibration.
#[derive(Debug, Error)]
pub enum DetGeomError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the detector element hierarchy.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("duplicate detector id: {0}")]
    DuplicateId(String),

    #[error("{child} does not belong to {parent}")]
    IdMismatch { child: String, parent: String },

    #[error("invalid detector id: {0}")]
    InvalidId(String),
}

/// Errors related to geometry-building operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to loading calibration functions.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("cannot read parameters: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unknown background function id {0}")]
    UnknownFunction(i32),

    #[error("function {function_id} needs {expected} parameters, {available} left")]
    ParameterCount {
        function_id: i32,
        expected: usize,
        available: usize,
    },

    #[error("{0} unused parameters after the last function")]
    TrailingParameters(usize),

    #[error("invalid mass window [{lower}, {upper}]")]
    InvalidWindow { lower: f64, upper: f64 },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`DetGeomError`].
pub type Result<T> = std::result::Result<T, DetGeomError>;
