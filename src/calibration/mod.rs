//! Background functions for the muon momentum-scale fit.
//!
//! Parameters come either from a text file resolved through a
//! [`ParameterSource`] or from a conditions-database object.

mod shape;
mod source;

pub use shape::{BackgroundShape, MassWindow};
pub use source::{CalibrationConfig, DbObject, FileParameterSource, ParameterSet, ParameterSource};

use tracing::debug;

use crate::error::CalibrationError;

const LOG_TARGET: &str = "MuScleFit";

/// One background shape with its own parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundComponent {
    id: i32,
    shape: BackgroundShape,
    parameters: Vec<f64>,
}

impl BackgroundComponent {
    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[must_use]
    pub fn shape(&self) -> BackgroundShape {
        self.shape
    }

    #[must_use]
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }
}

/// The set of background functions described by one parameter payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundFunction {
    window: MassWindow,
    components: Vec<BackgroundComponent>,
}

impl BackgroundFunction {
    /// Loads the parameters registered under `identifier` from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, a function id is unknown, or the
    /// parameter count does not match the declared functions.
    pub fn from_source<S: ParameterSource + ?Sized>(
        source: &S,
        identifier: &str,
        window: MassWindow,
    ) -> Result<Self, CalibrationError> {
        let set = source.load(identifier)?;
        Self::from_parameter_set(&set, window)
    }

    /// Builds the functions from a database object.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::from_parameter_set`].
    pub fn from_db(db: &DbObject, window: MassWindow) -> Result<Self, CalibrationError> {
        Self::from_parameter_set(&db.parameter_set(), window)
    }

    /// Splits the flat parameter list among the declared functions, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a function id is unknown, parameters run out, or
    /// parameters are left over.
    pub fn from_parameter_set(
        set: &ParameterSet,
        window: MassWindow,
    ) -> Result<Self, CalibrationError> {
        let mut remaining = set.parameters.as_slice();
        let mut components = Vec::with_capacity(set.function_ids.len());
        for &id in &set.function_ids {
            let shape = BackgroundShape::from_id(id)?;
            let count = shape.parameter_count();
            if remaining.len() < count {
                return Err(CalibrationError::ParameterCount {
                    function_id: id,
                    expected: count,
                    available: remaining.len(),
                });
            }
            let (own, rest) = remaining.split_at(count);
            remaining = rest;
            debug!(target: LOG_TARGET, id, ?shape, parameters = ?own, "background function");
            components.push(BackgroundComponent {
                id,
                shape,
                parameters: own.to_vec(),
            });
        }
        if !remaining.is_empty() {
            return Err(CalibrationError::TrailingParameters(remaining.len()));
        }
        Ok(Self { window, components })
    }

    #[must_use]
    pub fn window(&self) -> &MassWindow {
        &self.window
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub fn function_ids(&self) -> Vec<i32> {
        self.components.iter().map(BackgroundComponent::id).collect()
    }

    #[must_use]
    pub fn component(&self, index: usize) -> Option<&BackgroundComponent> {
        self.components.get(index)
    }

    /// Normalised density of function `index` at `mass`, or `None` if there
    /// is no such function.
    #[must_use]
    pub fn evaluate(&self, index: usize, mass: f64) -> Option<f64> {
        self.components
            .get(index)
            .map(|c| c.shape.density(&c.parameters, &self.window, mass))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use approx::assert_relative_eq;

    use super::*;

    struct MemorySource(HashMap<String, String>);

    impl ParameterSource for MemorySource {
        fn load(&self, identifier: &str) -> Result<ParameterSet, CalibrationError> {
            let text = self.0.get(identifier).ok_or_else(|| {
                CalibrationError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    identifier.to_owned(),
                ))
            })?;
            ParameterSet::parse(text)
        }
    }

    fn window() -> MassWindow {
        MassWindow::new(70.0, 110.0).unwrap()
    }

    #[test]
    fn splits_parameters_in_order() {
        let set = ParameterSet {
            function_ids: vec![1, 2, 3],
            parameters: vec![2.0, -0.01, 0.05, 2.5],
        };
        let f = BackgroundFunction::from_parameter_set(&set, window()).unwrap();
        assert_eq!(f.len(), 3);
        assert_eq!(f.function_ids(), vec![1, 2, 3]);
        assert_eq!(f.component(0).unwrap().parameters(), &[2.0, -0.01]);
        assert_eq!(f.component(1).unwrap().shape(), BackgroundShape::Exponential);
        assert_eq!(f.component(2).unwrap().parameters(), &[2.5]);
    }

    #[test]
    fn parameter_count_mismatch() {
        let short = ParameterSet {
            function_ids: vec![1],
            parameters: vec![2.0],
        };
        assert!(matches!(
            BackgroundFunction::from_parameter_set(&short, window()),
            Err(CalibrationError::ParameterCount {
                function_id: 1,
                expected: 2,
                available: 1
            })
        ));
        let long = ParameterSet {
            function_ids: vec![2],
            parameters: vec![0.1, 0.2],
        };
        assert!(matches!(
            BackgroundFunction::from_parameter_set(&long, window()),
            Err(CalibrationError::TrailingParameters(1))
        ));
    }

    #[test]
    fn loads_through_source() {
        let source = MemorySource(HashMap::from([(
            "Background_Z".to_owned(),
            "type 2\npar 0.0\n".to_owned(),
        )]));
        let f = BackgroundFunction::from_source(&source, "Background_Z", window()).unwrap();
        // A flat exponential is uniform over the window.
        assert_relative_eq!(f.evaluate(0, 90.0).unwrap(), 1.0 / 40.0, epsilon = 1e-12);
        assert_eq!(f.evaluate(0, 120.0), Some(0.0));
        assert_eq!(f.evaluate(1, 90.0), None);
        assert!(BackgroundFunction::from_source(&source, "other", window()).is_err());
    }

    #[test]
    fn db_and_file_payloads_agree() {
        let db = DbObject {
            identifiers: vec![1, 3],
            parameters: vec![1.0, 0.0, 2.0],
        };
        let from_db = BackgroundFunction::from_db(&db, window()).unwrap();
        let from_text = BackgroundFunction::from_parameter_set(
            &ParameterSet::parse("type 1\npar 1.0\npar 0.0\ntype 3\npar 2.0\n").unwrap(),
            window(),
        )
        .unwrap();
        assert_eq!(from_db, from_text);
        assert!(!from_db.is_empty());
    }

    #[test]
    fn unknown_function_id() {
        let db = DbObject {
            identifiers: vec![9],
            parameters: vec![],
        };
        assert!(matches!(
            BackgroundFunction::from_db(&db, window()),
            Err(CalibrationError::UnknownFunction(9))
        ));
    }
}
