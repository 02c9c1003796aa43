/*
    Copyright 2023 github.com/programaquatic

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

use crate::error::{SimError, SimResult};

/** A validated rectangular emission weight matrix.

    Indexed as columns[column][depth]: the outer axis runs across the
    emitter (odd length so the fan is not skewed), the inner axis runs
    away from the emitter. Weights must sum to at most 1 so a pattern
    can never create contaminant.
**/
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionPattern {
    columns: Vec<Vec<f64>>,
}

impl EmissionPattern {
    pub fn new(columns: Vec<Vec<f64>>) -> SimResult<Self> {
        if columns.is_empty() || columns[0].is_empty() {
            return Err(SimError::IllegalPattern("pattern must not be empty".into()));
        }
        let depth = columns[0].len();
        if columns.iter().any(|c| c.len() != depth) {
            return Err(SimError::IllegalPattern("pattern rows differ in length".into()));
        }
        let total: f64 = columns.iter().flatten().sum();
        if total > 1.0 {
            return Err(SimError::IllegalPattern(format!("weights sum to {total}, must be <= 1")));
        }
        if columns.len() % 2 == 0 {
            return Err(SimError::IllegalPattern("pattern width must be odd".into()));
        }
        Ok(EmissionPattern { columns })
    }

    /// Number of columns across the emitter (odd).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of cells a column extends away from the emitter.
    pub fn depth(&self) -> usize {
        self.columns[0].len()
    }

    pub fn weight(&self, column: usize, depth: usize) -> f64 {
        self.columns[column][depth]
    }
}

/// Near-field aerosol dispersion of a cough.
pub fn aerosol_cough() -> EmissionPattern {
    EmissionPattern::new(vec![
        vec![0.0, 0.0, 0.000, 0.0,   0.00],
        vec![0.0, 0.0, 0.000, 0.125, 0.00],
        vec![0.0, 0.0, 0.125, 0.375, 0.25],
        vec![0.0, 0.0, 0.000, 0.125, 0.00],
        vec![0.0, 0.0, 0.000, 0.0,   0.00],
    ]).unwrap()
}

/// Ballistic droplet fan of a cough.
pub fn droplet_cough() -> EmissionPattern {
    EmissionPattern::new(vec![
        vec![0.0, 0.0, 0.0, 0.0,  0.00],
        vec![0.0, 0.0, 0.0, 0.0,  0.00],
        vec![0.0, 0.0, 0.0, 0.25, 0.75],
        vec![0.0, 0.0, 0.0, 0.0,  0.00],
        vec![0.0, 0.0, 0.0, 0.0,  0.00],
    ]).unwrap()
}

/// Wide dispersion used for the initial burst of a cough.
pub fn initial_cough() -> EmissionPattern {
    EmissionPattern::new(vec![
        vec![0.0, 0.0, 0.0, 0.0,    0.04],
        vec![0.0, 0.0, 0.0, 0.0666, 0.04],
        vec![0.2, 0.2, 0.2, 0.0667, 0.04],
        vec![0.0, 0.0, 0.0, 0.0666, 0.04],
        vec![0.0, 0.0, 0.0, 0.0,    0.04],
    ]).unwrap()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_builtin_patterns_validate() {
        assert_eq!(aerosol_cough().width(), 5);
        assert_eq!(aerosol_cough().depth(), 5);
        assert_eq!(droplet_cough().weight(2, 4), 0.75);
        assert_eq!(initial_cough().weight(2, 0), 0.2);
    }

    #[test]
    fn test_rejects_even_width() {
        let p = EmissionPattern::new(vec![vec![0.1], vec![0.1]]);
        assert!(matches!(p, Err(SimError::IllegalPattern(_))));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let p = EmissionPattern::new(vec![vec![0.1, 0.1], vec![0.1], vec![0.1, 0.1]]);
        assert!(matches!(p, Err(SimError::IllegalPattern(_))));
    }

    #[test]
    fn test_rejects_overweight() {
        let p = EmissionPattern::new(vec![vec![0.6], vec![0.3], vec![0.2]]);
        assert!(matches!(p, Err(SimError::IllegalPattern(_))));
    }
}
