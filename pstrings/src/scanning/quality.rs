//! Run acceptance by length and alphanumeric density

use super::charset::ByteClass;
use crate::config::SelectionCriteria;

/// Accepts or rejects runs according to the selection criteria
#[derive(Debug, Clone, Copy)]
pub struct QualityFilter<'a> {
    min_length: usize,
    density: Option<f64>,
    charset: &'a ByteClass,
}

impl<'a> QualityFilter<'a> {
    #[must_use]
    pub fn new(criteria: &'a SelectionCriteria) -> Self {
        Self {
            min_length: criteria.min_length(),
            density: criteria.density(),
            charset: criteria.charset(),
        }
    }

    /// True if the run is long enough and, when a density is configured,
    /// alphanumeric enough.
    #[must_use]
    pub fn accept(&self, run: &[u8]) -> bool {
        // min_length >= 1, so a passing run is never empty
        if run.len() < self.min_length {
            return false;
        }

        match self.density {
            Some(threshold) => alnum_percent(run, self.charset) >= threshold,
            None => true,
        }
    }
}

/// Share of alphanumeric bytes in `run`, in percent. `run` must not be empty.
#[allow(clippy::cast_precision_loss)]
fn alnum_percent(run: &[u8], charset: &ByteClass) -> f64 {
    let alnum = run.iter().filter(|&&b| charset.is_alphanumeric(b)).count();
    alnum as f64 * 100.0 / run.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(min_length: usize, density: Option<f64>) -> SelectionCriteria {
        SelectionCriteria::builder()
            .min_length(min_length)
            .density(density)
            .build()
            .expect("valid criteria")
    }

    #[test]
    fn test_min_length_boundary() {
        let criteria = criteria(4, None);
        let filter = QualityFilter::new(&criteria);
        assert!(!filter.accept(b"abc"));
        assert!(filter.accept(b"abcd"));
        assert!(filter.accept(b"abcde"));
        assert!(!filter.accept(b""));
    }

    #[test]
    fn test_density_threshold() {
        let criteria = criteria(1, Some(50.0));
        let filter = QualityFilter::new(&criteria);
        // 2 of 4 alphanumeric: exactly 50%
        assert!(filter.accept(b"a-b-"));
        // 1 of 4: 25%
        assert!(!filter.accept(b"a---"));
        assert!(filter.accept(b"abcd"));
        assert!(!filter.accept(b"...."));
    }

    #[test]
    fn test_density_checked_only_after_length() {
        let criteria = criteria(6, Some(10.0));
        let filter = QualityFilter::new(&criteria);
        assert!(!filter.accept(b"abcde"));
        assert!(filter.accept(b"a.....")); // 16.7%
    }

    #[test]
    fn test_zero_density_accepts_punctuation() {
        let criteria = criteria(2, Some(0.0));
        let filter = QualityFilter::new(&criteria);
        assert!(filter.accept(b"!?"));
    }
}
