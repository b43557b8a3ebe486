//! Scan configuration
//!
//! Built once (normally from [`crate::cli::Args`]) and passed by reference
//! into the pipeline.

use glob_match::glob_match;

use crate::domain::ConfigError;
use crate::scanning::ByteClass;

/// Largest amount of memory read in one transfer, and the upper bound for
/// the minimum string length.
pub const TRANSFER_SIZE: usize = 1 << 20;

pub const DEFAULT_MIN_LENGTH: usize = 4;

/// Glob over the permission token of a mapping (`rw-p`, `r-xp`, ...)
///
/// The default selects private or shared mappings that are readable and
/// writable but not executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPattern(String);

impl PermissionPattern {
    pub const DEFAULT: &'static str = "rw[^x]?";

    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Pattern for the region selection flags.
    ///
    /// `read_only` relaxes the write bit, `executable` drops the
    /// no-execute requirement and `all` matches everything.
    ///
    /// # Errors
    /// [`ConfigError::ConflictingRegionFlags`] if `all` is combined with
    /// either of the other flags.
    pub fn from_flags(read_only: bool, executable: bool, all: bool) -> Result<Self, ConfigError> {
        let pattern = match (read_only, executable, all) {
            (false, false, true) => "*",
            (_, _, true) => return Err(ConfigError::ConflictingRegionFlags),
            (false, false, false) => Self::DEFAULT,
            (true, false, false) => "r?[^x]?",
            (false, true, false) => "rw*",
            (true, true, false) => "r?*",
        };
        Ok(Self::new(pattern))
    }

    #[must_use]
    pub fn matches(&self, perms: &str) -> bool {
        glob_match(&self.0, perms)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PermissionPattern {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

/// Which runs are selected and from which regions
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    min_length: usize,
    permissions: PermissionPattern,
    density: Option<f64>,
    charset: ByteClass,
}

impl SelectionCriteria {
    #[must_use]
    pub fn builder() -> SelectionCriteriaBuilder {
        SelectionCriteriaBuilder::default()
    }

    #[must_use]
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    #[must_use]
    pub fn permissions(&self) -> &PermissionPattern {
        &self.permissions
    }

    /// Minimum alphanumeric percentage, if filtering by density.
    #[must_use]
    pub fn density(&self) -> Option<f64> {
        self.density
    }

    #[must_use]
    pub fn charset(&self) -> &ByteClass {
        &self.charset
    }
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            permissions: PermissionPattern::default(),
            density: None,
            charset: ByteClass::ascii(),
        }
    }
}

/// Validating builder for [`SelectionCriteria`]
#[derive(Debug, Default)]
pub struct SelectionCriteriaBuilder {
    min_length: Option<usize>,
    permissions: Option<PermissionPattern>,
    density: Option<f64>,
    charset: Option<ByteClass>,
}

impl SelectionCriteriaBuilder {
    #[must_use]
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: PermissionPattern) -> Self {
        self.permissions = Some(permissions);
        self
    }

    #[must_use]
    pub fn density(mut self, density: Option<f64>) -> Self {
        self.density = density;
        self
    }

    #[must_use]
    pub fn charset(mut self, charset: ByteClass) -> Self {
        self.charset = Some(charset);
        self
    }

    /// # Errors
    /// Returns a [`ConfigError`] for a minimum length outside
    /// `1..=TRANSFER_SIZE` or a density outside `0..=100`.
    pub fn build(self) -> Result<SelectionCriteria, ConfigError> {
        let min_length = self.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
        if !(1..=TRANSFER_SIZE).contains(&min_length) {
            return Err(ConfigError::InvalidMinLength { value: min_length, max: TRANSFER_SIZE });
        }

        if let Some(density) = self.density {
            if !density.is_finite() || !(0.0..=100.0).contains(&density) {
                return Err(ConfigError::InvalidDensity(density.to_string()));
            }
        }

        Ok(SelectionCriteria {
            min_length,
            permissions: self.permissions.unwrap_or_default(),
            density: self.density,
            charset: self.charset.unwrap_or_default(),
        })
    }
}

/// Prefixes written in front of every emitted string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Annotations {
    pub pid: bool,
    pub label: bool,
    pub address: bool,
}

impl Annotations {
    #[must_use]
    pub fn any(&self) -> bool {
        self.pid || self.label || self.address
    }
}
