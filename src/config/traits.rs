use crate::error::EvolverError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), EvolverError>;
}

pub(crate) fn invalid(section: &str, message: impl AsRef<str>) -> EvolverError {
    EvolverError::Configuration(format!("[{}] {}", section, message.as_ref()))
}

pub(crate) fn check_probability(section: &str, name: &str, value: f64) -> Result<(), EvolverError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(section, format!("{} must be between 0 and 1, got {}", name, value)));
    }
    Ok(())
}
