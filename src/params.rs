//! Generic parameters functions
//!
//! Tuning values (gains, thresholds, kinematic limits) live in TOML files
//! loaded into serde structs at boot by the embedding software. Quantities
//! deserialise from plain numbers in SI base units.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot load the parameter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file into a deserialisable parameter struct.
pub fn load<P>(param_file_path: &Path) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    // Load the file into a string
    let params_str = match read_to_string(param_file_path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e)),
    };

    // Parse the string into the parameter struct
    match toml::from_str(params_str.as_str()) {
        Ok(p) => Ok(p),
        Err(e) => Err(LoadError::DeserialiseError(e)),
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::feedforward::FeedforwardGains;
    use crate::pid::PidConfig;
    use std::path::PathBuf;
    use uom::si::electric_potential::volt;

    fn params_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("params")
    }

    #[test]
    fn test_load_pid_config() {
        let config: PidConfig = load(&params_dir().join("linear_pid.toml")).unwrap();

        assert_eq!(config.gains.kp, 35.0);
        assert_eq!(config.gains.ki, 0.0);
        assert_eq!(config.gains.kd, 2.5);
        assert_eq!(config.max_voltage.get::<volt>(), 10.0);
    }

    #[test]
    fn test_missing_max_voltage_defaults_to_full_battery() {
        let config: PidConfig = load(&params_dir().join("angular_pid.toml")).unwrap();

        assert_eq!(config.gains.kp, 0.3);
        assert_eq!(config.max_voltage.get::<volt>(), 12.0);
    }

    #[test]
    fn test_load_feedforward_gains() {
        let gains: FeedforwardGains =
            load(&params_dir().join("drive_feedforward.toml")).unwrap();

        assert_eq!(gains.ks, 0.8);
        assert_eq!(gains.kv, 1.9);
        assert_eq!(gains.ka, 0.35);
    }

    #[test]
    fn test_missing_file_is_a_load_error() {
        let result: Result<PidConfig, _> = load(&params_dir().join("no_such_file.toml"));
        assert!(matches!(result, Err(LoadError::FileLoadError(_))));
    }

    #[test]
    fn test_malformed_file_is_a_deserialise_error() {
        // The feedforward file is not a valid PidConfig
        let result: Result<PidConfig, _> = load(&params_dir().join("drive_feedforward.toml"));
        assert!(matches!(result, Err(LoadError::DeserialiseError(_))));
    }
}
