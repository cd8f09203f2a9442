//! Jamon Configuration

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Class name used by `show`, `hide` and `toggle` unless configured
pub const DEFAULT_HIDDEN_CLASS_NAME: &str = "hidden";

/// Jamon configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Class that marks an element as hidden
    pub hidden_class_name: String,
}

impl Config {
    /// Configuration with a custom hidden class name
    pub fn with_hidden_class_name(name: &str) -> Result<Self> {
        let config = Self {
            hidden_class_name: name.to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the hidden class name is a single class token
    pub fn validate(&self) -> Result<()> {
        validate_class_name(&self.hidden_class_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hidden_class_name: DEFAULT_HIDDEN_CLASS_NAME.to_string(),
        }
    }
}

pub(crate) fn validate_class_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Argument("hidden class name"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(Error::TypeMismatch(format!(
            "hidden class name '{name}' must be a single class token"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hidden_class() {
        assert_eq!(Config::default().hidden_class_name, "hidden");
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_custom_hidden_class() {
        let config = Config::with_hidden_class_name("is-hidden").unwrap();
        assert_eq!(config.hidden_class_name, "is-hidden");

        assert_eq!(Config::with_hidden_class_name(""), Err(Error::Argument("hidden class name")));
        assert!(matches!(
            Config::with_hidden_class_name("a b"),
            Err(Error::TypeMismatch(_))
        ));
    }
}
