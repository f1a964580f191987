//! Tesseract-style engine configuration strings.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ScribeError, ScribeResult};

/// Engine configuration used when none is given.
pub const DEFAULT_ENGINE_CONFIG: &str = "--oem 3 --psm 6";

/// Parsed engine configuration.
///
/// Understands `--oem N`, `--psm N`, `--dpi N` (also as `--flag=N`) and
/// repeatable `-c key=value` variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// OCR engine mode (0-3).
    pub oem: Option<i32>,
    /// Page segmentation mode (0-13).
    pub psm: Option<i32>,
    /// Input resolution hint.
    pub dpi: Option<i32>,
    /// Extra `-c` variables.
    pub variables: BTreeMap<String, String>,
    raw: String,
}

impl EngineConfig {
    /// Parse a configuration string.
    pub fn parse(config: &str) -> ScribeResult<Self> {
        let invalid = |message: String| ScribeError::InvalidEngineConfig {
            config: config.to_string(),
            message,
        };

        let mut parsed = EngineConfig {
            raw: config.trim().to_string(),
            ..Default::default()
        };
        let mut tokens = config.split_whitespace();

        while let Some(token) = tokens.next() {
            if token == "-c" {
                let assignment = tokens
                    .next()
                    .ok_or_else(|| invalid("-c requires a key=value argument".to_string()))?;
                let (key, value) = assignment
                    .split_once('=')
                    .filter(|(key, _)| !key.is_empty())
                    .ok_or_else(|| invalid(format!("expected key=value after -c, got '{}'", assignment)))?;
                parsed.variables.insert(key.to_string(), value.to_string());
                continue;
            }

            let (flag, inline) = match token.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (token, None),
            };
            let (range, slot) = match flag {
                "--oem" => (0..=3, &mut parsed.oem),
                "--psm" => (0..=13, &mut parsed.psm),
                "--dpi" => (1..=i32::MAX, &mut parsed.dpi),
                _ => return Err(invalid(format!("unrecognized option '{}'", token))),
            };
            let value = match inline {
                Some(value) => value,
                None => tokens
                    .next()
                    .ok_or_else(|| invalid(format!("{} requires a value", flag)))?,
            };
            let number: i32 = value
                .parse()
                .map_err(|_| invalid(format!("{} expects an integer, got '{}'", flag, value)))?;
            if !range.contains(&number) {
                return Err(invalid(format!(
                    "{} must be between {} and {}, got {}",
                    flag,
                    range.start(),
                    range.end(),
                    number
                )));
            }
            *slot = Some(number);
        }

        Ok(parsed)
    }

    /// The configuration string as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl FromStr for EngineConfig {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default() {
        let config = EngineConfig::parse(DEFAULT_ENGINE_CONFIG).unwrap();
        assert_eq!(config.oem, Some(3));
        assert_eq!(config.psm, Some(6));
        assert_eq!(config.dpi, None);
        assert!(config.variables.is_empty());
        assert_eq!(config.raw(), "--oem 3 --psm 6");
    }

    #[test]
    fn test_parse_inline_values_and_variables() {
        let config =
            EngineConfig::parse("--psm=11 --dpi 300 -c tessedit_char_whitelist=0123456789")
                .unwrap();
        assert_eq!(config.psm, Some(11));
        assert_eq!(config.dpi, Some(300));
        assert_eq!(
            config.variables.get("tessedit_char_whitelist").map(String::as_str),
            Some("0123456789")
        );
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = EngineConfig::parse("   ").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_rejects_unknown_and_out_of_range() {
        assert!(matches!(
            EngineConfig::parse("--bogus 1"),
            Err(ScribeError::InvalidEngineConfig { .. })
        ));
        assert!(EngineConfig::parse("--psm 14").is_err());
        assert!(EngineConfig::parse("--oem").is_err());
        assert!(EngineConfig::parse("--oem three").is_err());
        assert!(EngineConfig::parse("-c novalue").is_err());
    }
}
