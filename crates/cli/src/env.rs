use crate::error::CliError;
use std::{collections::HashMap, fs, path::Path};

/// Variables from the process environment, optionally overlaid by an env file.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Loads `KEY=VALUE` lines from `path`. Keys from the file win over the
    /// process environment.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {e}", path.display()))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), unquote(value.trim()));
        }

        Ok(())
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_env() {
        let mut env = EnvManager::default();
        let content = r#"
# Comment
OMEGA_PORT=9000
export OMEGA_LOG=debug
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("OMEGA_PORT"), Some("9000"));
        assert_eq!(env.get("OMEGA_LOG"), Some("debug"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = EnvManager::default();
        let content = r#"
OMEGA_DATABASE_URL="postgres://omega:secret@db/omega"
OMEGA_HOST='127.0.0.1'
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(
            env.get("OMEGA_DATABASE_URL"),
            Some("postgres://omega:secret@db/omega")
        );
        assert_eq!(env.get("OMEGA_HOST"), Some("127.0.0.1"));
    }

    #[test]
    fn test_file_overrides_process_values() {
        let mut env = EnvManager::from_vars([("OMEGA_PORT", "8000")]);
        env.parse_env_content("OMEGA_PORT=8100").unwrap();
        assert_eq!(env.get("OMEGA_PORT"), Some("8100"));
    }

    #[test]
    fn test_blank_values_read_as_unset() {
        let env = EnvManager::from_vars([("OMEGA_LOG", "  ")]);
        assert_eq!(env.get("OMEGA_LOG"), None);
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = EnvManager::default();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }
}
