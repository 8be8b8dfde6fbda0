use std::path::PathBuf;

use crate::error::BatchError;

pub const DEFAULT_INPUT_PATH: &str = "Sample - Superstore.csv";
pub const DEFAULT_TABLE_NAME: &str = "people";
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Settings of the import job.
///
/// | Variable | Default |
/// |---|---|
/// | `DATABASE_URL` | required, `sqlite:...` or `postgres://...` |
/// | `INPUT_PATH` | `Sample - Superstore.csv` |
/// | `TABLE_NAME` | `people` |
/// | `CHUNK_SIZE` | `100` |
/// | `HAS_HEADERS` | `true` |
/// | `DELIMITER` | `,` |
/// | `INIT_SCHEMA` | `false`, creates the table when missing |
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    pub database_url: String,
    pub input_path: PathBuf,
    pub table_name: String,
    pub chunk_size: usize,
    pub has_headers: bool,
    pub delimiter: u8,
    pub init_schema: bool,
}

impl ImportConfig {
    /// Reads the settings from the process environment and a `.env` file.
    pub fn from_env() -> Result<Self, BatchError> {
        Self::from_vars(|key| dotenvy::var(key).ok())
    }

    /// Reads the settings through `lookup`, which returns `None` for unset keys.
    pub fn from_vars<F>(lookup: F) -> Result<Self, BatchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            BatchError::Configuration("Environment variable DATABASE_URL is required.".to_string())
        })?;

        let chunk_size = match lookup("CHUNK_SIZE") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| invalid("CHUNK_SIZE", &value, "a positive integer"))?,
            None => DEFAULT_CHUNK_SIZE,
        };

        let delimiter = match lookup("DELIMITER") {
            Some(value) => match value.as_bytes() {
                [byte] => *byte,
                _ => return Err(invalid("DELIMITER", &value, "a single ASCII character")),
            },
            None => b',',
        };

        let table_name = lookup("TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        if !is_table_name(&table_name) {
            return Err(invalid(
                "TABLE_NAME",
                &table_name,
                "a table name, optionally schema-qualified",
            ));
        }

        Ok(Self {
            database_url,
            input_path: lookup("INPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            table_name,
            chunk_size,
            has_headers: flag(&lookup, "HAS_HEADERS", true)?,
            delimiter,
            init_schema: flag(&lookup, "INIT_SCHEMA", false)?,
        })
    }
}

/// `people` or `tableau.people`: the name is pasted into SQL, so only plain
/// identifiers are accepted.
fn is_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();

    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, BatchError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(invalid(key, &value, "true or false")),
        },
        None => Ok(default),
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> BatchError {
    BatchError::Configuration(format!(
        "Environment variable {} must be {}, got {:?}",
        key, expected, value
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ImportConfig, BatchError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ImportConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = config(&[("DATABASE_URL", "sqlite::memory:")]).unwrap();

        assert_eq!(
            config,
            ImportConfig {
                database_url: "sqlite::memory:".to_string(),
                input_path: PathBuf::from("Sample - Superstore.csv"),
                table_name: "people".to_string(),
                chunk_size: 100,
                has_headers: true,
                delimiter: b',',
                init_schema: false,
            }
        );
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("DATABASE_URL", "postgres://batch@localhost/tableau"),
            ("INPUT_PATH", "/data/superstore.tsv"),
            ("TABLE_NAME", "tableau.people"),
            ("CHUNK_SIZE", "250"),
            ("HAS_HEADERS", "false"),
            ("DELIMITER", ";"),
            ("INIT_SCHEMA", "yes"),
        ])
        .unwrap();

        assert_eq!(config.input_path, PathBuf::from("/data/superstore.tsv"));
        assert_eq!(config.table_name, "tableau.people");
        assert_eq!(config.chunk_size, 250);
        assert!(!config.has_headers);
        assert_eq!(config.delimiter, b';');
        assert!(config.init_schema);
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(config(&[]), Err(BatchError::Configuration(_))));
    }

    #[test]
    fn rejects_invalid_values() {
        for (key, value) in [
            ("CHUNK_SIZE", "0"),
            ("CHUNK_SIZE", "ten"),
            ("DELIMITER", ";;"),
            ("HAS_HEADERS", "maybe"),
            ("TABLE_NAME", ""),
            ("TABLE_NAME", "people; DROP TABLE people"),
            ("TABLE_NAME", "tableau.people.archive"),
            ("TABLE_NAME", "1people"),
            ("TABLE_NAME", "\"people\""),
            ("TABLE_NAME", "tableau."),
        ] {
            let result = config(&[("DATABASE_URL", "sqlite::memory:"), (key, value)]);
            assert!(
                matches!(result, Err(BatchError::Configuration(_))),
                "{}={} should be rejected",
                key,
                value
            );
        }
    }

    #[test]
    fn accepts_plain_and_schema_qualified_table_names() {
        for table in ["people", "_staging", "tableau.people", "Sales_2016"] {
            let config = config(&[("DATABASE_URL", "sqlite::memory:"), ("TABLE_NAME", table)]);
            assert_eq!(config.unwrap().table_name, table);
        }
    }
}
