use crate::error::DataSourceError;
use core_types::{StatementBook, StatementTable};
use serde::Deserialize;
use std::path::PathBuf;

/// The on-disk layout: a list of `[[statements]]` tables.
#[derive(Debug, Deserialize)]
struct StatementFile {
    #[serde(default)]
    statements: Vec<StatementTable>,
}

/// Reads a statement book from a TOML file.
///
/// ```toml
/// [[statements]]
/// name = "income_statement"
/// kind = "income_statement"
/// prior_label = "H1 2024"
/// current_label = "H1 2025"
/// lines = [
///   { label = "Revenue", prior = 2677, current = 2745 },
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct StatementSource {
    path: PathBuf,
}

impl StatementSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<StatementBook, DataSourceError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(self.path.as_path()).format(config::FileFormat::Toml))
            .build()
            .map_err(|source| self.statement_error(source))?;
        let file: StatementFile = settings
            .try_deserialize()
            .map_err(|source| self.statement_error(source))?;

        let mut book = StatementBook::new();
        for table in file.statements {
            let name = table.name().to_string();
            if book.insert(table).is_some() {
                return Err(DataSourceError::DuplicateStatement {
                    path: self.path.clone(),
                    name,
                });
            }
        }

        tracing::info!(path = %self.path.display(), statements = book.len(), "Loaded statement book.");
        Ok(book)
    }

    fn statement_error(&self, source: config::ConfigError) -> DataSourceError {
        DataSourceError::Statement {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Period, StatementKind};
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn book_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_named_statements_with_period_labels() {
        let file = book_file(
            r#"
            [[statements]]
            name = "income_statement"
            kind = "income_statement"
            prior_label = "H1 2024"
            current_label = "H1 2025"
            lines = [
              { label = "Revenue", prior = 2677, current = 2745 },
              { label = "Operating expenses", prior = -2173.5, current = -2193 },
            ]

            [[statements]]
            name = "segments"
            kind = "segments"
            lines = [{ label = "Premium", prior = 0, current = 12 }]
            "#,
        );
        let book = StatementSource::new(file.path()).load().unwrap();
        assert_eq!(book.len(), 2);

        let income = book.get("income_statement").unwrap();
        assert_eq!(income.kind(), StatementKind::IncomeStatement);
        assert_eq!(income.period_label(Period::Current), "H1 2025");
        assert_eq!(income.value("Operating expenses", Period::Prior).unwrap(), dec!(-2173.5));
        assert_eq!(book.get("segments").unwrap().period_label(Period::Prior), "prior");
    }

    #[test]
    fn duplicate_line_labels_fail_the_load() {
        let file = book_file(
            r#"
            [[statements]]
            name = "assets"
            kind = "assets"
            lines = [
              { label = "Inventories", prior = 39, current = 36 },
              { label = "Inventories", prior = 1, current = 1 },
            ]
            "#,
        );
        let err = StatementSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, DataSourceError::Statement { .. }));
        assert!(err.to_string().contains("Inventories"));
    }

    #[test]
    fn duplicate_statement_names_fail_the_load() {
        let file = book_file(
            r#"
            [[statements]]
            name = "assets"
            kind = "assets"

            [[statements]]
            name = "assets"
            kind = "liabilities"
            "#,
        );
        let err = StatementSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, DataSourceError::DuplicateStatement { ref name, .. } if name == "assets"));
    }

    #[test]
    fn missing_book_is_an_error() {
        let err = StatementSource::new("no/such/book.toml").load().unwrap_err();
        assert!(matches!(err, DataSourceError::Statement { .. }));
    }
}
