use crate::error::DataSourceError;
use crate::filter::RecordFilter;
use crate::loader::{CsvRecordSource, LoadReport, LoadedRecords};
use crate::statements::StatementSource;
use core_types::{HotelRecord, StatementBook};
use once_cell::sync::OnceCell;

/// The `Repository` is the single entry point to the application's inputs.
///
/// Each input is read and validated at most once; every later call returns
/// the cached value. A failed load is not cached, so it is retried on the
/// next call.
#[derive(Debug)]
pub struct Repository {
    records_source: CsvRecordSource,
    statement_source: StatementSource,
    records: OnceCell<LoadedRecords>,
    statements: OnceCell<StatementBook>,
}

impl Repository {
    pub fn new(records_source: CsvRecordSource, statement_source: StatementSource) -> Self {
        Self {
            records_source,
            statement_source,
            records: OnceCell::new(),
            statements: OnceCell::new(),
        }
    }

    fn loaded(&self) -> Result<&LoadedRecords, DataSourceError> {
        self.records.get_or_try_init(|| self.records_source.load())
    }

    /// All validated hotel records.
    pub fn records(&self) -> Result<&[HotelRecord], DataSourceError> {
        self.loaded().map(|loaded| loaded.records.as_slice())
    }

    /// The records selected by `filter`.
    pub fn filtered(&self, filter: &RecordFilter) -> Result<Vec<HotelRecord>, DataSourceError> {
        Ok(filter.apply(self.records()?))
    }

    pub fn load_report(&self) -> Result<&LoadReport, DataSourceError> {
        self.loaded().map(|loaded| &loaded.report)
    }

    pub fn statements(&self) -> Result<&StatementBook, DataSourceError> {
        self.statements.get_or_try_init(|| self.statement_source.load())
    }
}
