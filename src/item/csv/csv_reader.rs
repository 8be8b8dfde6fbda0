use csv::{ReaderBuilder, StringRecordsIntoIter, Terminator, Trim};
use std::{
    cell::RefCell,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

use super::field_set::{FieldSet, FieldSetMapper};

/// A CSV item reader that implements the `ItemReader` trait.
///
/// Each line is split on the delimiter, its values are bound positionally to
/// the configured field names in a [`FieldSet`], and the field set mapper
/// turns it into an item. Mapping happens during `read`, so a malformed line
/// surfaces as a read error of the step.
///
/// # Implementation Details
///
/// - Uses a `RefCell` to provide interior mutability for the CSV record iterator
/// - The CSV layer is flexible about column counts; the field set rejects
///   lines whose count does not match the names with `BatchError::Mapping`
/// - Low-level CSV failures (I/O, invalid UTF-8) become `BatchError::ItemReader`
/// - A reader built with `from_path` opens its file in `open` (or on the first
///   `read`), so a missing file fails the step that owns the reader
///
/// # Examples
///
/// ```
/// use superstore_batch::core::item::ItemReader;
/// use superstore_batch::error::BatchError;
/// use superstore_batch::item::csv::csv_reader::CsvItemReaderBuilder;
/// use superstore_batch::item::csv::field_set::{FieldSet, FieldSetMapper};
///
/// struct CityMapper;
///
/// impl FieldSetMapper<(String, i64)> for CityMapper {
///     fn map_field_set(&self, field_set: &FieldSet) -> Result<(String, i64), BatchError> {
///         Ok((field_set.read_string("city")?, field_set.read_i64("pop")?))
///     }
/// }
///
/// let data = "city,pop\nBoston,4628910\nConcord,42695";
///
/// let mapper = CityMapper;
/// let reader = CsvItemReaderBuilder::<(String, i64)>::new()
///     .has_headers(true)
///     .names(&["city", "pop"])
///     .field_set_mapper(&mapper)
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// assert_eq!(reader.read().unwrap(), Some(("Boston".to_string(), 4628910)));
/// assert_eq!(reader.read().unwrap(), Some(("Concord".to_string(), 42695)));
/// assert_eq!(reader.read().unwrap(), None);
/// ```
pub struct CsvItemReader<'a, R, T> {
    /// Iterator over the CSV records, `None` until the source is opened
    records: RefCell<Option<StringRecordsIntoIter<R>>>,
    opener: RefCell<Option<Opener<R>>>,
    names: Vec<String>,
    field_set_mapper: &'a dyn FieldSetMapper<T>,
}

type Opener<R> = Box<dyn FnOnce() -> Result<StringRecordsIntoIter<R>, BatchError>>;

impl<R: Read, T> ItemReader<T> for CsvItemReader<'_, R, T> {
    /// Reads the next line and maps it.
    ///
    /// # Returns
    /// - `Ok(Some(item))` if a line is read and mapped
    /// - `Ok(None)` once the input is exhausted
    /// - `Err(BatchError::Mapping)` if the line has the wrong field count or a bad value
    /// - `Err(BatchError::ItemReader)` if the CSV source itself fails
    fn read(&self) -> ItemReaderResult<T> {
        self.open()?;

        let Some(result) = self
            .records
            .borrow_mut()
            .as_mut()
            .and_then(|records| records.next())
        else {
            return Ok(None);
        };

        let string_record = result.map_err(|error| BatchError::ItemReader(error.to_string()))?;
        let line = string_record
            .position()
            .map(|position| position.line())
            .unwrap_or_default();

        let field_set = FieldSet::new(&self.names, string_record, line)?;
        self.field_set_mapper.map_field_set(&field_set).map(Some)
    }

    /// Opens the file of a `from_path` reader. Does nothing once opened.
    fn open(&self) -> Result<(), BatchError> {
        let Some(opener) = self.opener.borrow_mut().take() else {
            return Ok(());
        };
        *self.records.borrow_mut() = Some(opener()?);
        Ok(())
    }
}

/// A builder for configuring CSV item reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Terminator: CRLF (accepts `\r\n`, `\n` and `\r`)
/// - Headers: disabled
/// - Trimming: All fields trimmed
///
/// Field names and a field set mapper are required.
pub struct CsvItemReaderBuilder<'a, T> {
    delimiter: u8,
    terminator: Terminator,
    has_headers: bool,
    names: Vec<String>,
    field_set_mapper: Option<&'a dyn FieldSetMapper<T>>,
}

impl<T> Default for CsvItemReaderBuilder<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CsvItemReaderBuilder<'a, T> {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            terminator: Terminator::CRLF,
            has_headers: false,
            names: Vec::new(),
            field_set_mapper: None,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// When enabled, the first line is skipped.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Ordered field names, one per column.
    pub fn names(mut self, names: &[&str]) -> Self {
        self.names = names.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn field_set_mapper(mut self, field_set_mapper: &'a dyn FieldSetMapper<T>) -> Self {
        self.field_set_mapper = Some(field_set_mapper);
        self
    }

    /// Creates a `CsvItemReader` from any source implementing `Read`.
    pub fn from_reader<R: Read>(self, rdr: R) -> Result<CsvItemReader<'a, R, T>, BatchError> {
        let records = self.reader_builder().from_reader(rdr).into_records();
        self.build(Some(records), None)
    }

    /// Creates a `CsvItemReader` over a file path.
    ///
    /// The file is opened by `ItemReader::open`, which fails with
    /// `BatchError::ItemReader` if it cannot be opened.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<'a, File, T>, BatchError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let builder = self.reader_builder();
        let opener: Opener<File> = Box::new(move || {
            builder
                .from_path(&path)
                .map(|rdr| rdr.into_records())
                .map_err(|error| {
                    BatchError::ItemReader(format!("unable to open {}: {}", path.display(), error))
                })
        });
        self.build(None, Some(opener))
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .terminator(self.terminator)
            .has_headers(self.has_headers)
            // column counts are checked against the names by the field set
            .flexible(true);
        builder
    }

    fn build<R: Read>(
        self,
        records: Option<StringRecordsIntoIter<R>>,
        opener: Option<Opener<R>>,
    ) -> Result<CsvItemReader<'a, R, T>, BatchError> {
        if self.names.is_empty() {
            return Err(BatchError::Configuration(
                "CSV reader needs at least one field name".to_string(),
            ));
        }

        let field_set_mapper = self.field_set_mapper.ok_or_else(|| {
            BatchError::Configuration("CSV reader needs a field set mapper".to_string())
        })?;

        Ok(CsvItemReader {
            records: RefCell::new(records),
            opener: RefCell::new(opener),
            names: self.names,
            field_set_mapper,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct City {
        city: String,
        country: String,
        pop: i64,
    }

    struct CityMapper;

    impl FieldSetMapper<City> for CityMapper {
        fn map_field_set(&self, field_set: &FieldSet) -> Result<City, BatchError> {
            Ok(City {
                city: field_set.read_string("city")?,
                country: field_set.read_string("country")?,
                pop: field_set.read_i64("pop")?,
            })
        }
    }

    const NAMES: [&str; 3] = ["city", "country", "pop"];

    #[test]
    fn reads_and_maps_every_line() -> Result<(), BatchError> {
        let data = "city,country,pop
        Boston,United States,4628910
        Concord,United States,42695";

        let mapper = CityMapper;
        let reader = CsvItemReaderBuilder::<City>::new()
            .has_headers(true)
            .delimiter(b',')
            .names(&NAMES)
            .field_set_mapper(&mapper)
            .from_reader(data.as_bytes())?;

        let mut cities = Vec::new();
        while let Some(city) = reader.read()? {
            cities.push(city);
        }

        assert_eq!(
            cities,
            vec![
                City {
                    city: "Boston".to_string(),
                    country: "United States".to_string(),
                    pop: 4628910
                },
                City {
                    city: "Concord".to_string(),
                    country: "United States".to_string(),
                    pop: 42695
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn short_line_is_a_mapping_error() -> Result<(), BatchError> {
        let data = "Boston,United States\nConcord,United States,42695";

        let mapper = CityMapper;
        let reader = CsvItemReaderBuilder::<City>::new()
            .names(&NAMES)
            .field_set_mapper(&mapper)
            .from_reader(data.as_bytes())?;

        match reader.read() {
            Err(BatchError::Mapping(message)) => assert!(message.contains("expected 3 fields")),
            other => panic!("expected a mapping error, got {:?}", other),
        }
        assert_eq!(reader.read()?.map(|c| c.pop), Some(42695));

        Ok(())
    }

    #[test]
    fn custom_delimiter() -> Result<(), BatchError> {
        let data = "Lyon;France;522250\n";

        let mapper = CityMapper;
        let reader = CsvItemReaderBuilder::<City>::new()
            .delimiter(b';')
            .terminator(Terminator::Any(b'\n'))
            .names(&NAMES)
            .field_set_mapper(&mapper)
            .from_reader(data.as_bytes())?;

        assert_eq!(reader.read()?.map(|c| c.country), Some("France".to_string()));
        assert!(reader.read()?.is_none());

        Ok(())
    }

    #[test]
    fn reads_from_path() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Paris,France,2102650")?;

        let mapper = CityMapper;
        let reader = CsvItemReaderBuilder::<City>::new()
            .names(&NAMES)
            .field_set_mapper(&mapper)
            .from_path(file.path())?;

        assert_eq!(reader.read()?.map(|c| c.city), Some("Paris".to_string()));

        Ok(())
    }

    #[test]
    fn missing_file_is_a_reader_error_on_open() -> Result<(), BatchError> {
        let mapper = CityMapper;
        let reader = CsvItemReaderBuilder::<City>::new()
            .names(&NAMES)
            .field_set_mapper(&mapper)
            .from_path("does/not/exist.csv")?;

        match reader.open() {
            Err(BatchError::ItemReader(message)) => {
                assert!(message.starts_with("unable to open does/not/exist.csv"))
            }
            other => panic!("expected a reader error, got {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn open_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Lyon,France,522250")?;

        let mapper = CityMapper;
        let reader = CsvItemReaderBuilder::<City>::new()
            .names(&NAMES)
            .field_set_mapper(&mapper)
            .from_path(file.path())?;

        reader.open()?;
        reader.open()?;

        assert_eq!(reader.read()?.map(|c| c.pop), Some(522250));
        assert!(reader.read()?.is_none());

        Ok(())
    }

    #[test]
    fn builder_requires_names_and_mapper() {
        let mapper = CityMapper;

        let without_names = CsvItemReaderBuilder::<City>::new()
            .field_set_mapper(&mapper)
            .from_reader("a,b,c".as_bytes());
        assert!(matches!(without_names, Err(BatchError::Configuration(_))));

        let without_mapper = CsvItemReaderBuilder::<City>::new()
            .names(&NAMES)
            .from_reader("a,b,c".as_bytes());
        assert!(matches!(without_mapper, Err(BatchError::Configuration(_))));
    }
}
