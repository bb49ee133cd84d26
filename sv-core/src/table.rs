use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{Read, Write},
    path::Path,
};

use derive_more::Display;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    chromosome::{Chromosome, ChromosomeError},
    common::{NodeId, Sink},
};

pub const SOURCE: &str = "Source";
pub const SINK: &str = "Sink";
pub const CHROMOSOME: &str = "Chromosome";

/// Stable identifier of a row, assigned in file order at ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct RowId(pub usize);

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("Unknown column `{0}`")]
    UnknownColumn(String),

    #[error("Unknown row {0}")]
    UnknownRow(RowId),

    #[error("Row {0} has an empty `Source`")]
    EmptySource(RowId),

    #[error("Row {row}: {error}")]
    InvalidChromosome {
        row: RowId,
        #[source]
        error: ChromosomeError,
    },

    #[error("Node `{node}` is listed on chromosome {first} and on chromosome {second}")]
    ConflictingChromosome {
        node: NodeId,
        first: Chromosome,
        second: Chromosome,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One structural-variant record.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub row: RowId,
    pub source: NodeId,
    pub sink: Sink,
    pub chromosome: Chromosome,
    /// Passthrough columns, keyed by header name.
    pub extra: IndexMap<String, String>,
}

impl Record {
    /// Textual value of a cell, as shown in the grid.
    #[must_use]
    pub fn cell(&self, column: &str) -> Option<String> {
        match column {
            SOURCE => Some(self.source.to_string()),
            SINK => Some(self.sink.to_string()),
            CHROMOSOME => Some(self.chromosome.to_string()),
            other => self.extra.get(other).cloned(),
        }
    }

    fn set_cell(&mut self, column: &str, value: &str) -> Result<(), TableError> {
        match column {
            SOURCE => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(TableError::EmptySource(self.row));
                }
                self.source = NodeId::from(value);
            }
            SINK => self.sink = Sink::parse(value),
            CHROMOSOME => {
                self.chromosome = value
                    .parse()
                    .map_err(|error| TableError::InvalidChromosome {
                        row: self.row,
                        error,
                    })?;
            }
            other => {
                let cell = self
                    .extra
                    .get_mut(other)
                    .ok_or_else(|| TableError::UnknownColumn(other.to_owned()))?;
                value.clone_into(cell);
            }
        }
        Ok(())
    }
}

/// An immutable snapshot of the record table, sorted by `Source`.
///
/// Several rows may share a `Source` (one per outgoing edge), but they always agree
/// on the chromosome, so the first of them describes the node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    /// Build a table from a header and its records.
    ///
    /// # Errors
    ///
    /// Fails if a required column is missing or if rows sharing a `Source`
    /// disagree on the chromosome.
    pub fn new(columns: Vec<String>, mut records: Vec<Record>) -> Result<Self, TableError> {
        for required in [SOURCE, SINK, CHROMOSOME] {
            if !columns.iter().any(|column| column == required) {
                return Err(TableError::MissingColumn(required));
            }
        }
        check_chromosomes(&records)?;
        records.sort_by(|a, b| a.source.cmp(&b.source));
        Ok(Self { columns, records })
    }

    /// Read a table from CSV with a header row.
    ///
    /// # Errors
    ///
    /// Fails on malformed CSV, on a missing required column, on an unparseable
    /// chromosome and on chromosome conflicts.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        let index_of = |name: &'static str| {
            columns
                .iter()
                .position(|column| column == name)
                .ok_or(TableError::MissingColumn(name))
        };
        let source_idx = index_of(SOURCE)?;
        let sink_idx = index_of(SINK)?;
        let chromosome_idx = index_of(CHROMOSOME)?;

        let mut records = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let row = RowId(i);
            let cell = |idx: usize| record.get(idx).unwrap_or_default();

            let source = cell(source_idx);
            if source.is_empty() {
                return Err(TableError::EmptySource(row));
            }
            let chromosome = cell(chromosome_idx)
                .parse()
                .map_err(|error| TableError::InvalidChromosome { row, error })?;
            let extra = columns
                .iter()
                .enumerate()
                .filter(|(idx, _)| ![source_idx, sink_idx, chromosome_idx].contains(idx))
                .map(|(idx, name)| (name.clone(), cell(idx).to_owned()))
                .collect();

            records.push(Record {
                row,
                source: NodeId::from(source),
                sink: Sink::parse(cell(sink_idx)),
                chromosome,
                extra,
            });
        }
        debug!(
            "Read {} records with {} columns",
            records.len(),
            columns.len()
        );
        Self::new(columns, records)
    }

    /// # Errors
    ///
    /// See [`Table::from_csv`]; also fails if the file cannot be opened.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        Self::from_csv(File::open(path)?)
    }

    /// # Errors
    ///
    /// Fails if the underlying writer fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for record in &self.records {
            writer.write_record(
                self.columns
                    .iter()
                    .map(|column| record.cell(column).unwrap_or_default()),
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    /// The rows whose identifier is in `rows`, in table order, with the same columns.
    #[must_use]
    pub fn select_rows(&self, rows: impl IntoIterator<Item = RowId>) -> Self {
        let rows: HashSet<RowId> = rows.into_iter().collect();
        Self {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|record| rows.contains(&record.row))
                .cloned()
                .collect(),
        }
    }

    /// A copy of this table with one cell replaced.
    ///
    /// # Errors
    ///
    /// Fails on unknown rows or columns and on values that break the table invariants.
    pub fn with_cell(&self, row: RowId, column: &str, value: &str) -> Result<Self, TableError> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(TableError::UnknownColumn(column.to_owned()));
        }
        let mut records = self.records.clone();
        records
            .iter_mut()
            .find(|record| record.row == row)
            .ok_or(TableError::UnknownRow(row))?
            .set_cell(column, value)?;
        Self::new(self.columns.clone(), records)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, row: RowId) -> Option<&Record> {
        self.records.iter().find(|record| record.row == row)
    }

    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.records.iter().map(|record| record.row)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn check_chromosomes(records: &[Record]) -> Result<(), TableError> {
    let mut seen: HashMap<&NodeId, Chromosome> = HashMap::new();
    for record in records {
        let first = *seen.entry(&record.source).or_insert(record.chromosome);
        if first != record.chromosome {
            return Err(TableError::ConflictingChromosome {
                node: record.source.clone(),
                first,
                second: record.chromosome,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use anyhow::Result;
    use rstest::{fixture, rstest};

    use super::*;

    pub(crate) const SCENARIO: &str = "\
Source,Sink,Chromosome,Start
C,loose,X,200
A,B,1,0
B,C,2,100
";

    #[fixture]
    pub(crate) fn scenario() -> Table {
        Table::from_csv(SCENARIO.as_bytes()).unwrap()
    }

    #[rstest]
    fn reads_and_sorts(scenario: Table) {
        let sources: Vec<&str> = scenario
            .records()
            .iter()
            .map(|record| record.source.as_str())
            .collect();
        assert_eq!(sources, vec!["A", "B", "C"]);
        assert_eq!(scenario.columns(), ["Source", "Sink", "Chromosome", "Start"]);

        let c = &scenario.records()[2];
        assert_eq!(c.row, RowId(0));
        assert_eq!(c.sink, Sink::Loose);
        assert_eq!(c.chromosome, Chromosome::X);
        assert_eq!(c.cell("Start").as_deref(), Some("200"));
        assert_eq!(c.cell("Chromosome").as_deref(), Some("X"));
    }

    #[rstest]
    #[case("Sink,Chromosome\nA,1\n", SOURCE)]
    #[case("Source,Chromosome\nA,1\n", SINK)]
    #[case("Source,Sink\nA,B\n", CHROMOSOME)]
    fn missing_column(#[case] csv: &str, #[case] column: &str) {
        let err = Table::from_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(c) if c == column));
    }

    #[test]
    fn invalid_chromosome() {
        let err = Table::from_csv("Source,Sink,Chromosome\nA,B,Q\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidChromosome { row: RowId(0), .. }
        ));
    }

    #[test]
    fn conflicting_chromosome() {
        let csv = "Source,Sink,Chromosome\nA,B,1\nA,C,2\n";
        let err = Table::from_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::ConflictingChromosome { .. }));
    }

    #[test]
    fn duplicate_sources_with_same_chromosome() -> Result<()> {
        let csv = "Source,Sink,Chromosome\nA,B,1\nA,C,chr1\n";
        let table = Table::from_csv(csv.as_bytes())?;
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[rstest]
    fn select_rows(scenario: Table) {
        let none = scenario.select_rows([]);
        assert!(none.is_empty());
        assert_eq!(none.columns(), scenario.columns());

        let all = scenario.select_rows(scenario.row_ids());
        assert_eq!(all, scenario);

        let some = scenario.select_rows([RowId(2), RowId(0)]);
        let rows: Vec<RowId> = some.row_ids().collect();
        assert_eq!(rows, vec![RowId(2), RowId(0)]);
        assert!(some.records().iter().all(|r| scenario.records().contains(r)));
    }

    #[rstest]
    fn with_cell_returns_new_snapshot(scenario: Table) -> Result<()> {
        let edited = scenario.with_cell(RowId(1), "Start", "5")?;
        assert_eq!(edited.get(RowId(1)).and_then(|r| r.cell("Start")).as_deref(), Some("5"));
        assert_eq!(scenario.get(RowId(1)).and_then(|r| r.cell("Start")).as_deref(), Some("0"));

        let moved = scenario.with_cell(RowId(1), SOURCE, "Z")?;
        assert_eq!(moved.records().last().map(|r| r.row), Some(RowId(1)));

        assert!(matches!(
            scenario.with_cell(RowId(1), CHROMOSOME, "nope"),
            Err(TableError::InvalidChromosome { .. })
        ));
        assert!(matches!(
            scenario.with_cell(RowId(9), SINK, "A"),
            Err(TableError::UnknownRow(RowId(9)))
        ));
        assert!(matches!(
            scenario.with_cell(RowId(1), "End", "1"),
            Err(TableError::UnknownColumn(_))
        ));
        Ok(())
    }

    #[rstest]
    fn write_csv(scenario: Table) -> Result<()> {
        let mut out = Vec::new();
        scenario.select_rows([RowId(1)]).write_csv(&mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "Source,Sink,Chromosome,Start\nA,B,1,0\n"
        );
        Ok(())
    }
}
