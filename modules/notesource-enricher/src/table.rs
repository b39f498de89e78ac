use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::TableError;

type Result<T> = std::result::Result<T, TableError>;

/// An in-memory CSV table. Rows keep their input order and every row has
/// exactly one cell per header. Null cells are stored as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(TableError::RowWidth {
                    row: i,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(String::from).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, _>>()?;
        Self::new(headers, rows)
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.to_writer(file)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of the named column, in row order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &str>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Replace the named column, or append it if absent. `None` becomes an
    /// empty cell.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<String>>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(String::new());
                }
                self.headers.len() - 1
            }
        };

        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value.unwrap_or_default();
        }
        Ok(())
    }
}
