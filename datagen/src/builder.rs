//! Column-at-a-time table construction.
//!
//! Each method that takes an RNG consumes its draws in a documented order,
//! so the sequence of builder calls fixes the random stream.

use crate::{DataGenError, DataGenResult, ZipfianDistribution};
use colgen_core::{Column, Table};
use rand::Rng;

/// Builds one table with a fixed row count.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    db: String,
    name: String,
    rows: usize,
    columns: Vec<(String, Vec<i64>)>,
}

impl TableBuilder {
    pub fn new(db: impl Into<String>, name: impl Into<String>, rows: usize) -> Self {
        Self {
            db: db.into(),
            name: name.into(),
            rows,
            columns: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Values of a column built so far.
    pub fn values(&self, column: &str) -> DataGenResult<&[i64]> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| DataGenError::UnknownColumn(column.to_string()))
    }

    fn values_mut(&mut self, column: &str) -> DataGenResult<&mut Vec<i64>> {
        self.columns
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, values)| values)
            .ok_or_else(|| DataGenError::UnknownColumn(column.to_string()))
    }

    /// Replace a column in place, or append it if new.
    fn set(&mut self, column: &str, values: Vec<i64>) {
        match self.columns.iter().position(|(name, _)| name == column) {
            Some(i) => self.columns[i].1 = values,
            None => self.columns.push((column.to_string(), values)),
        }
    }

    fn check_range(column: &str, low: i64, high: i64) -> DataGenResult<()> {
        if low >= high {
            return Err(DataGenError::EmptyRange {
                column: column.to_string(),
                low,
                high,
            });
        }
        Ok(())
    }

    /// Fill several columns with uniform draws in `[low, high)`.
    ///
    /// Draws are row-major: row 0 of every column, then row 1, and so on.
    pub fn uniform_columns(
        &mut self,
        names: &[&str],
        low: i64,
        high: i64,
        rng: &mut impl Rng,
    ) -> DataGenResult<()> {
        if let Some(first) = names.first() {
            Self::check_range(first, low, high)?;
        }
        let mut matrix: Vec<Vec<i64>> = vec![Vec::with_capacity(self.rows); names.len()];
        for _ in 0..self.rows {
            for column in matrix.iter_mut() {
                column.push(rng.gen_range(low..high));
            }
        }
        for (name, values) in names.iter().zip(matrix) {
            self.set(name, values);
        }
        Ok(())
    }

    /// Fill one column with uniform draws in `[low, high)`.
    pub fn fill_uniform(
        &mut self,
        column: &str,
        low: i64,
        high: i64,
        rng: &mut impl Rng,
    ) -> DataGenResult<()> {
        Self::check_range(column, low, high)?;
        let values = (0..self.rows).map(|_| rng.gen_range(low..high)).collect();
        self.set(column, values);
        Ok(())
    }

    /// Fill one column with Zipfian ranks.
    pub fn fill_zipf(&mut self, column: &str, dist: &ZipfianDistribution, rng: &mut impl Rng) {
        let values = dist
            .draw_many(self.rows, rng)
            .into_iter()
            .map(|k| k as i64)
            .collect();
        self.set(column, values);
    }

    /// Fill one column with a single value. No draws.
    pub fn fill_constant(&mut self, column: &str, value: i64) {
        self.set(column, vec![value; self.rows]);
    }

    /// Fill one column with `start, start+1, ...`. No draws.
    pub fn fill_sequence(&mut self, column: &str, start: i64) {
        let values = (0..self.rows as i64).map(|i| start + i).collect();
        self.set(column, values);
    }

    /// One uniform `[0, 1)` draw per row; a row is selected when its draw is below `threshold`.
    pub fn mask(&self, threshold: f64, rng: &mut impl Rng) -> Vec<bool> {
        (0..self.rows).map(|_| rng.gen::<f64>() < threshold).collect()
    }

    /// Overwrite the masked rows of a column with `value`.
    pub fn inject_frequent(&mut self, column: &str, mask: &[bool], value: i64) -> DataGenResult<()> {
        if mask.len() != self.rows {
            return Err(DataGenError::MaskLength {
                expected: self.rows,
                actual: mask.len(),
            });
        }
        let values = self.values_mut(column)?;
        for (v, hit) in values.iter_mut().zip(mask) {
            if *hit {
                *v = value;
            }
        }
        Ok(())
    }

    /// `target[i] += source[i]` for every row. No draws.
    pub fn add_column(&mut self, target: &str, source: &str) -> DataGenResult<()> {
        let addend = self.values(source)?.to_vec();
        let values = self.values_mut(target)?;
        for (v, a) in values.iter_mut().zip(addend) {
            *v += a;
        }
        Ok(())
    }

    /// Assemble the table, keeping the order in which columns were first set.
    pub fn finish(self) -> DataGenResult<Table> {
        let mut table = Table::new(self.db, self.name, self.rows);
        for (name, values) in self.columns {
            table.push_column(Column::new(name, values))?;
        }
        tracing::debug!(
            table = %table.qualified_name(),
            rows = table.row_count(),
            columns = table.columns().len(),
            "built table"
        );
        Ok(table)
    }
}
