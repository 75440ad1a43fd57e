//! Expected-output layout.
//!
//! One block per `print`. A scalar print is a single comma-joined line. A
//! sequence print is one line per row; when another print follows, a blank
//! line separates them. The text always ends with a newline unless nothing
//! was printed.

use crate::{Aggregate, OracleError, OracleResult};

/// Newline-joined values.
pub fn format_values(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comma-joined aggregates on one line.
pub fn format_scalars(values: &[Aggregate]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Equal-length sequences zipped into rows, each row comma-joined.
pub fn format_columns(columns: &[Vec<i64>]) -> OracleResult<String> {
    let rows = columns.first().map_or(0, Vec::len);
    if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
        return Err(OracleError::LengthMismatch {
            context: "print",
            left: rows,
            right: bad.len(),
        });
    }
    let lines: Vec<String> = (0..rows)
        .map(|r| {
            columns
                .iter()
                .map(|c| c[r].to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();
    Ok(lines.join("\n"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    text: String,
    sequence: bool,
}

/// Accumulates print blocks into the expected-output text.
#[derive(Debug, Clone, Default)]
pub struct OutputBuilder {
    blocks: Vec<Block>,
}

impl OutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(&mut self, values: &[Aggregate]) -> &mut Self {
        self.blocks.push(Block {
            text: format_scalars(values),
            sequence: false,
        });
        self
    }

    pub fn sequence(&mut self, values: &[i64]) -> &mut Self {
        self.blocks.push(Block {
            text: format_values(values),
            sequence: true,
        });
        self
    }

    pub fn columns(&mut self, columns: &[Vec<i64>]) -> OracleResult<&mut Self> {
        let text = format_columns(columns)?;
        self.blocks.push(Block {
            text,
            sequence: true,
        });
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn finish(&self) -> String {
        let mut out = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            out.push_str(&block.text);
            out.push('\n');
            if block.sequence && i + 1 < self.blocks.len() {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequences_are_separated_by_blank_line() {
        let mut out = OutputBuilder::new();
        out.sequence(&[1, 2]).sequence(&[3]);
        assert_eq!(out.finish(), "1\n2\n\n3\n");
    }

    #[test]
    fn test_scalars_stack_without_gaps() {
        let mut out = OutputBuilder::new();
        out.scalar(&[Aggregate::sum_of(&[1, 2])])
            .scalar(&[Aggregate::avg_of(&[]), Aggregate::sum_of(&[])]);
        assert_eq!(out.finish(), "3\n0.00,0\n");
    }

    #[test]
    fn test_sequence_then_scalar() {
        let mut out = OutputBuilder::new();
        out.sequence(&[7, 8]).scalar(&[Aggregate::sum_of(&[7, 8])]);
        assert_eq!(out.finish(), "7\n8\n\n15\n");
    }

    #[test]
    fn test_zipped_columns() {
        assert_eq!(format_columns(&[vec![1, 2], vec![3, 4]]).unwrap(), "1,3\n2,4");
        assert!(format_columns(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_nothing_printed() {
        assert_eq!(OutputBuilder::new().finish(), "");
    }
}
