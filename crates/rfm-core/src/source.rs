//! Data-access boundary between tabular inputs and the engine.

use polars::prelude::*;
use rfm_model::{ColumnMapping, Result, RfmError, TransactionRecord, ValidationError};

use crate::datetime::any_to_timestamp;

/// Anything that can yield typed transaction rows for a column mapping.
pub trait TransactionSource {
    /// Returns every transaction row, validated and typed.
    ///
    /// Implementations report absent columns as [`RfmError::Schema`] and bad
    /// cells as [`ValidationError`] with a 1-based row number.
    fn transactions(&self, columns: &ColumnMapping) -> Result<Vec<TransactionRecord>>;
}

impl TransactionSource for [TransactionRecord] {
    fn transactions(&self, columns: &ColumnMapping) -> Result<Vec<TransactionRecord>> {
        for (idx, record) in self.iter().enumerate() {
            if record.customer_id.trim().is_empty() {
                return Err(null_value(&columns.customer, idx + 1));
            }
            if !record.amount.is_finite() {
                return Err(ValidationError::NonNumeric {
                    column: columns.amount.clone(),
                    value: record.amount.to_string(),
                    row: idx + 1,
                }
                .into());
            }
        }
        Ok(self.to_vec())
    }
}

impl TransactionSource for Vec<TransactionRecord> {
    fn transactions(&self, columns: &ColumnMapping) -> Result<Vec<TransactionRecord>> {
        self.as_slice().transactions(columns)
    }
}

impl TransactionSource for DataFrame {
    fn transactions(&self, columns: &ColumnMapping) -> Result<Vec<TransactionRecord>> {
        let missing: Vec<String> = columns
            .required()
            .into_iter()
            .filter(|name| self.column(name).is_err())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(RfmError::Schema { missing });
        }

        let customer = self
            .column(&columns.customer)
            .map_err(|e| ValidationError::Parameters(e.to_string()))?;
        let timestamp = self
            .column(&columns.timestamp)
            .map_err(|e| ValidationError::Parameters(e.to_string()))?;
        let amount = self
            .column(&columns.amount)
            .map_err(|e| ValidationError::Parameters(e.to_string()))?;

        let mut records = Vec::with_capacity(self.height());
        for idx in 0..self.height() {
            let row = idx + 1;
            let customer_id = read_customer(customer, &columns.customer, idx, row)?;
            let timestamp = read_timestamp(timestamp, &columns.timestamp, idx, row)?;
            let amount = read_amount(amount, &columns.amount, idx, row)?;
            records.push(TransactionRecord::new(customer_id, timestamp, amount));
        }
        Ok(records)
    }
}

fn null_value(column: &str, row: usize) -> RfmError {
    ValidationError::NullValue {
        column: column.to_string(),
        row,
    }
    .into()
}

fn read_customer(column: &Column, name: &str, idx: usize, row: usize) -> Result<String> {
    let value = column.get(idx).unwrap_or(AnyValue::Null);
    let text = match value {
        AnyValue::Null => return Err(null_value(name, row)),
        AnyValue::String(s) => s.trim().to_string(),
        AnyValue::StringOwned(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        return Err(null_value(name, row));
    }
    Ok(text)
}

fn read_timestamp(
    column: &Column,
    name: &str,
    idx: usize,
    row: usize,
) -> Result<chrono::NaiveDateTime> {
    let value = column.get(idx).unwrap_or(AnyValue::Null);
    match &value {
        AnyValue::Null => Err(null_value(name, row)),
        AnyValue::String(s) if s.trim().is_empty() => Err(null_value(name, row)),
        other => any_to_timestamp(other).ok_or_else(|| {
            ValidationError::InvalidTimestamp {
                column: name.to_string(),
                value: cell_text(other),
                row,
            }
            .into()
        }),
    }
}

fn read_amount(column: &Column, name: &str, idx: usize, row: usize) -> Result<f64> {
    let value = column.get(idx).unwrap_or(AnyValue::Null);
    let parsed = match &value {
        AnyValue::Null => return Err(null_value(name, row)),
        AnyValue::String(s) if s.trim().is_empty() => return Err(null_value(name, row)),
        AnyValue::String(s) => s.trim().parse::<f64>().ok(),
        AnyValue::StringOwned(s) => s.trim().parse::<f64>().ok(),
        AnyValue::Int8(v) => Some(f64::from(*v)),
        AnyValue::Int16(v) => Some(f64::from(*v)),
        AnyValue::Int32(v) => Some(f64::from(*v)),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(f64::from(*v)),
        AnyValue::UInt16(v) => Some(f64::from(*v)),
        AnyValue::UInt32(v) => Some(f64::from(*v)),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(f64::from(*v)),
        AnyValue::Float64(v) => Some(*v),
        _ => None,
    };
    match parsed {
        Some(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ValidationError::NonNumeric {
            column: name.to_string(),
            value: cell_text(&value),
            row,
        }
        .into()),
    }
}

fn cell_text(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}
