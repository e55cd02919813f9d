//! Row decoding.
//!
//! The snapshot tables are produced by upstream aggregation jobs, so column
//! widths vary: counts may be `int2`/`int4`/`int8` and `dt` may be stored with
//! or without a time zone. Each column is decoded by its declared type.

use cardpulse_core::record::{Engagement, Visit, count_from_i64};
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio_postgres::{Row, types::Type};

use crate::{Error, Result};

fn column_type<'a>(row: &'a Row, column: &'static str) -> Result<&'a Type> {
  row
    .columns()
    .iter()
    .find(|c| c.name() == column)
    .map(|c| c.type_())
    .ok_or(Error::MissingColumn(column))
}

fn unsupported(column: &'static str, ty: &Type) -> Error {
  Error::UnsupportedType { column, ty: ty.name().to_owned() }
}

fn get_text(row: &Row, column: &'static str) -> Result<String> {
  let ty = column_type(row, column)?;
  if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty) {
    Ok(row.try_get(column)?)
  } else {
    Err(unsupported(column, ty))
  }
}

fn get_count(row: &Row, column: &'static str) -> Result<u64> {
  let ty = column_type(row, column)?;
  let value: i64 = if *ty == Type::INT8 {
    row.try_get(column)?
  } else if *ty == Type::INT4 {
    i64::from(row.try_get::<_, i32>(column)?)
  } else if *ty == Type::INT2 {
    i64::from(row.try_get::<_, i16>(column)?)
  } else {
    return Err(unsupported(column, ty));
  };
  Ok(count_from_i64(column, value)?)
}

/// `timestamptz` values are taken in UTC.
fn get_dt(row: &Row, column: &'static str) -> Result<NaiveDateTime> {
  let ty = column_type(row, column)?;
  if *ty == Type::TIMESTAMP {
    Ok(row.try_get(column)?)
  } else if *ty == Type::TIMESTAMPTZ {
    Ok(row.try_get::<_, DateTime<Utc>>(column)?.naive_utc())
  } else {
    Err(unsupported(column, ty))
  }
}

pub fn visit(row: &Row) -> Result<Visit> {
  Ok(Visit {
    item_topic:   get_text(row, "item_topic")?,
    source_topic: get_text(row, "source_topic")?,
    age_segment:  get_text(row, "age_segment")?,
    dt:           get_dt(row, "dt")?,
    visits:       get_count(row, "visits")?,
  })
}

pub fn engagement(row: &Row) -> Result<Engagement> {
  Ok(Engagement {
    event:        get_text(row, "event")?,
    age_segment:  get_text(row, "age_segment")?,
    item_topic:   get_text(row, "item_topic")?,
    dt:           get_dt(row, "dt")?,
    unique_users: get_count(row, "unique_users")?,
  })
}
