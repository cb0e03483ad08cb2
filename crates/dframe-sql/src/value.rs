use crate::error::{SqlError, SqlResult};
use dframe::{ColumnType, Value};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use std::sync::Arc;

/// Binds a [`Value`] as a statement parameter.
#[derive(Debug, Clone, Copy)]
pub struct SqlValue<'a>(pub &'a Value);

impl ToSql for SqlValue<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(v) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*v))),
            Value::Int(v) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*v))),
            Value::Long(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            Value::Double(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            Value::String(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

pub(crate) fn read_value(value: ValueRef<'_>) -> SqlResult<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Long(v),
        ValueRef::Real(v) => Value::Double(v),
        ValueRef::Text(bytes) => Value::String(Arc::from(String::from_utf8_lossy(bytes))),
        ValueRef::Blob(_) => return Err(SqlError::UnsupportedColumnType("BLOB".to_string())),
    })
}

/// Column storage for a declared SQL type, following SQLite's affinity rules.
pub(crate) fn column_type_for_decl(decl_type: Option<&str>) -> ColumnType {
    let Some(decl) = decl_type else {
        return ColumnType::Object;
    };
    let decl = decl.to_ascii_uppercase();
    if decl.contains("INT") {
        ColumnType::Long
    } else if decl.contains("REAL")
        || decl.contains("FLOA")
        || decl.contains("DOUB")
        || decl.starts_with("NUMERIC")
        || decl.starts_with("DECIMAL")
    {
        ColumnType::Double
    } else {
        ColumnType::Object
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
