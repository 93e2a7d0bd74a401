use std::collections::HashMap;

use crate::response::RawRow;

/// Declared type of a column, as reported by the `columns` meta table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    String,
    Int,
    Float,
    Bool,
    Time,
    List,
    /// Integer if it parses as one, float otherwise. Used for stats results.
    Number,
    /// Any other declared type (`dict`, `blob`, ...); passed through as text.
    Other(String),
}

impl ColumnKind {
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" => ColumnKind::String,
            "int" => ColumnKind::Int,
            "float" => ColumnKind::Float,
            "bool" | "boolean" => ColumnKind::Bool,
            "time" => ColumnKind::Time,
            "list" => ColumnKind::List,
            other => ColumnKind::Other(other.to_string()),
        }
    }
}

/// Column name to declared type for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTypes {
    kinds: HashMap<String, ColumnKind>,
}

impl ColumnTypes {
    /// Builds the map from `[name, type]` rows; the first row for a name wins.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> Self {
        let mut kinds = HashMap::new();
        for row in rows {
            if let [name, kind, ..] = row.as_slice() {
                kinds
                    .entry(name.clone())
                    .or_insert_with(|| ColumnKind::from_type_name(kind));
            }
        }
        Self { kinds }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnKind> {
        self.kinds.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, kind: ColumnKind) {
        self.kinds.insert(column.into(), kind);
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Column types fetched during one run, keyed by table.
#[derive(Debug, Default)]
pub struct SchemaCache {
    tables: HashMap<String, ColumnTypes>,
}

impl SchemaCache {
    pub fn get(&self, table: &str) -> Option<&ColumnTypes> {
        self.tables.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn insert(&mut self, table: impl Into<String>, types: ColumnTypes) {
        self.tables.insert(table.into(), types);
    }
}
