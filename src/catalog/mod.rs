/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! The self-describing system catalog: three bootstrapped relations (`_tables`, `_columns`,
//! `_indices`) that describe themselves and every user table, plus the in-memory table and index
//! caches built on top of them.

use crate::config::Config;
use crate::constants::{COLUMNS_TABLE, INDICES_TABLE, TABLES_TABLE};
use crate::error::{Error, Result};
use crate::index::{BtreeIndex, HashIndex, Index, IndexMeta};
use crate::relation::{Attribute, ColumnType, Handle, Relation, Row, Schema, Value, ValueDict};
use crate::statement::ColumnDef;
use log::{debug, warn};
use std::collections::HashMap;

fn is_catalog_table(name: &str) -> bool {
    matches!(name, TABLES_TABLE | COLUMNS_TABLE | INDICES_TABLE)
}

fn single(column: &str, value: Value) -> ValueDict {
    let mut dict = ValueDict::new();
    dict.insert(column.to_string(), value);
    dict
}

fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }
    let all_digits = name.chars().all(|c| c.is_ascii_digit());
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '$' || c == '_');
    if all_digits || !valid_chars {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

pub struct Catalog {
    config: Config,
    tables: Relation,
    columns: Relation,
    indices: Relation,
    table_cache: HashMap<String, Relation>,
    index_cache: HashMap<(String, String), Box<dyn Index>>,
}

impl Catalog {
    /// Open (or, on first use, bootstrap) the three system catalog relations.
    pub fn new(config: &Config) -> Result<Self> {
        config.open()?;

        let tables_schema = Schema::new(vec![Attribute::new("table_name", ColumnType::Text)]);
        let columns_schema = Schema::new(vec![
            Attribute::new("table_name", ColumnType::Text),
            Attribute::new("column_name", ColumnType::Text),
            Attribute::new("data_type", ColumnType::Text),
        ]);
        let indices_schema = Schema::new(vec![
            Attribute::new("table_name", ColumnType::Text),
            Attribute::new("index_name", ColumnType::Text),
            Attribute::new("seq_in_index", ColumnType::Int),
            Attribute::new("column_name", ColumnType::Text),
            Attribute::new("index_type", ColumnType::Text),
            Attribute::new("is_unique", ColumnType::Boolean),
        ]);

        let mut tables = Relation::new(config, TABLES_TABLE, tables_schema);
        let mut columns = Relation::new(config, COLUMNS_TABLE, columns_schema);
        let mut indices = Relation::new(config, INDICES_TABLE, indices_schema);

        let freshly_created = tables.create_if_not_exists()?;
        columns.create_if_not_exists()?;
        indices.create_if_not_exists()?;

        let mut catalog = Self {
            config: config.clone(),
            tables,
            columns,
            indices,
            table_cache: HashMap::new(),
            index_cache: HashMap::new(),
        };

        if freshly_created {
            catalog.bootstrap()?;
        }
        Ok(catalog)
    }

    fn bootstrap(&mut self) -> Result<()> {
        debug!("bootstrapping system catalog");
        for name in [TABLES_TABLE, COLUMNS_TABLE, INDICES_TABLE] {
            self.insert_table_row(name)?;
        }
        let catalog_columns = [
            (TABLES_TABLE, "table_name", "TEXT"),
            (COLUMNS_TABLE, "table_name", "TEXT"),
            (COLUMNS_TABLE, "column_name", "TEXT"),
            (COLUMNS_TABLE, "data_type", "TEXT"),
            (INDICES_TABLE, "table_name", "TEXT"),
            (INDICES_TABLE, "index_name", "TEXT"),
            (INDICES_TABLE, "seq_in_index", "INT"),
            (INDICES_TABLE, "column_name", "TEXT"),
            (INDICES_TABLE, "index_type", "TEXT"),
            (INDICES_TABLE, "is_unique", "BOOLEAN"),
        ];
        for (table, column, data_type) in catalog_columns {
            self.insert_column_row(table, column, data_type)?;
        }
        Ok(())
    }

    fn insert_table_row(&mut self, table_name: &str) -> Result<Handle> {
        let predicate = single("table_name", Value::Text(table_name.to_string()));
        if !self.tables.select(Some(&predicate))?.is_empty() {
            return Err(Error::DuplicateTable(table_name.to_string()));
        }
        let mut row = Row::new();
        row.insert("table_name", Value::Text(table_name.to_string()));
        self.tables.insert(&row)
    }

    fn insert_column_row(
        &mut self,
        table_name: &str,
        column_name: &str,
        data_type: &str,
    ) -> Result<Handle> {
        validate_identifier(table_name)?;
        validate_identifier(column_name)?;
        if ColumnType::parse_catalog(data_type).is_none() {
            return Err(Error::UnsupportedType(data_type.to_string()));
        }
        let mut predicate = ValueDict::new();
        predicate.insert("table_name".to_string(), Value::Text(table_name.to_string()));
        predicate.insert("column_name".to_string(), Value::Text(column_name.to_string()));
        if !self.columns.select(Some(&predicate))?.is_empty() {
            return Err(Error::DuplicateColumn(table_name.to_string(), column_name.to_string()));
        }
        let mut row = Row::new();
        row.insert("table_name", Value::Text(table_name.to_string()));
        row.insert("column_name", Value::Text(column_name.to_string()));
        row.insert("data_type", Value::Text(data_type.to_string()));
        self.columns.insert(&row)
    }

    fn insert_index_row(
        &mut self,
        table_name: &str,
        index_name: &str,
        seq_in_index: i32,
        column_name: &str,
        index_type: &str,
        is_unique: bool,
    ) -> Result<Handle> {
        let mut predicate = ValueDict::new();
        predicate.insert("table_name".to_string(), Value::Text(table_name.to_string()));
        predicate.insert("index_name".to_string(), Value::Text(index_name.to_string()));
        if seq_in_index == 1 {
            predicate.insert("seq_in_index".to_string(), Value::Int(1));
        } else {
            predicate.insert("column_name".to_string(), Value::Text(column_name.to_string()));
        }
        if !self.indices.select(Some(&predicate))?.is_empty() {
            return Err(Error::DuplicateIndex(table_name.to_string(), index_name.to_string()));
        }
        let mut row = Row::new();
        row.insert("table_name", Value::Text(table_name.to_string()));
        row.insert("index_name", Value::Text(index_name.to_string()));
        row.insert("seq_in_index", Value::Int(seq_in_index));
        row.insert("column_name", Value::Text(column_name.to_string()));
        row.insert("index_type", Value::Text(index_type.to_string()));
        row.insert("is_unique", Value::Boolean(is_unique));
        self.indices.insert(&row)
    }

    fn load_schema(&mut self, table_name: &str) -> Result<Schema> {
        let predicate = single("table_name", Value::Text(table_name.to_string()));
        let rows = self.columns.select(Some(&predicate))?;
        if rows.is_empty() {
            return Err(Error::UnknownTable(table_name.to_string()));
        }
        let mut attrs = Vec::new();
        for (_, row) in rows {
            let column_name = text_field(&row, "column_name")?;
            let data_type = text_field(&row, "data_type")?;
            let column_type = ColumnType::parse_catalog(&data_type)
                .ok_or_else(|| Error::UnsupportedType(data_type.clone()))?;
            attrs.push(Attribute::new(&column_name, column_type));
        }
        Ok(Schema::new(attrs))
    }

    /// Look up a relation by name, opening and caching it on first use.
    pub fn get_table(&mut self, name: &str) -> Result<&mut Relation> {
        if !self.table_cache.contains_key(name) {
            let schema = self.load_schema(name)?;
            let mut relation = Relation::new(&self.config, name, schema);
            relation.open()?;
            self.table_cache.insert(name.to_string(), relation);
        }
        Ok(self.table_cache.get_mut(name).unwrap())
    }

    pub fn table_exists(&mut self, name: &str) -> Result<bool> {
        let predicate = single("table_name", Value::Text(name.to_string()));
        Ok(!self.tables.select(Some(&predicate))?.is_empty())
    }

    /// `CREATE TABLE`: insert the `_tables`/`_columns` rows, then create the physical relation.
    /// Any failure compensates by deleting whatever catalog rows were already inserted.
    pub fn create_table(&mut self, name: &str, columns: &[ColumnDef]) -> Result<()> {
        for column in columns {
            if ColumnType::parse(column.column_type.name()).is_none() {
                return Err(Error::UnsupportedType(column.column_type.name().to_string()));
            }
        }
        let t_handle = self.insert_table_row(name)?;
        let mut c_handles = Vec::new();
        for column in columns {
            match self.insert_column_row(name, &column.name, column.column_type.name()) {
                Ok(handle) => c_handles.push(handle),
                Err(err) => {
                    self.rollback_column_rows(&c_handles);
                    self.rollback_table_row(t_handle);
                    return Err(err);
                }
            }
        }
        let schema = Schema::new(
            columns
                .iter()
                .map(|c| Attribute::new(&c.name, c.column_type))
                .collect(),
        );
        let mut relation = Relation::new(&self.config, name, schema);
        match relation.create() {
            Ok(()) => {
                self.table_cache.insert(name.to_string(), relation);
                Ok(())
            }
            Err(err) => {
                self.rollback_column_rows(&c_handles);
                self.rollback_table_row(t_handle);
                Err(err)
            }
        }
    }

    fn rollback_column_rows(&mut self, handles: &[Handle]) {
        for &handle in handles {
            if let Err(err) = self.columns.delete(handle) {
                warn!("rollback: failed to delete compensating _columns row: {err}");
            }
        }
    }

    fn rollback_table_row(&mut self, handle: Handle) {
        if let Err(err) = self.tables.delete(handle) {
            warn!("rollback: failed to delete compensating _tables row: {err}");
        }
    }

    /// `DROP TABLE`: drop every index on the table, delete its `_columns` rows, remove the
    /// physical file, then delete its `_tables` row.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        if is_catalog_table(name) {
            return Err(Error::CannotDropSchema(name.to_string()));
        }
        if !self.table_exists(name)? {
            return Err(Error::UnknownTable(name.to_string()));
        }

        let predicate = single("table_name", Value::Text(name.to_string()));
        let index_rows = self.indices.select(Some(&predicate))?;
        let mut index_names = Vec::new();
        for (_, row) in &index_rows {
            let index_name = text_field(row, "index_name")?;
            if !index_names.contains(&index_name) {
                index_names.push(index_name);
            }
        }
        for index_name in index_names {
            self.drop_index(name, &index_name)?;
        }

        let column_rows = self.columns.select(Some(&predicate))?;
        for (handle, _) in column_rows {
            self.columns.delete(handle)?;
        }

        if let Some(mut relation) = self.table_cache.remove(name) {
            relation.drop_file()?;
        } else {
            let mut relation = Relation::new(&self.config, name, Schema::new(Vec::new()));
            relation.open()?;
            relation.drop_file()?;
        }

        let table_rows = self.tables.select(Some(&predicate))?;
        for (handle, _) in table_rows {
            self.tables.delete(handle)?;
        }
        debug!("dropped table `{name}`");
        Ok(())
    }

    /// `CREATE INDEX`: validate the key columns, insert `_indices` rows, then instantiate and
    /// `create()` the (stub) index object.
    pub fn create_index(
        &mut self,
        table: &str,
        index_name: &str,
        columns: &[String],
        index_type: &str,
    ) -> Result<()> {
        {
            let relation = self.get_table(table)?;
            for column in columns {
                if !relation.schema().contains(column) {
                    return Err(Error::UnknownColumn(column.clone()));
                }
            }
        }
        let is_unique = index_type.eq_ignore_ascii_case("BTREE");
        let mut handles = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            match self.insert_index_row(table, index_name, (i + 1) as i32, column, index_type, is_unique) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    for handle in handles {
                        let _ = self.indices.delete(handle);
                    }
                    return Err(err);
                }
            }
        }

        let meta = IndexMeta::new(table, index_name, columns.to_vec(), is_unique);
        let mut index: Box<dyn Index> = if index_type.eq_ignore_ascii_case("HASH") {
            Box::new(HashIndex::new(meta))
        } else {
            Box::new(BtreeIndex::new(meta))
        };
        match index.create() {
            Ok(()) => {
                self.index_cache
                    .insert((table.to_string(), index_name.to_string()), index);
                Ok(())
            }
            Err(err) => {
                for handle in handles {
                    let _ = self.indices.delete(handle);
                }
                Err(err)
            }
        }
    }

    /// `DROP INDEX`: `drop()` the (stub) index object, then delete its `_indices` rows.
    pub fn drop_index(&mut self, table: &str, index_name: &str) -> Result<()> {
        let key = (table.to_string(), index_name.to_string());
        if let Some(mut index) = self.index_cache.remove(&key) {
            index.drop_index()?;
        }
        let mut predicate = ValueDict::new();
        predicate.insert("table_name".to_string(), Value::Text(table.to_string()));
        predicate.insert("index_name".to_string(), Value::Text(index_name.to_string()));
        let rows = self.indices.select(Some(&predicate))?;
        for (handle, _) in rows {
            self.indices.delete(handle)?;
        }
        Ok(())
    }

    /// Every distinct index name declared on `table`, in no particular order.
    pub fn indexes_on(&mut self, table: &str) -> Result<Vec<String>> {
        let predicate = single("table_name", Value::Text(table.to_string()));
        let rows = self.indices.select(Some(&predicate))?;
        let mut names = Vec::new();
        for (_, row) in rows {
            let index_name = text_field(&row, "index_name")?;
            if !names.contains(&index_name) {
                names.push(index_name);
            }
        }
        Ok(names)
    }

    /// Look up an index object by `(table, index_name)`, constructing it lazily from `_indices`
    /// metadata on first use.
    pub fn get_index(&mut self, table: &str, index_name: &str) -> Result<&mut Box<dyn Index>> {
        let key = (table.to_string(), index_name.to_string());
        if !self.index_cache.contains_key(&key) {
            let mut predicate = ValueDict::new();
            predicate.insert("table_name".to_string(), Value::Text(table.to_string()));
            predicate.insert("index_name".to_string(), Value::Text(index_name.to_string()));
            let mut rows = self.indices.select(Some(&predicate))?;
            if rows.is_empty() {
                return Err(Error::UnknownIndex(table.to_string(), index_name.to_string()));
            }
            rows.sort_by_key(|(_, row)| match row.get("seq_in_index") {
                Some(Value::Int(n)) => *n,
                _ => 0,
            });
            let mut columns = Vec::new();
            let mut index_type = String::new();
            let mut is_unique = false;
            for (_, row) in &rows {
                columns.push(text_field(row, "column_name")?);
                index_type = text_field(row, "index_type")?;
                if let Some(Value::Boolean(u)) = row.get("is_unique") {
                    is_unique = *u;
                }
            }
            let meta = IndexMeta::new(table, index_name, columns, is_unique);
            let mut index: Box<dyn Index> = if index_type.eq_ignore_ascii_case("HASH") {
                Box::new(HashIndex::new(meta))
            } else {
                Box::new(BtreeIndex::new(meta))
            };
            index.open()?;
            self.index_cache.insert(key.clone(), index);
        }
        Ok(self.index_cache.get_mut(&key).unwrap())
    }

    pub fn show_tables(&mut self) -> Result<Vec<Row>> {
        let rows = self.tables.select(None)?;
        rows.into_iter()
            .filter_map(|(_, row)| {
                let name = match row.get("table_name") {
                    Some(Value::Text(s)) => s.clone(),
                    _ => return Some(Err(Error::UnknownColumn("table_name".to_string()))),
                };
                if is_catalog_table(&name) {
                    None
                } else {
                    Some(Ok(row))
                }
            })
            .collect()
    }

    pub fn show_columns(&mut self, table: &str) -> Result<Vec<Row>> {
        let predicate = single("table_name", Value::Text(table.to_string()));
        Ok(self
            .columns
            .select(Some(&predicate))?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }

    pub fn show_index(&mut self, table: &str) -> Result<Vec<Row>> {
        let predicate = single("table_name", Value::Text(table.to_string()));
        Ok(self
            .indices
            .select(Some(&predicate))?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }
}

fn text_field(row: &Row, column: &str) -> Result<String> {
    match row.get(column) {
        Some(Value::Text(s)) => Ok(s.clone()),
        _ => Err(Error::UnknownColumn(column.to_string())),
    }
}
