/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! The abstract statement tree the executor consumes. Parsing SQL text into these types is out
//! of scope for this crate; callers build them directly.

use crate::relation::types::ColumnType;

/// A literal value appearing in an `INSERT` values list or a `WHERE` clause. Only integers and
/// strings are accepted; `Unsupported` stands in for any other kind a parser might produce
/// (floats, `NULL`, ...) and is rejected with `UnsupportedLiteral` at execution time.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i32),
    Text(String),
    Unsupported,
}

/// One declared column in a `CREATE TABLE` statement.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
        }
    }
}

/// The reduced shape of a `WHERE` clause this executor accepts: an equality, or a conjunction of
/// two sub-clauses. Any other shape a parser might produce — `OR`, comparisons other than `=`,
/// nested function calls — has no representation of its own here and is folded into
/// `Unsupported`, which produces `UnsupportedPredicate` once translated.
#[derive(Clone, Debug, PartialEq)]
pub enum WhereClause {
    Equals { column: String, literal: Literal },
    And(Box<WhereClause>, Box<WhereClause>),
    Unsupported,
}

/// The column list of a `SELECT`: either `*` or an explicit, ordered list of column names.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectList {
    Star,
    Columns(Vec<String>),
}

/// One parsed DDL or DML statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
    },
    CreateIndex {
        table: String,
        index_name: String,
        columns: Vec<String>,
        index_type: String,
    },
    DropTable {
        table: String,
    },
    DropIndex {
        table: String,
        index_name: String,
    },
    ShowTables,
    ShowColumns {
        table: String,
    },
    ShowIndex {
        table: String,
    },
    Insert {
        table: String,
        columns: Option<Vec<String>>,
        values: Vec<Literal>,
    },
    Delete {
        table: String,
        where_clause: Option<WhereClause>,
    },
    Select {
        table: String,
        select_list: SelectList,
        where_clause: Option<WhereClause>,
    },
}
