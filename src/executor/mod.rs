/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! Dispatches one parsed [`Statement`] to its handler, wrapping any underlying [`Error`] together
//! with the offending statement in [`ExecError`].

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::IndexMeta;
use crate::plan::{evaluate, PlanNode};
use crate::relation::{Relation, Row, Value, ValueDict};
use crate::relation::types::intersect_value_dicts;
use crate::statement::{Literal, SelectList, Statement, WhereClause};
use thiserror::Error;

/// An `Error` raised while executing a specific statement.
#[derive(Error, Debug)]
#[error("error executing `{stmt}`: {source}")]
pub struct ExecError {
    pub stmt: String,
    #[source]
    pub source: Error,
}

/// The outcome of executing one statement.
#[derive(Debug, PartialEq)]
pub enum ExecResult {
    Message(String),
    Rows(Vec<Row>),
    DeletedCount(usize),
}

pub struct Executor {
    catalog: Catalog,
}

impl Executor {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            catalog: Catalog::new(config)?,
        })
    }

    pub fn execute(&mut self, statement: &Statement) -> std::result::Result<ExecResult, ExecError> {
        self.dispatch(statement).map_err(|source| ExecError {
            stmt: format!("{statement:?}"),
            source,
        })
    }

    fn dispatch(&mut self, statement: &Statement) -> Result<ExecResult> {
        match statement {
            Statement::CreateTable { table, columns } => {
                self.catalog.create_table(table, columns)?;
                Ok(ExecResult::Message(format!("created {table}")))
            }
            Statement::CreateIndex {
                table,
                index_name,
                columns,
                index_type,
            } => {
                self.catalog
                    .create_index(table, index_name, columns, index_type)?;
                Ok(ExecResult::Message(format!("created index {index_name}")))
            }
            Statement::DropTable { table } => {
                self.catalog.drop_table(table)?;
                Ok(ExecResult::Message(format!("dropped {table}")))
            }
            Statement::DropIndex { table, index_name } => {
                self.catalog.drop_index(table, index_name)?;
                Ok(ExecResult::Message(format!("dropped index {index_name}")))
            }
            Statement::ShowTables => Ok(ExecResult::Rows(self.catalog.show_tables()?)),
            Statement::ShowColumns { table } => {
                Ok(ExecResult::Rows(self.catalog.show_columns(table)?))
            }
            Statement::ShowIndex { table } => Ok(ExecResult::Rows(self.catalog.show_index(table)?)),
            Statement::Insert {
                table,
                columns,
                values,
            } => self.execute_insert(table, columns.as_deref(), values),
            Statement::Delete { table, where_clause } => {
                self.execute_delete(table, where_clause.as_ref())
            }
            Statement::Select {
                table,
                select_list,
                where_clause,
            } => self.execute_select(table, select_list, where_clause.as_ref()),
        }
    }

    fn execute_insert(
        &mut self,
        table: &str,
        columns: Option<&[String]>,
        values: &[Literal],
    ) -> Result<ExecResult> {
        let (handle, row) = {
            let relation = self.catalog.get_table(table)?;
            let row = build_insert_row(relation, columns, values)?;
            let handle = relation.insert(&row)?;
            (handle, row)
        };
        for index_name in self.catalog.indexes_on(table)? {
            let index = self.catalog.get_index(table, &index_name)?;
            let key = index_key(index.meta(), &row)?;
            index.insert(&key, handle)?;
        }
        Ok(ExecResult::Message(format!("inserted into {table}")))
    }

    fn execute_delete(&mut self, table: &str, where_clause: Option<&WhereClause>) -> Result<ExecResult> {
        let predicate = where_clause.map(where_to_value_dict).transpose()?;
        let index_names = self.catalog.indexes_on(table)?;
        let matches = {
            let relation = self.catalog.get_table(table)?;
            let mut plan = PlanNode::scan();
            if let Some(p) = predicate {
                plan = plan.select(p);
            }
            evaluate(&plan, relation)?
        };
        let mut count = 0;
        for (handle, row) in &matches {
            for index_name in &index_names {
                let index = self.catalog.get_index(table, index_name)?;
                let key = index_key(index.meta(), row)?;
                index.del(&key, *handle)?;
            }
            let relation = self.catalog.get_table(table)?;
            relation.delete(*handle)?;
            count += 1;
        }
        Ok(ExecResult::DeletedCount(count))
    }

    fn execute_select(
        &mut self,
        table: &str,
        select_list: &SelectList,
        where_clause: Option<&WhereClause>,
    ) -> Result<ExecResult> {
        let predicate = where_clause.map(where_to_value_dict).transpose()?;
        let columns = match select_list {
            SelectList::Star => None,
            SelectList::Columns(cols) => Some(cols.clone()),
        };
        let relation = self.catalog.get_table(table)?;
        let mut plan = PlanNode::scan();
        if let Some(p) = predicate {
            plan = plan.select(p);
        }
        plan = plan.project(columns);
        let rows = evaluate(&plan, relation)?;
        Ok(ExecResult::Rows(rows.into_iter().map(|(_, row)| row).collect()))
    }
}

fn build_insert_row(relation: &Relation, columns: Option<&[String]>, values: &[Literal]) -> Result<Row> {
    let mut row = Row::new();
    match columns {
        Some(cols) => {
            for (col, lit) in cols.iter().zip(values) {
                row.insert(col.clone(), literal_to_value(lit)?);
            }
        }
        None => {
            let names = relation.schema().column_names();
            if names.len() != values.len() {
                return Err(Error::ColumnCountMismatch {
                    table: relation.name().to_string(),
                    expected: names.len(),
                    got: values.len(),
                });
            }
            for (name, lit) in names.into_iter().zip(values) {
                row.insert(name.to_string(), literal_to_value(lit)?);
            }
        }
    }
    Ok(row)
}

fn index_key(meta: &IndexMeta, row: &Row) -> Result<Vec<Value>> {
    meta.columns
        .iter()
        .map(|c| row.get(c).cloned().ok_or_else(|| Error::UnknownColumn(c.clone())))
        .collect()
}

fn literal_to_value(literal: &Literal) -> Result<Value> {
    match literal {
        Literal::Int(v) => Ok(Value::Int(*v)),
        Literal::Text(s) => Ok(Value::Text(s.clone())),
        Literal::Unsupported => Err(Error::UnsupportedLiteral),
    }
}

/// Reduce a `WHERE` clause to a conjunction of column->literal equalities. Equality and `AND`
/// translate directly; any shape a parser folded into `Unsupported` is rejected here.
fn where_to_value_dict(where_clause: &WhereClause) -> Result<ValueDict> {
    match where_clause {
        WhereClause::Equals { column, literal } => {
            let mut dict = ValueDict::new();
            dict.insert(column.clone(), literal_to_value(literal)?);
            Ok(dict)
        }
        WhereClause::And(left, right) => {
            let left = where_to_value_dict(left)?;
            let right = where_to_value_dict(right)?;
            Ok(intersect_value_dicts(&left, &right))
        }
        WhereClause::Unsupported => Err(Error::UnsupportedPredicate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::ColumnDef;
    use crate::relation::types::ColumnType;

    fn executor(dir: &std::path::Path) -> Executor {
        Executor::new(&Config::new(dir)).unwrap()
    }

    fn create_t(executor: &mut Executor) {
        executor
            .execute(&Statement::CreateTable {
                table: "t".to_string(),
                columns: vec![
                    ColumnDef::new("a", ColumnType::Int),
                    ColumnDef::new("b", ColumnType::Text),
                ],
            })
            .unwrap();
    }

    #[test]
    fn create_table_reports_created_and_registers_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        let result = executor
            .execute(&Statement::CreateTable {
                table: "foo".to_string(),
                columns: vec![
                    ColumnDef::new("a", ColumnType::Int),
                    ColumnDef::new("b", ColumnType::Text),
                ],
            })
            .unwrap();
        assert_eq!(result, ExecResult::Message("created foo".to_string()));

        let tables = executor.execute(&Statement::ShowTables).unwrap();
        match tables {
            ExecResult::Rows(rows) => assert_eq!(rows.len(), 1),
            other => panic!("unexpected {other:?}"),
        }

        let columns = executor
            .execute(&Statement::ShowColumns {
                table: "foo".to_string(),
            })
            .unwrap();
        match columns {
            ExecResult::Rows(rows) => assert_eq!(rows.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_create_table_fails_and_state_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        create_t(&mut executor);
        assert!(executor
            .execute(&Statement::CreateTable {
                table: "t".to_string(),
                columns: vec![ColumnDef::new("a", ColumnType::Int)],
            })
            .is_err());
        let columns = executor
            .execute(&Statement::ShowColumns {
                table: "t".to_string(),
            })
            .unwrap();
        match columns {
            ExecResult::Rows(rows) => assert_eq!(rows.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn insert_then_select_round_trips_a_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        create_t(&mut executor);
        executor
            .execute(&Statement::Insert {
                table: "t".to_string(),
                columns: None,
                values: vec![Literal::Int(12), Literal::Text("Hello!".to_string())],
            })
            .unwrap();

        let result = executor
            .execute(&Statement::Select {
                table: "t".to_string(),
                select_list: SelectList::Columns(vec!["a".to_string(), "b".to_string()]),
                where_clause: None,
            })
            .unwrap();
        match result {
            ExecResult::Rows(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].get("a"), Some(&Value::Int(12)));
                assert_eq!(rows[0].get("b"), Some(&Value::Text("Hello!".to_string())));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn create_index_then_show_index_then_drop_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        create_t(&mut executor);
        executor
            .execute(&Statement::CreateIndex {
                table: "t".to_string(),
                index_name: "fx".to_string(),
                columns: vec!["a".to_string()],
                index_type: "BTREE".to_string(),
            })
            .unwrap();
        let shown = executor
            .execute(&Statement::ShowIndex {
                table: "t".to_string(),
            })
            .unwrap();
        match shown {
            ExecResult::Rows(rows) => assert_eq!(rows.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
        executor
            .execute(&Statement::DropIndex {
                table: "t".to_string(),
                index_name: "fx".to_string(),
            })
            .unwrap();
        let shown = executor
            .execute(&Statement::ShowIndex {
                table: "t".to_string(),
            })
            .unwrap();
        assert_eq!(shown, ExecResult::Rows(Vec::new()));
    }

    #[test]
    fn delete_with_predicate_removes_matching_rows_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        create_t(&mut executor);
        for (a, b) in [(1, "x"), (2, "y")] {
            executor
                .execute(&Statement::Insert {
                    table: "t".to_string(),
                    columns: None,
                    values: vec![Literal::Int(a), Literal::Text(b.to_string())],
                })
                .unwrap();
        }
        let result = executor
            .execute(&Statement::Delete {
                table: "t".to_string(),
                where_clause: Some(WhereClause::Equals {
                    column: "a".to_string(),
                    literal: Literal::Int(1),
                }),
            })
            .unwrap();
        assert_eq!(result, ExecResult::DeletedCount(1));

        let remaining = executor
            .execute(&Statement::Select {
                table: "t".to_string(),
                select_list: SelectList::Star,
                where_clause: None,
            })
            .unwrap();
        match remaining {
            ExecResult::Rows(rows) => assert_eq!(rows.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unsupported_where_clause_shape_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        create_t(&mut executor);
        let result = executor.execute(&Statement::Delete {
            table: "t".to_string(),
            where_clause: Some(WhereClause::Unsupported),
        });
        assert!(result.is_err());
    }

    #[test]
    fn insert_with_wrong_number_of_values_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        create_t(&mut executor);
        let result = executor.execute(&Statement::Insert {
            table: "t".to_string(),
            columns: None,
            values: vec![Literal::Int(1)],
        });
        assert!(result.is_err());
    }

    #[test]
    fn unsupported_literal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        create_t(&mut executor);
        let result = executor.execute(&Statement::Insert {
            table: "t".to_string(),
            columns: None,
            values: vec![Literal::Int(1), Literal::Unsupported],
        });
        assert!(result.is_err());
    }

    #[test]
    fn drop_table_t_fails_with_cannot_drop_schema() {
        let dir = tempfile::tempdir().unwrap();
        let mut executor = executor(dir.path());
        let result = executor.execute(&Statement::DropTable {
            table: "_tables".to_string(),
        });
        assert!(result.is_err());
    }
}
