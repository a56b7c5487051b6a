/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! A minimal query plan: a tree of scan/selection/projection nodes, evaluated eagerly into a
//! materialized row set. There is no cost-based optimizer; the only "optimization" is that a
//! missing `WHERE` or column list collapses to a no-op node.

use crate::error::Result;
use crate::relation::record::{Handle, Row};
use crate::relation::relation::Relation;
use crate::relation::types::ValueDict;

/// One node of a query plan. Built bottom-up by the executor from a statement's `WHERE` and
/// column list, then evaluated top-down.
pub enum PlanNode {
    /// Every live row in a relation.
    TableScan,
    /// Rows from `input` whose values satisfy `predicate`.
    Selection {
        input: Box<PlanNode>,
        predicate: ValueDict,
    },
    /// Rows from `input`, restricted to `columns` (in that order). `None` keeps every column.
    Project {
        input: Box<PlanNode>,
        columns: Option<Vec<String>>,
    },
}

impl PlanNode {
    pub fn scan() -> Self {
        PlanNode::TableScan
    }

    pub fn select(self, predicate: ValueDict) -> Self {
        PlanNode::Selection {
            input: Box::new(self),
            predicate,
        }
    }

    pub fn project(self, columns: Option<Vec<String>>) -> Self {
        PlanNode::Project {
            input: Box::new(self),
            columns,
        }
    }
}

/// Evaluate a plan against `relation`, returning the materialized `(handle, row)` pairs.
pub fn evaluate(node: &PlanNode, relation: &mut Relation) -> Result<Vec<(Handle, Row)>> {
    match node {
        PlanNode::TableScan => relation.select(None),
        PlanNode::Selection { input, predicate } => {
            let rows = evaluate(input, relation)?;
            Ok(rows
                .into_iter()
                .filter(|(_, row)| {
                    predicate
                        .iter()
                        .all(|(col, value)| row.get(col) == Some(value))
                })
                .collect())
        }
        PlanNode::Project { input, columns } => {
            let rows = evaluate(input, relation)?;
            rows.into_iter()
                .map(|(handle, row)| {
                    let projected = relation.project(&row, columns.as_deref())?;
                    Ok((handle, projected))
                })
                .collect()
        }
    }
}
