/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

use crate::relation::types::ColumnType;

/// Describes a single column: its name and declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    column_type: ColumnType,
}

impl Attribute {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
}
