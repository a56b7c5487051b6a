/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

pub mod attribute;
pub mod record;
pub mod relation;
pub mod schema;
pub mod types;

pub use attribute::Attribute;
pub use record::{Handle, Row};
pub use relation::Relation;
pub use schema::Schema;
pub use types::{ColumnType, Value, ValueDict};
