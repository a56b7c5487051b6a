/*
 * Copyright (c) 2020 - 2026.  Shoal DB contributors.
 * Please refer to the project README for more information about this project and its license.
 */

//! A schema is the ordered list of a relation's columns. Declared order is load-bearing: it is
//! both the on-disk marshalling order and the order `_columns` rows are expected to come back in.

use crate::relation::attribute::Attribute;

#[derive(Clone, Debug)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.attributes.as_slice()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.attributes.iter().map(Attribute::name).collect()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
