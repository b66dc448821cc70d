//! Attribute value tree assembly.
//!
//! Turns the flat `(id, value, parent_id)` rows of one attribute into the
//! nested [`OptionNode`] forest returned to clients.
//!
//! ## Ordering
//!
//! Roots keep the order in which they appear in the input, and so do the
//! children of any given parent. Nothing is sorted: storage order is the
//! presentation order.
//!
//! ## Input contract
//!
//! Callers pass the complete value set of one attribute. A row whose
//! `parent_id` matches no row is an orphan and does not appear in the output.
//! Ids are expected to be unique (they are the primary key in storage); with
//! unique ids every node reachable from a root has a finite ancestor chain, so
//! the recursion terminates even if the dataset contains a detached cycle.

use std::collections::HashMap;

use crate::models::{AttributeValue, OptionNode};

/// Assemble the forest of option nodes for one attribute's value rows.
pub fn assemble(rows: &[AttributeValue]) -> Vec<OptionNode> {
    let mut children_of: HashMap<i64, Vec<&AttributeValue>> = HashMap::new();
    for row in rows {
        if let Some(parent_id) = row.parent_id {
            children_of.entry(parent_id).or_default().push(row);
        }
    }

    rows.iter()
        .filter(|row| row.parent_id.is_none())
        .map(|root| build_node(root, &children_of))
        .collect()
}

fn build_node(row: &AttributeValue, children_of: &HashMap<i64, Vec<&AttributeValue>>) -> OptionNode {
    let children = children_of
        .get(&row.id)
        .map(|kids| {
            kids.iter()
                .map(|child| build_node(child, children_of))
                .collect()
        })
        .unwrap_or_default();

    OptionNode {
        option_id: row.id,
        option_value: row.value.clone(),
        children,
    }
}
