use log::trace;

use crate::model::{Row, TreeItem};

/// Flatten a task hierarchy into table rows, depth first.
///
/// Each item is followed by its descendants one level deeper. Collapsed
/// items are listed without their descendants. Walks an explicit stack, so
/// arbitrarily deep trees cannot exhaust the call stack.
pub fn flatten(items: &[TreeItem], base_depth: u32) -> Vec<Row> {
    let mut rows = Vec::with_capacity(items.len());
    let mut stack: Vec<(&TreeItem, u32)> = items.iter().rev().map(|i| (i, base_depth)).collect();

    while let Some((item, depth)) = stack.pop() {
        rows.push(Row {
            depth,
            values: item.values.clone(),
        });
        if item.expanded {
            let child_depth = depth.saturating_add(1);
            stack.extend(item.children.iter().rev().map(|c| (c, child_depth)));
        }
    }

    trace!("flattened {} top-level items into {} rows", items.len(), rows.len());
    rows
}
