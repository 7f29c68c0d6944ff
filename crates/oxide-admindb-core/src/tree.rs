//! Tree reconstruction from leveled rows.
//!
//! Hierarchical tables are usually read through a stored procedure that
//! returns `(id, title, level)` rows in pre-order: every parent precedes its
//! children and siblings are contiguous. [`TreeBuilder`] rebuilds the
//! hierarchy in one forward pass with an explicit ancestor stack.
//!
//! ```
//! use oxide_admindb_core::tree::{build_tree, LeveledRow};
//!
//! let root = build_tree(vec![
//!     LeveledRow::new(1, "Admin", 0),
//!     LeveledRow::new(2, "Users", 1),
//!     LeveledRow::new(3, "Groups", 1),
//! ])
//! .unwrap();
//!
//! assert_eq!(root.children.len(), 1);
//! assert_eq!(root.children[0].children.len(), 2);
//! ```

use serde::Serialize;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::value::Value;

/// A flat row carrying its depth.
#[derive(Debug, Clone, PartialEq)]
pub struct LeveledRow {
    /// Row identifier.
    pub id: Value,
    /// Display title.
    pub title: String,
    /// Depth; top-level rows carry the builder's base level.
    pub level: i64,
}

impl LeveledRow {
    /// Creates a row.
    pub fn new(id: impl Into<Value>, title: impl Into<String>, level: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
        }
    }

    /// Extracts a row from a query result.
    ///
    /// A missing or NULL title becomes the empty string; a level that is not
    /// an integer is rejected.
    pub fn from_record(record: &Record, id_field: &str, title_field: &str, level_field: &str) -> Result<Self> {
        let id = record.get(id_field).cloned().unwrap_or(Value::Null);
        let title = record
            .get(title_field)
            .map(Value::to_text)
            .unwrap_or_default();
        let level = match record.get(level_field) {
            Some(Value::Integer(level)) => *level,
            other => {
                return Err(Error::InvalidLevel {
                    id: id.to_text(),
                    level: -1,
                    reason: format!(
                        "level field '{level_field}' is {}",
                        other.map_or_else(|| String::from("missing"), Value::describe)
                    ),
                });
            }
        };
        Ok(Self { id, title, level })
    }
}

/// A node of a reconstructed tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    /// Row identifier; `0` for the synthetic root.
    pub id: Value,
    /// Display title.
    pub title: String,
    /// Children in input order, unique by id.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn root() -> Self {
        Self {
            id: Value::Integer(0),
            title: String::from("root"),
            children: Vec::new(),
        }
    }

    /// Returns the direct child with the given id.
    #[must_use]
    pub fn child(&self, id: &Value) -> Option<&Self> {
        self.children.iter().find(|c| &c.id == id)
    }

    /// Returns whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Counts all nodes below this one.
    #[must_use]
    pub fn descendants(&self) -> usize {
        self.walk().count()
    }

    /// Iterates over descendants in pre-order with their depth (`0` for
    /// direct children).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.children.iter().rev().map(|c| (0, c)).collect(),
        }
    }
}

/// Pre-order iterator returned by [`TreeNode::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

struct Slot {
    id: Value,
    title: String,
    children: Vec<usize>,
}

const ROOT: usize = 0;

/// Incremental, stack-based tree builder.
///
/// Nodes live in an index-addressed arena. `ancestors` holds the parents of
/// `parent`, so `ancestors.len()` is the relative depth of the rows being
/// attached to `parent`.
pub struct TreeBuilder {
    base_level: i64,
    slots: Vec<Slot>,
    ancestors: Vec<usize>,
    parent: usize,
    last: Option<usize>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a builder where top-level rows have level `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_level(0)
    }

    /// Creates a builder where top-level rows have level `base_level`.
    #[must_use]
    pub fn with_base_level(base_level: i64) -> Self {
        let root = TreeNode::root();
        Self {
            base_level,
            slots: vec![Slot {
                id: root.id,
                title: root.title,
                children: Vec::new(),
            }],
            ancestors: Vec::new(),
            parent: ROOT,
            last: None,
        }
    }

    /// Attaches one row.
    ///
    /// Fails with [`Error::InvalidLevel`] if the row sits above the base
    /// level or more than one level below the previous row.
    pub fn push(&mut self, row: LeveledRow) -> Result<()> {
        let invalid = |row: &LeveledRow, reason: String| Error::InvalidLevel {
            id: row.id.to_text(),
            level: row.level,
            reason,
        };

        let relative = match row.level.checked_sub(self.base_level) {
            Some(relative) if relative < 0 => {
                return Err(invalid(&row, format!("below base level {}", self.base_level)));
            }
            Some(relative) => relative,
            None => {
                return Err(invalid(
                    &row,
                    format!("out of range for base level {}", self.base_level),
                ));
            }
        };
        let Ok(relative) = usize::try_from(relative) else {
            return Err(invalid(&row, String::from("too deep")));
        };
        let depth = self.ancestors.len();

        if relative > depth {
            match self.last {
                Some(last) if relative == depth + 1 => {
                    self.ancestors.push(self.parent);
                    self.parent = last;
                }
                _ => {
                    let deepest = self.base_level + depth as i64 + i64::from(self.last.is_some());
                    return Err(invalid(&row, format!("skips a level (deepest allowed is {deepest})")));
                }
            }
        } else {
            while self.ancestors.len() > relative {
                if let Some(ancestor) = self.ancestors.pop() {
                    self.parent = ancestor;
                }
            }
        }

        let existing = self.slots[self.parent]
            .children
            .iter()
            .position(|&c| self.slots[c].id == row.id);

        let index = self.slots.len();
        self.slots.push(Slot {
            id: row.id,
            title: row.title,
            children: Vec::new(),
        });

        let siblings = &mut self.slots[self.parent].children;
        match existing {
            Some(pos) => siblings[pos] = index,
            None => siblings.push(index),
        }

        self.last = Some(index);
        Ok(())
    }

    /// Finishes the scan and returns the synthetic root.
    #[must_use]
    pub fn finish(self) -> TreeNode {
        let mut built: Vec<Option<TreeNode>> = Vec::with_capacity(self.slots.len());
        built.resize_with(self.slots.len(), || None);

        // Children always have higher indices than their parent, so a
        // reverse sweep assembles every subtree before its parent.
        for (index, slot) in self.slots.into_iter().enumerate().rev() {
            let children = slot
                .children
                .iter()
                .filter_map(|&c| built[c].take())
                .collect();
            built[index] = Some(TreeNode {
                id: slot.id,
                title: slot.title,
                children,
            });
        }

        built
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(TreeNode::root)
    }
}

/// Builds a tree from rows with top-level level `0`.
pub fn build_tree<I>(rows: I) -> Result<TreeNode>
where
    I: IntoIterator<Item = LeveledRow>,
{
    build_tree_from(rows, 0)
}

/// Builds a tree from rows whose top-level rows carry `base_level`.
pub fn build_tree_from<I>(rows: I, base_level: i64) -> Result<TreeNode>
where
    I: IntoIterator<Item = LeveledRow>,
{
    let mut builder = TreeBuilder::with_base_level(base_level);
    for row in rows {
        builder.push(row)?;
    }
    Ok(builder.finish())
}
