pub mod normalize;
pub mod hierarchy;
pub mod filter;
pub mod manager;

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::{Map, Value};

/// One raw spreadsheet row: column name → cell value.
pub type RawRow = Map<String, Value>;

pub const ID_FIELD: &str = "Id";
pub const MANAGER_ID_FIELD: &str = "ManagerId";
pub const COMPANY_FIELD: &str = "Company";

/// Stable identity of a record within one load: its position in the input rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub usize);

/// A normalized employee row.
///
/// `id` and `manager_id` hold the trimmed identifier text; every raw column
/// (including the raw `Id`/`ManagerId` cells) is kept untouched in
/// `fields`, in source column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub row: usize,
    pub id: Option<String>,
    pub manager_id: Option<String>,
    pub fields: RawRow,
}

impl EmployeeRecord {
    pub fn key(&self) -> NodeKey {
        NodeKey(self.row)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn manager_id(&self) -> Option<&str> {
        self.manager_id.as_deref()
    }

    /// Manager identifier usable as a lookup key (present and non-empty).
    pub fn manager_ref(&self) -> Option<&str> {
        self.manager_id().filter(|m| !m.is_empty())
    }

    /// Any column rendered as text. `null` and missing columns are `None`.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.fields.get(name).and_then(value_text)
    }

    pub fn company(&self) -> Option<Cow<'_, str>> {
        self.field(COMPANY_FIELD)
    }

    pub fn name(&self) -> Option<Cow<'_, str>> {
        self.field("Name")
    }

    pub fn position(&self) -> Option<Cow<'_, str>> {
        self.field("Position")
    }

    pub fn department(&self) -> Option<Cow<'_, str>> {
        self.field("Department")
    }

    pub fn mobile(&self) -> Option<Cow<'_, str>> {
        self.field("Mobile")
    }

    pub fn email(&self) -> Option<Cow<'_, str>> {
        self.field("Email")
    }

    pub fn location(&self) -> Option<Cow<'_, str>> {
        self.field("Location")
    }

    pub fn photo(&self) -> Option<Cow<'_, str>> {
        self.field("Photo")
    }
}

/// Render a cell value as text.
///
/// Integral floats print without a fractional part so that a spreadsheet id
/// stored as `7.0` compares equal to `"7"`.
pub fn value_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Cow::Owned(i.to_string()))
            } else if let Some(u) = n.as_u64() {
                Some(Cow::Owned(u.to_string()))
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(Cow::Owned(format!("{}", f as i64)))
                } else {
                    Some(Cow::Owned(f.to_string()))
                }
            }
        }
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// A record plus the subordinates it exclusively owns, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub record: Arc<EmployeeRecord>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(record: Arc<EmployeeRecord>) -> Self {
        Self {
            record,
            children: Vec::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        self.record.key()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Count all nodes in this subtree
    pub fn node_count(&self) -> usize {
        Preorder { stack: vec![self] }.count()
    }
}

// Reporting chains can be thousands of levels deep; the derived drop glue
// would recurse once per level.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Ordered root nodes of one or more disconnected hierarchies.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forest {
    pub roots: Vec<TreeNode>,
}

impl Forest {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first pre-order walk over every node.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            stack: self.roots.iter().rev().collect(),
        }
    }
}

pub struct Preorder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
