//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

/// Open set of extra item attributes (everything besides `id` and `parent`).
pub type Attributes = BTreeMap<String, Value>;

/// Item identity: a number or a string, compared by value.
///
/// `Num(1)` and `Str("1")` are different ids. Numeric ids are integers; a
/// fractional number such as `1.5` matches neither variant and fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Num(i64),
    Str(String),
}

impl ItemId {
    /// An empty string id counts as "no id".
    pub fn is_empty(&self) -> bool {
        matches!(self, ItemId::Str(s) if s.is_empty())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Num(n) => write!(f, "{}", n),
            ItemId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Integer-looking input becomes `Num`, everything else `Str`.
impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(ItemId::Num)
            .unwrap_or_else(|_| ItemId::Str(s.to_string())))
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Num(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        ItemId::Num(n.into())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Str(s)
    }
}

/// Parent reference of an item: either the root of the forest or another item.
///
/// On the wire `Root` is `null` (or an absent field).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<ItemId>", into = "Option<ItemId>")]
pub enum ParentId {
    #[default]
    Root,
    Item(ItemId),
}

impl ParentId {
    pub fn is_root(&self) -> bool {
        matches!(self, ParentId::Root)
    }

    pub fn as_item(&self) -> Option<&ItemId> {
        match self {
            ParentId::Root => None,
            ParentId::Item(id) => Some(id),
        }
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentId::Root => write!(f, "<root>"),
            ParentId::Item(id) => write!(f, "{}", id),
        }
    }
}

impl From<Option<ItemId>> for ParentId {
    fn from(parent: Option<ItemId>) -> Self {
        parent.map(ParentId::Item).unwrap_or(ParentId::Root)
    }
}

impl From<ParentId> for Option<ItemId> {
    fn from(parent: ParentId) -> Self {
        match parent {
            ParentId::Root => None,
            ParentId::Item(id) => Some(id),
        }
    }
}

impl From<ItemId> for ParentId {
    fn from(id: ItemId) -> Self {
        ParentId::Item(id)
    }
}

/// A stored record: identity, parent link and free-form attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeItem<A = Attributes> {
    pub id: ItemId,
    #[serde(default)]
    pub parent: ParentId,
    #[serde(flatten)]
    pub attributes: A,
}

impl<A: Default> TreeItem<A> {
    pub fn new(id: impl Into<ItemId>, parent: impl Into<ParentId>) -> Self {
        Self::with_attributes(id, parent, A::default())
    }
}

impl<A> TreeItem<A> {
    pub fn with_attributes(id: impl Into<ItemId>, parent: impl Into<ParentId>, attributes: A) -> Self {
        Self {
            id: id.into(),
            parent: parent.into(),
            attributes,
        }
    }
}

impl TreeItem<Attributes> {
    /// Root or child item carrying a `label` attribute.
    pub fn labeled(id: impl Into<ItemId>, parent: impl Into<ParentId>, label: &str) -> Self {
        Self::new(id, parent).with_attr("label", label)
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

/// Read access to the display label of an item's attributes.
pub trait ItemAttributes {
    /// Label stored under `key`, `None` if absent or empty.
    ///
    /// Numbers and booleans are stringified.
    fn label(&self, key: &str) -> Option<String>;
}

impl ItemAttributes for Attributes {
    fn label(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl ItemAttributes for () {
    fn label(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Input record as found in item files; `id` may be missing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub parent: Option<ItemId>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl TryFrom<RawItem> for TreeItem<Attributes> {
    type Error = DomainError;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        match raw.id {
            Some(id) if !id.is_empty() => Ok(TreeItem {
                id,
                parent: raw.parent.into(),
                attributes: raw.attributes,
            }),
            _ => Err(DomainError::MissingId),
        }
    }
}

/// Row kind in the flattened grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    /// Node with at least one direct child
    Group,
    /// Leaf node
    Item,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Group => write!(f, "Group"),
            Category::Item => write!(f, "Item"),
        }
    }
}

/// One display row of the flattened forest.
///
/// Rows are produced fresh per flattening call and carry no link back to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub id: ItemId,
    pub category: Category,
    pub label: String,
    /// Stringified ids from the root down to this row, inclusive
    pub path: Vec<String>,
    /// 0-based depth
    pub level: usize,
    pub has_children: bool,
    /// 1-based position in the whole output
    pub row_number: usize,
}
