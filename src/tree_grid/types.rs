use std::fmt;

/// Globally unique, immutable identifier of one item in the forest.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The domain payload carried by every node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DataItem {
    pub id: ItemId,
    pub label: String,
    pub count: u32,
    pub description: String,
    pub tags: Vec<String>,
    /// Free-form item type, shown in the `type` column.
    pub kind: String,
    pub source: String,
    pub long_description: String,
    pub location: String,
}

impl DataItem {
    /// An item with only an id and a label; everything else empty.
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }
}

/// One node projected for the grid: the item plus the ids from a root down to itself.
#[derive(Clone, Debug, PartialEq)]
pub struct DataItemRow {
    pub item: DataItem,
    pub path: Vec<ItemId>,
}

impl DataItemRow {
    pub fn id(&self) -> &ItemId {
        &self.item.id
    }

    /// Zero for roots.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Ancestor ids, root first, excluding this row.
    pub fn ancestors(&self) -> &[ItemId] {
        &self.path[..self.depth()]
    }
}

/// Where a dragged row lands relative to the row under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DropLocation {
    /// Become the last child of the target.
    Into,
    /// Become the previous sibling of the target.
    Before,
    /// Become the next sibling of the target.
    After,
}

/// The placement requested by a move. Same values as the drop zones.
pub type Placement = DropLocation;

impl fmt::Display for DropLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Into => "into",
            Self::Before => "before",
            Self::After => "after",
        })
    }
}

/// "Move `id` relative to `dest_id` with `placement`".
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MoveRequest {
    pub id: ItemId,
    pub dest_id: ItemId,
    pub placement: Placement,
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move {} {} {}", self.id, self.placement, self.dest_id)
    }
}

/// Inline edit of the editable text fields of one item. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ItemEdit {
    pub label: Option<String>,
    pub description: Option<String>,
}

impl ItemEdit {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            label: None,
            description: Some(description.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.description.is_none()
    }

    pub(crate) fn apply(&self, item: &mut DataItem) {
        if let Some(label) = &self.label {
            item.label.clone_from(label);
        }
        if let Some(description) = &self.description {
            item.description.clone_from(description);
        }
    }
}

/// A text cell that can be edited inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum EditField {
    Label,
    Description,
}

impl EditField {
    /// Current text of this field.
    pub fn text(self, item: &DataItem) -> &str {
        match self {
            Self::Label => &item.label,
            Self::Description => &item.description,
        }
    }

    /// The edit that sets this field to `text`.
    pub fn edit(self, text: impl Into<String>) -> ItemEdit {
        match self {
            Self::Label => ItemEdit::label(text),
            Self::Description => ItemEdit::description(text),
        }
    }
}

/// A mutation sent to the data store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Move(MoveRequest),
    Edit { id: ItemId, edit: ItemEdit },
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(request) => fmt::Display::fmt(request, f),
            Self::Edit { id, .. } => write!(f, "edit {id}"),
        }
    }
}
