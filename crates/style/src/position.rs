use serde::{Deserialize, Serialize};

/// How a node participates in its container's flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PositionMode {
    /// Consumes vertical space from the container's running cursor.
    #[default]
    Flow,
    /// Offset from the container's content origin; consumes no flow space.
    Relative,
    /// Offset from the page origin; consumes no flow space.
    Absolute,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    #[default]
    Block,
    Inline,
}

/// What happens to content that does not fit the remaining space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowAction {
    #[default]
    NewPage,
    Truncate,
    None,
}

/// Whether a component may be broken across pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowSplit {
    #[default]
    Any,
    Never,
}

impl OverflowSplit {
    pub fn allows_split(self) -> bool {
        matches!(self, OverflowSplit::Any)
    }
}
