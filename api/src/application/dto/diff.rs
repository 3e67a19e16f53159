use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unchanged,
    Added,
    Removed,
}

/// One line of a version diff.
///
/// `line_number` is 1-based. Added lines are numbered in the newer text;
/// unchanged and removed lines carry their position in the older text.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub line_number: usize,
    pub content: String,
}

impl ChangeEntry {
    pub fn unchanged(line_number: usize, content: &str) -> Self {
        Self {
            kind: ChangeKind::Unchanged,
            line_number,
            content: content.to_string(),
        }
    }

    pub fn added(line_number: usize, content: &str) -> Self {
        Self {
            kind: ChangeKind::Added,
            line_number,
            content: content.to_string(),
        }
    }

    pub fn removed(line_number: usize, content: &str) -> Self {
        Self {
            kind: ChangeKind::Removed,
            line_number,
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub unchanged: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct TextDiffResult {
    pub changes: Vec<ChangeEntry>,
    pub stats: DiffStats,
}
