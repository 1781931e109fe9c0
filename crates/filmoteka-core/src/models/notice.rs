use serde::{Deserialize, Serialize};

/// Category of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Favorite,
    Plan,
}

impl NoticeKind {
    pub const ALL: &[NoticeKind] = &[
        Self::Success,
        Self::Error,
        Self::Info,
        Self::Favorite,
        Self::Plan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Favorite => "favorite",
            Self::Plan => "plan",
        }
    }
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
