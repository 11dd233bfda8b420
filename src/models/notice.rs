#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    #[default]
    Info,
    Warning,
    Error,
}

/// A user-facing status line. The store only produces them; deciding how to
/// surface one is up to the presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeMessage {
    message: String,
    kind: NoticeKind,
}

impl NoticeMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Info,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Error,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }
}

impl NoticeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}
