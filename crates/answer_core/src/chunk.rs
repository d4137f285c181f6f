use serde::Deserialize;

/// Prefix for a source tag whose label is missing: "issue" followed by the page number.
const PAGE_LABEL_PREFIX: &str = "مسئله";

/// One decoded frame of the `/ask` response stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// Transient progress label; replaces the previous one.
    Status { content: String },
    /// Incremental answer fragment.
    Answer { content: String },
    Done {
        #[serde(default)]
        sources: Vec<Source>,
        #[serde(default)]
        keywords: Vec<String>,
        #[serde(default)]
        found_in_docs: bool,
    },
    Cancelled {
        #[serde(default)]
        content: Option<String>,
    },
    Error {
        #[serde(default)]
        content: Option<String>,
    },
}

impl StreamChunk {
    /// `done`, `cancelled` and `error` end an exchange.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamChunk::Done { .. } | StreamChunk::Cancelled { .. } | StreamChunk::Error { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub label: Option<String>,
    pub page: i64,
    #[serde(default)]
    pub section: Option<String>,
}

/// Display text for one source reference attached to a finished answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTag {
    pub text: String,
}

impl SourceTag {
    pub fn from_source(source: &Source) -> Self {
        let mut text = match source.label.as_deref().filter(|label| !label.is_empty()) {
            Some(label) => label.to_string(),
            None => format!("{PAGE_LABEL_PREFIX} {}", source.page),
        };
        if let Some(section) = source.section.as_deref().filter(|s| !s.is_empty()) {
            // Only the top-level heading of a "a > b > c" breadcrumb is shown.
            let head = section.split(" > ").next().unwrap_or(section);
            text.push_str(" - ");
            text.push_str(head);
        }
        Self { text }
    }
}
