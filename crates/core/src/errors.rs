use thiserror::Error;

/// Fixed text shown in chat whenever a draw cannot produce a question.
pub const APOLOGY_MESSAGE: &str = "抱歉，無法獲取題目。請稍後再試！";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport failure calling `{url}`: {message}")]
    Transport { url: String, message: String },
    #[error("`{url}` responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response shape from `{url}`: {message}")]
    Shape { url: String, message: String },
    #[error("question `{slug}` was not found")]
    NotFound { slug: String },
    #[error("question slug must not be empty")]
    InvalidSlug,
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::Shape { .. } => "shape",
            Self::NotFound { .. } => "not_found",
            Self::InvalidSlug => "invalid_slug",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DrawError {
    #[error("question catalog returned no slugs")]
    EmptyCatalog,
    #[error("catalog fetch failed: {0}")]
    Catalog(#[source] FetchError),
    #[error("question detail fetch failed: {0}")]
    Detail(#[source] FetchError),
}

impl DrawError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EmptyCatalog | Self::Catalog(_) => "catalog",
            Self::Detail(_) => "detail",
        }
    }

    pub fn user_message(&self) -> &'static str {
        APOLOGY_MESSAGE
    }
}
