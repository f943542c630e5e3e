use std::error::Error as StdError;
use thiserror::Error;

/// Failures of a spreadsheet codec.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{backend}: {message}")]
    Backend { backend: String, message: String },

    #[error("unsupported {feature} ({context})")]
    Unsupported { feature: String, context: String },
}

impl IoError {
    pub fn from_backend<E: std::fmt::Display>(backend: &str, err: E) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failures of a single user action on a [`crate::Session`].
///
/// Every variant is terminal for the action that raised it; nothing is
/// retried and the session state stays as it was (a failed load leaves no
/// dataset behind).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load dataset: {0}")]
    Load(#[source] BoxError),

    #[error("query is empty")]
    EmptyQuery,

    #[error("no dataset loaded")]
    NoData,

    #[error("a search is already running")]
    SearchInProgress,

    #[error("no results to export")]
    NothingToExport,

    #[error("export failed: {0}")]
    Export(#[source] BoxError),
}

impl SessionError {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Load(e) => format!("Ошибка при чтении файла: {e}"),
            SessionError::EmptyQuery => "Введите текст для поиска".to_string(),
            SessionError::NoData => "Сначала загрузите файл".to_string(),
            SessionError::SearchInProgress => "Поиск уже выполняется".to_string(),
            SessionError::NothingToExport => "Нет данных для экспорта".to_string(),
            SessionError::Export(e) => format!("Ошибка при экспорте: {e}"),
        }
    }
}
