//! Whole-document persistence behind the [`DocumentSink`] seam.

pub mod document;
pub mod json;
pub(crate) mod lenient;

use std::fmt;

use document::StoreDocument;

#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    /// The stored bytes are not a JSON document at all.
    Corrupt(serde_json::Error),
    Message(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Serde(err) => write!(f, "json error: {err}"),
            Self::Corrupt(err) => write!(f, "unreadable document: {err}"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde(err) | Self::Corrupt(err) => Some(err),
            Self::Message(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Whole-document storage for the plant store.
pub trait DocumentSink {
    /// Reads the stored document; `Ok(None)` when nothing has been stored yet.
    fn load(&mut self) -> PersistResult<Option<StoreDocument>>;
    fn save(&mut self, doc: &StoreDocument) -> PersistResult<()>;
    /// Moves a document that failed to load out of the way so the next save
    /// does not overwrite it.
    fn preserve_unreadable(&mut self) -> PersistResult<()> {
        Ok(())
    }
}

/// Sink that keeps the last saved document in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    doc: Option<StoreDocument>,
    saves: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `doc` already stored.
    pub fn with_document(doc: StoreDocument) -> Self {
        Self {
            doc: Some(doc),
            saves: 0,
        }
    }

    pub fn document(&self) -> Option<&StoreDocument> {
        self.doc.as_ref()
    }

    /// Number of completed saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl DocumentSink for MemorySink {
    fn load(&mut self) -> PersistResult<Option<StoreDocument>> {
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &StoreDocument) -> PersistResult<()> {
        self.doc = Some(doc.clone());
        self.saves += 1;
        Ok(())
    }
}

impl<S: DocumentSink + ?Sized> DocumentSink for Box<S> {
    fn load(&mut self) -> PersistResult<Option<StoreDocument>> {
        (**self).load()
    }

    fn save(&mut self, doc: &StoreDocument) -> PersistResult<()> {
        (**self).save(doc)
    }

    fn preserve_unreadable(&mut self) -> PersistResult<()> {
        (**self).preserve_unreadable()
    }
}
