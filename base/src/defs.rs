use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    IoError,
    MalformedData,
    MalformedConfig,
    ValidationFailed,
    EmptySelection,
    ResourceLoadFailed,
    SceneSetupFailed,
    UnsupportedFeature,
}

impl ErrorKind {
    /// Whether an error of this kind must abort the whole run.
    pub fn is_fatal(self) -> bool {
        use ErrorKind::*;
        !matches!(
            self,
            EmptySelection | ResourceLoadFailed | UnsupportedFeature
        )
    }
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub description: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind, description: String) -> Self {
        Self {
            kind,
            description,
            source: None,
        }
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(
        kind: ErrorKind,
        description: String,
        source: E,
    ) -> Self {
        Self {
            kind,
            description,
            source: Some(Box::new(source)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:?}: {}", self.kind, self.description)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        let desc = err.to_string();
        Error::with_source(ErrorKind::IoError, desc, err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait IntoResult<T> {
    fn res<F: FnOnce() -> String>(self, desc: F) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> IntoResult<T>
    for std::result::Result<T, E>
{
    fn res<F: FnOnce() -> String>(self, desc: F) -> Result<T> {
        self.map_err(|err| Error::with_source(ErrorKind::IoError, desc(), err))
    }
}
