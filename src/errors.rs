use std::fmt::{Debug, Display, Formatter};

pub type EmptyResult = Result<(), Error>;
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Credential that could not be obtained during authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    SessionId,
    ProfileName,
}

impl Display for CredentialField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionId => f.write_str(crate::constants::AUTH_SESSION_ID),
            Self::ProfileName => f.write_str(crate::constants::AUTH_PROFILE_NAME),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCredentials(CredentialField),
    AuthenticationRequired,
    SessionExpired,
    UnknownBackendResponse,
    Request,
    Io,
    Json,
    Unknown,
}

pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    pub fn new<E>(kind: ErrorKind, err: Option<E>) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            kind,
            source: err.map(Into::into),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether retrying on a later cycle may succeed without user action
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::Request)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::InvalidCredentials(field) => write!(f, "{} not found", field),
            ErrorKind::AuthenticationRequired => f.write_str("authentication required"),
            ErrorKind::SessionExpired => f.write_str("session is no longer valid"),
            ErrorKind::UnknownBackendResponse => f.write_str("unknown backend response"),
            ErrorKind::Request => f.write_str("network request error"),
            ErrorKind::Io => f.write_str("io error"),
            ErrorKind::Json => f.write_str("json serialization error"),
            ErrorKind::Unknown => f.write_str("unknown error"),
        }?;
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut builder = f.debug_struct("poe_galaxy::Error");
        builder.field("kind", &self.kind);
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|err| &**err as _)
    }
}

pub(crate) fn invalid_credentials_error(field: CredentialField) -> Error {
    Error::new(ErrorKind::InvalidCredentials(field), None::<BoxError>)
}

pub(crate) fn auth_required_error() -> Error {
    Error::new(ErrorKind::AuthenticationRequired, None::<BoxError>)
}

pub(crate) fn session_expired_error() -> Error {
    Error::new(ErrorKind::SessionExpired, None::<BoxError>)
}

pub(crate) fn backend_response_error<E: Into<BoxError>>(err: E) -> Error {
    Error::new(ErrorKind::UnknownBackendResponse, Some(err))
}

pub(crate) fn request_error<E: Into<BoxError>>(err: E) -> Error {
    Error::new(ErrorKind::Request, Some(err))
}

pub(crate) fn io_error<E: Into<BoxError>>(err: E) -> Error {
    Error::new(ErrorKind::Io, Some(err))
}

pub(crate) fn json_error<E: Into<BoxError>>(err: E) -> Error {
    Error::new(ErrorKind::Json, Some(err))
}

pub(crate) fn unknown_error<E: Into<BoxError>>(err: E) -> Error {
    Error::new(ErrorKind::Unknown, Some(err))
}
