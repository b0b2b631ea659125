use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidDate,
    MissingElement,
    MalformedInput,
    Config,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    /// Text suitable for showing to the user, without the kind prefix.
    pub fn user_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.kind.as_str())
    }

    pub fn is_user_error(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedInput)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(
            ErrorKind::Config,
            &format!("Could not parse configuration: {}", toml_error),
        )
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for Error {
    fn from(error: nom::Err<E>) -> Self {
        Error::new(
            ErrorKind::MalformedInput,
            &format!("Error while parsing: {}", error),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidDate => "invalid date".to_owned(),
            ErrorKind::MissingElement => "missing element on host surface".to_owned(),
            ErrorKind::MalformedInput => "malformed input".to_owned(),
            ErrorKind::Config => "invalid configuration".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_falls_back_to_kind() {
        let err = Error::from(ErrorKind::MissingElement);
        assert_eq!(err.user_message(), "missing element on host surface");

        let err = Error::new(ErrorKind::MissingElement, "row 3 is missing");
        assert_eq!(err.user_message(), "row 3 is missing");
        assert_eq!(
            err.to_string(),
            "missing element on host surface: row 3 is missing"
        );
    }

    #[test]
    fn only_malformed_input_is_a_user_error() {
        assert!(Error::from(ErrorKind::MalformedInput).is_user_error());
        assert!(!Error::from(ErrorKind::InvalidDate).is_user_error());
    }
}
