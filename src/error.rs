use std::convert::From;
use std::error;
use std::fmt;
use std::io;
use std::num::ParseIntError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidParameter,
    MissingInput,
    DateParse,
    DateOutOfRange,
    ConfigParse,
    CommandParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidParameter)
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

impl From<io::ErrorKind> for Error {
    fn from(kind: io::ErrorKind) -> Error {
        Error::from(io::Error::from(kind))
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::DateParse,
            &format!("could not parse date: {}", parse_error),
        )
    }
}

impl From<ParseIntError> for Error {
    fn from(parse_error: ParseIntError) -> Error {
        Error::new(
            ErrorKind::InvalidParameter,
            &format!("not a whole number: {}", parse_error),
        )
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err.kind {
            ErrorKind::IOError(err) => err,
            kind => io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| kind.as_str()),
            ),
        }
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

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidParameter => "invalid cycle parameter".to_owned(),
            ErrorKind::MissingInput => "missing input".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::DateOutOfRange => "date out of range".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::CommandParse => "unknown command".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}
