use std::{
    error::Error as StdError,
    fmt::{self, Display},
    result,
};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Serenity(serenity::Error),
    Rusqlite(rusqlite::Error),
    Reqwest(reqwest::Error),
    Chrono(chrono::ParseError),
    /// The link is already stored, carries the normalized link
    LinkExists(String),
    /// A required positional argument was not supplied, carries its name
    MissingArgument(&'static str),
    InvalidLink(String),
    Config(String),
    Internal(String),
    ConstStr(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serenity(inner) => fmt::Display::fmt(&inner, f),
            Error::Rusqlite(inner) => fmt::Display::fmt(&inner, f),
            Error::Reqwest(inner) => fmt::Display::fmt(&inner, f),
            Error::Chrono(inner) => fmt::Display::fmt(&inner, f),
            Error::LinkExists(link) => write!(f, "link {link} is already stored"),
            Error::MissingArgument(name) => write!(f, "missing required argument <{name}>"),
            Error::InvalidLink(link) => write!(f, "{link} is not a http(s) link"),
            Error::Config(inner) => write!(f, "invalid configuration: {inner}"),
            Error::Internal(inner) => f.write_str(inner),
            Error::ConstStr(inner) => f.write_str(inner),
        }
    }
}

impl StdError for Error {}

impl From<serenity::Error> for Error {
    fn from(e: serenity::Error) -> Error {
        Error::Serenity(e)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Error {
        Error::Rusqlite(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Error {
        Error::Chrono(e)
    }
}
