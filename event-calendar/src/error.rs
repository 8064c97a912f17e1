use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid pagination step `{0}`, expected `<count> <day|week|month|year>`")]
    InvalidStep(String),
    #[error("unknown calendar mode `{0}`")]
    UnknownMode(String),
    #[error("unknown weekday `{0}`")]
    UnknownWeekday(String),
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
