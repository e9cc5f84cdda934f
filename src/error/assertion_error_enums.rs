#[derive(Debug, Clone, PartialEq)]
pub enum AssertionErrorKind {
    Connection(ConnectionError),
    MalformedResponse(MalformedResponseError),
    ResourceNotFound,
    Configuration,
    Redirect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionError {
    Refused,
    ConnectTimeout,
    ReadTimeout,
    Reset,
    Io,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MalformedResponseError {
    Empty,
    InvalidStatusLine,
    InvalidChunkedBody,
}
