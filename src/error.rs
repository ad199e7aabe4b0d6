use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A required URL or method is missing from the configuration. No
    /// request is attempted.
    Config(String),
    /// Network-level failure reaching the device.
    Transport(reqwest::Error),
    /// The device answered with a status code other than 200.
    Status(u16),
    /// The response body does not parse into an expected value.
    Protocol(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "configuration error: {msg}"),
            Error::Transport(e) => write!(f, "transport error: {e}"),
            Error::Status(code) => write!(f, "got http error code {code}"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_url() {
        let err = Error::Config("no 'active.statusUrl' defined".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: no 'active.statusUrl' defined"
        );
    }

    #[test]
    fn display_includes_status_code() {
        assert_eq!(Error::Status(503).to_string(), "got http error code 503");
    }
}
