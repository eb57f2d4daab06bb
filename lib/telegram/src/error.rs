use std::fmt;

#[derive(Debug)]
pub enum Error {
    Http(chipp_http::Error),
    UrlParse(chipp_http::UrlParseError),
    Api {
        code: Option<i64>,
        description: String,
    },
}

impl From<chipp_http::Error> for Error {
    fn from(err: chipp_http::Error) -> Self {
        Self::Http(err)
    }
}

impl From<chipp_http::UrlParseError> for Error {
    fn from(err: chipp_http::UrlParseError) -> Self {
        Self::UrlParse(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "http error: {err}"),
            Self::UrlParse(err) => write!(f, "url parse error: {err}"),
            Self::Api {
                code: Some(code),
                description,
            } => write!(f, "telegram error {code}: {description}"),
            Self::Api {
                code: None,
                description,
            } => write!(f, "telegram error: {description}"),
        }
    }
}

impl std::error::Error for Error {}
