use std::{convert::TryFrom, fmt::Display};

const GET: &str = "GET";
const POST: &str = "POST";
const PUT: &str = "PUT";
const PATCH: &str = "PATCH";
const DELETE: &str = "DELETE";
const HEAD: &str = "HEAD";
const OPTIONS: &str = "OPTIONS";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
/// The HTTP methods an operation in the analyzed document may declare.
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Returns a static str reference naming the current method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => GET,
            Method::Post => POST,
            Method::Put => PUT,
            Method::Patch => PATCH,
            Method::Delete => DELETE,
            Method::Head => HEAD,
            Method::Options => OPTIONS,
        }
    }
}

impl std::cmp::PartialEq<&str> for Method {
    /// Compares the current method to the one given in a string reference.
    /// The comparison is case insensitive, but superfluous whitespace will
    /// always result in `false`.
    fn eq(&self, other: &&str) -> bool {
        Self::try_from(*other).map(|m| *self == m).unwrap_or(false)
    }
}

impl Ord for Method {
    /// CRUD-biased ordering: creators sort first, then reads, then the
    /// remaining mutators, matching the priority the analyzers use when
    /// grouping operations within a resource.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn method_index(method: Method) -> u8 {
            match method {
                Method::Post => 0,
                Method::Head => 1,
                Method::Options => 2,
                Method::Get => 3,
                Method::Put => 4,
                Method::Patch => 5,
                Method::Delete => 6,
            }
        }
        method_index(*self).cmp(&method_index(*other))
    }
}

impl PartialOrd for Method {
    fn partial_cmp(&self, other: &Method) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Method {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fmt.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Method {
    type Error = InvalidMethodError;

    /// Converts the given string reference to a Method, if possible.
    /// The comparison is case insensitive, but superfluous whitespace will
    /// always result in an error.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.len() {
            3 if s.eq_ignore_ascii_case(GET) => Ok(Self::Get),
            3 if s.eq_ignore_ascii_case(PUT) => Ok(Self::Put),
            4 if s.eq_ignore_ascii_case(POST) => Ok(Self::Post),
            5 if s.eq_ignore_ascii_case(PATCH) => Ok(Self::Patch),
            6 if s.eq_ignore_ascii_case(DELETE) => Ok(Self::Delete),
            4 if s.eq_ignore_ascii_case(HEAD) => Ok(Self::Head),
            7 if s.eq_ignore_ascii_case(OPTIONS) => Ok(Self::Options),
            _ => Err(InvalidMethodError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = InvalidMethodError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        <Method as TryFrom<&str>>::try_from(&s)
    }
}

/// Error type returned from `Method::try_from(_: &str)` if the given string
/// does not name a valid method.
#[derive(Debug, Clone)]
pub struct InvalidMethodError(String);
impl Display for InvalidMethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid method: {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crud_priority_order() {
        let mut methods = vec![
            Method::Delete,
            Method::Get,
            Method::Post,
            Method::Patch,
            Method::Put,
        ];
        methods.sort();
        assert_eq!(
            methods,
            vec![
                Method::Post,
                Method::Get,
                Method::Put,
                Method::Patch,
                Method::Delete
            ]
        );
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Method::try_from("get").unwrap(), Method::Get);
        assert_eq!(Method::try_from("OPTIONS").unwrap(), Method::Options);
        assert!(Method::try_from("FETCH").is_err());
    }
}
