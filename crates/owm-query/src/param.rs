use std::fmt;

/// A single query parameter value.
///
/// Values are substituted by their `Display` form: text verbatim, integers
/// without a decimal point, floats in shortest decimal notation with at
/// least one fractional digit (`56.0`, `56.13`). No escaping
/// or URL encoding is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{}", n),
            Self::UInt(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl From<&str> for QueryParam {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for QueryParam {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<f64> for QueryParam {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<u64> for QueryParam {
    fn from(n: u64) -> Self {
        Self::UInt(n)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for QueryParam {
                fn from(n: $t) -> Self {
                    Self::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Build a `Vec<QueryParam>` from heterogeneous values.
///
/// ```
/// use owm_query::{params, QueryParam};
/// let p = params!["Cheboksary", 2960561, 56.13];
/// assert_eq!(p[1], QueryParam::Int(2960561));
/// ```
#[macro_export]
macro_rules! params {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::QueryParam::from($value)),*]
    };
}
