use std::fmt;
use std::str::FromStr;

use super::QueryError;

/// Comparison operators understood by the remote `Filter:` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    /// `~`, regular expression match
    Match,
    NotMatch,
    /// `=~`, case-insensitive equality
    IEq,
    NotIEq,
    /// `~~`, case-insensitive regular expression match
    IMatch,
    NotIMatch,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::NotEq => "!=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::Match => "~",
            FilterOp::NotMatch => "!~",
            FilterOp::IEq => "=~",
            FilterOp::NotIEq => "!=~",
            FilterOp::IMatch => "~~",
            FilterOp::NotIMatch => "!~~",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "=" => FilterOp::Eq,
            "!=" => FilterOp::NotEq,
            "<" => FilterOp::Lt,
            "<=" => FilterOp::Le,
            ">" => FilterOp::Gt,
            ">=" => FilterOp::Ge,
            "~" => FilterOp::Match,
            "!~" => FilterOp::NotMatch,
            "=~" => FilterOp::IEq,
            "!=~" => FilterOp::NotIEq,
            "~~" => FilterOp::IMatch,
            "!~~" => FilterOp::NotIMatch,
            _ => return None,
        };
        Some(op)
    }
}

/// One filter line of a request.
///
/// Grammar:
/// ```text
/// filter     := ["Filter:"] comparison | combinator
/// comparison := field WS op [WS value]
/// field      := [A-Za-z0-9_]+
/// op         := = != < <= > >= ~ !~ =~ !=~ ~~ !~~
/// value      := rest of the line, leading whitespace removed (may be empty)
/// combinator := "Or:" N | "And:" N | "Negate:"   (N >= 1)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Compare {
        field: String,
        op: FilterOp,
        value: String,
    },
    /// Combine the last N filters with OR.
    Or(usize),
    /// Combine the last N filters with AND.
    And(usize),
    /// Negate the last filter.
    Negate,
}

impl FilterExpr {
    pub fn compare(field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        FilterExpr::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, QueryError> {
        if text.contains(['\n', '\r']) {
            return Err(QueryError::malformed(text, "filters must fit on one line"));
        }

        let trimmed = text.trim();
        if let Some(count) = trimmed.strip_prefix("Or:") {
            return Ok(FilterExpr::Or(parse_count(text, count)?));
        }
        if let Some(count) = trimmed.strip_prefix("And:") {
            return Ok(FilterExpr::And(parse_count(text, count)?));
        }
        if let Some(rest) = trimmed.strip_prefix("Negate:") {
            if !rest.trim().is_empty() {
                return Err(QueryError::malformed(text, "Negate: takes no argument"));
            }
            return Ok(FilterExpr::Negate);
        }

        let body = trimmed
            .strip_prefix("Filter:")
            .map(str::trim_start)
            .unwrap_or(trimmed);
        parse_comparison(text, body)
    }

    /// The request line for this filter, without the trailing newline.
    pub fn wire_line(&self) -> String {
        match self {
            FilterExpr::Compare { .. } => format!("Filter: {}", self),
            _ => self.to_string(),
        }
    }
}

fn parse_count(original: &str, count: &str) -> Result<usize, QueryError> {
    match count.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(QueryError::malformed(
            original,
            "combinator needs a positive filter count",
        )),
    }
}

fn parse_comparison(original: &str, body: &str) -> Result<FilterExpr, QueryError> {
    let (field, rest) = match body.split_once(char::is_whitespace) {
        Some(parts) => parts,
        None => {
            return Err(QueryError::malformed(
                original,
                "expected 'field operator value'",
            ));
        }
    };

    if field.is_empty()
        || !field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(QueryError::malformed(original, "invalid field name"));
    }

    let rest = rest.trim_start();
    let (op_token, value) = match rest.split_once(char::is_whitespace) {
        Some((op, value)) => (op, value.trim_start()),
        None => (rest, ""),
    };

    let op = FilterOp::from_token(op_token).ok_or_else(|| {
        QueryError::malformed(original, format!("unknown operator '{}'", op_token))
    })?;

    Ok(FilterExpr::compare(field, op, value))
}

impl FromStr for FilterExpr {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterExpr::parse(s)
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Compare { field, op, value } if value.is_empty() => {
                write!(f, "{} {}", field, op.as_str())
            }
            FilterExpr::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.as_str(), value)
            }
            FilterExpr::Or(n) => write!(f, "Or: {}", n),
            FilterExpr::And(n) => write!(f, "And: {}", n),
            FilterExpr::Negate => write!(f, "Negate:"),
        }
    }
}
