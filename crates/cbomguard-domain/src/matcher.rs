//! Single-field predicate evaluation.
//!
//! Predicates are a closed tagged set resolved at policy-load time; the
//! matcher never inspects runtime types. Wildcard semantics live in the
//! `matches_opt_*` helpers: an unset predicate matches anything, a set
//! predicate never matches an absent value.

/// A compiled field predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Whitespace-trimmed, case-insensitive equality.
    Text(String),
    /// 64-bit float equality.
    Number(f64),
    /// Numeric interval, all clauses ANDed.
    Range(RangeExpr),
    /// Non-empty case-insensitive intersection with a collection value.
    AnyOf(Vec<String>),
}

impl Predicate {
    pub fn matches_text(&self, actual: &str) -> bool {
        match self {
            Predicate::Text(expected) => text_eq(expected, actual),
            Predicate::Number(expected) => numeric_from_text(actual) == Some(*expected),
            Predicate::Range(range) => {
                numeric_from_text(actual).is_some_and(|value| range.matches(value))
            }
            Predicate::AnyOf(expected) => expected.iter().any(|e| text_eq(e, actual)),
        }
    }

    pub fn matches_number(&self, actual: f64) -> bool {
        match self {
            Predicate::Text(expected) => numeric_from_text(expected) == Some(actual),
            Predicate::Number(expected) => *expected == actual,
            Predicate::Range(range) => range.matches(actual),
            Predicate::AnyOf(expected) => expected
                .iter()
                .any(|e| numeric_from_text(e) == Some(actual)),
        }
    }

    /// Collection match: any predicate value equals any actual value.
    pub fn matches_set<'a>(&self, actual: impl IntoIterator<Item = &'a str>) -> bool {
        match self {
            Predicate::AnyOf(expected) => actual
                .into_iter()
                .any(|a| expected.iter().any(|e| text_eq(e, a))),
            Predicate::Text(expected) => actual.into_iter().any(|a| text_eq(expected, a)),
            _ => false,
        }
    }
}

/// `None` predicate = wildcard; set predicate against `None` value = no match.
pub fn matches_opt_str(predicate: Option<&Predicate>, actual: Option<&str>) -> bool {
    match (predicate, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(p), Some(a)) => p.matches_text(a),
    }
}

pub fn matches_opt_num(predicate: Option<&Predicate>, actual: Option<f64>) -> bool {
    match (predicate, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(p), Some(a)) => p.matches_number(a),
    }
}

pub fn matches_opt_set<'a, I>(predicate: Option<&Predicate>, actual: Option<I>) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    match (predicate, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(p), Some(a)) => p.matches_set(a),
    }
}

fn text_eq(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}

/// Extract the numeric value of free-form text by keeping digits and `.` only
/// (so `"RSA-2048"` yields 2048 and `"128 bits"` yields 128).
pub fn numeric_from_text(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Quick scan for the tokens that distinguish a range expression from a
/// literal value.
pub fn contains_range_symbols(text: &str) -> bool {
    text.contains('>') || text.contains('<') || text.contains('=')
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RangeOp {
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RangeClause {
    op: RangeOp,
    bound: f64,
}

impl RangeClause {
    fn holds(&self, value: f64) -> bool {
        match self.op {
            RangeOp::Ge => value >= self.bound,
            RangeOp::Le => value <= self.bound,
            RangeOp::Gt => value > self.bound,
            RangeOp::Lt => value < self.bound,
            RangeOp::Eq => value == self.bound,
        }
    }
}

/// A compact numeric-interval predicate such as `">=128 <512"`.
///
/// Whitespace-separated clauses, each `>=N`, `<=N`, `>N`, `<N`, or a bare
/// `N`; all clauses must hold.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeExpr {
    clauses: Vec<RangeClause>,
}

impl RangeExpr {
    /// Returns `None` when `input` is not a well-formed range expression;
    /// callers fall back to literal text comparison in that case.
    pub fn parse(input: &str) -> Option<RangeExpr> {
        let mut clauses = Vec::new();
        for token in input.split_whitespace() {
            let (op, rest) = if let Some(rest) = token.strip_prefix(">=") {
                (RangeOp::Ge, rest)
            } else if let Some(rest) = token.strip_prefix("<=") {
                (RangeOp::Le, rest)
            } else if let Some(rest) = token.strip_prefix('>') {
                (RangeOp::Gt, rest)
            } else if let Some(rest) = token.strip_prefix('<') {
                (RangeOp::Lt, rest)
            } else if let Some(rest) = token.strip_prefix('=') {
                (RangeOp::Eq, rest)
            } else {
                (RangeOp::Eq, token)
            };
            let bound = rest.parse::<f64>().ok()?;
            clauses.push(RangeClause { op, bound });
        }
        if clauses.is_empty() {
            return None;
        }
        Some(RangeExpr { clauses })
    }

    pub fn matches(&self, value: f64) -> bool {
        self.clauses.iter().all(|clause| clause.holds(value))
    }
}
