use crate::common::SortOrder;
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Comparison operator applied between a resolved property value and a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    /// The value is one of the listed constants.
    In,
    /// The value is a string containing the constant as a substring.
    Contains,
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Equal => write!(f, "=="),
            Operator::GreaterThan => write!(f, ">"),
            Operator::GreaterThanOrEqual => write!(f, ">="),
            Operator::LessThan => write!(f, "<"),
            Operator::LessThanOrEqual => write!(f, "<="),
            Operator::In => write!(f, "in"),
            Operator::Contains => write!(f, "contains"),
        }
    }
}

/// One `path operator value` predicate.
///
/// The path is parsed when the query executes, so a malformed path surfaces
/// as `BadInput` from the handler rather than from the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    path: String,
    operator: Operator,
    value: Value,
}

impl Criterion {
    pub fn new(path: &str, operator: Operator, value: Value) -> Self {
        Criterion {
            path: path.to_string(),
            operator,
            value,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.path, self.operator, self.value)
    }
}

/// A sort clause over a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    path: String,
    order: SortOrder,
}

impl OrderBy {
    pub fn new(path: &str, order: SortOrder) -> Self {
        OrderBy {
            path: path.to_string(),
            order,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }
}

/// Ascending order on `path`.
pub fn asc(path: &str) -> OrderBy {
    OrderBy::new(path, SortOrder::Ascending)
}

/// Descending order on `path`.
pub fn desc(path: &str) -> OrderBy {
    OrderBy::new(path, SortOrder::Descending)
}

/// Starts a fluent criterion on a property path.
///
/// Paths are dot separated; `Name[]` fans out over every element of the
/// array `Name` and `Name[2]` selects a single element.
///
/// # Examples
///
/// ```rust
/// use anystore::query::{property, Operator};
///
/// let criterion = property("Lines[].Quantity").gt(3);
/// assert_eq!(criterion.operator(), Operator::GreaterThan);
/// ```
pub fn property(path: &str) -> PropertyCriterion {
    PropertyCriterion {
        path: path.to_string(),
    }
}

/// Fluent builder returned by [`property`].
#[derive(Debug, Clone)]
pub struct PropertyCriterion {
    path: String,
}

impl PropertyCriterion {
    fn build(self, operator: Operator, value: Value) -> Criterion {
        Criterion {
            path: self.path,
            operator,
            value,
        }
    }

    pub fn eq<V: Into<Value>>(self, value: V) -> Criterion {
        self.build(Operator::Equal, value.into())
    }

    pub fn gt<V: Into<Value>>(self, value: V) -> Criterion {
        self.build(Operator::GreaterThan, value.into())
    }

    pub fn gte<V: Into<Value>>(self, value: V) -> Criterion {
        self.build(Operator::GreaterThanOrEqual, value.into())
    }

    pub fn lt<V: Into<Value>>(self, value: V) -> Criterion {
        self.build(Operator::LessThan, value.into())
    }

    pub fn lte<V: Into<Value>>(self, value: V) -> Criterion {
        self.build(Operator::LessThanOrEqual, value.into())
    }

    pub fn is_in<I, V>(self, values: I) -> Criterion
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.build(Operator::In, Value::Array(values))
    }

    pub fn contains(self, needle: &str) -> Criterion {
        self.build(Operator::Contains, Value::String(needle.to_string()))
    }
}
