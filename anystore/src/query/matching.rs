use crate::common::SortOrder;
use crate::entity::Entity;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::query::{CriteriaQuery, Criterion, Operator, PropertyPath};
use itertools::Itertools;
use serde_json::Value;
use std::cmp::Ordering;

/// Orders two JSON values of the same type.
///
/// Numbers compare numerically, strings lexicographically, `false` sorts
/// before `true` and two nulls are equal. Values of different types (or
/// arrays and objects) have no order.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                Some(a.cmp(&b))
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                Some(a.cmp(&b))
            } else {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) | Value::Object(_) => 4,
    }
}

/// Total order used for sort keys.
///
/// Values of different types order by type: null, booleans, numbers,
/// strings, then arrays and objects. Arrays and objects compare equal to
/// each other.
pub fn compare_sort_keys(left: &Value, right: &Value) -> Ordering {
    type_rank(left)
        .cmp(&type_rank(right))
        .then_with(|| compare_values(left, right).unwrap_or(Ordering::Equal))
}

/// Equality that treats `1` and `1.0` as the same number.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match compare_values(left, right) {
        Some(ordering) => ordering == Ordering::Equal,
        None => left == right,
    }
}

#[derive(Debug, Clone)]
struct CompiledCriterion {
    path: PropertyPath,
    operator: Operator,
    value: Value,
}

impl CompiledCriterion {
    fn compile(criterion: &Criterion) -> StoreResult<Self> {
        let path = PropertyPath::parse(criterion.path())?;
        match (criterion.operator(), criterion.value()) {
            (Operator::In, Value::Array(_)) | (Operator::Contains, Value::String(_)) => {}
            (Operator::In, _) | (Operator::Contains, _) => {
                log::error!("Invalid operand for criterion {}", criterion);
                return Err(StoreError::new(
                    &format!("Invalid operand for criterion {}", criterion),
                    ErrorKind::BadInput,
                ));
            }
            _ => {}
        }
        Ok(CompiledCriterion {
            path,
            operator: criterion.operator(),
            value: criterion.value().clone(),
        })
    }

    fn is_satisfied_by(&self, candidate: &Value) -> bool {
        let ordering = || compare_values(candidate, &self.value);
        match self.operator {
            Operator::Equal => values_equal(candidate, &self.value),
            Operator::GreaterThan => ordering() == Some(Ordering::Greater),
            Operator::GreaterThanOrEqual => {
                matches!(ordering(), Some(Ordering::Greater | Ordering::Equal))
            }
            Operator::LessThan => ordering() == Some(Ordering::Less),
            Operator::LessThanOrEqual => {
                matches!(ordering(), Some(Ordering::Less | Ordering::Equal))
            }
            Operator::In => match &self.value {
                Value::Array(options) => options.iter().any(|o| values_equal(candidate, o)),
                _ => false,
            },
            Operator::Contains => match (candidate, &self.value) {
                (Value::String(haystack), Value::String(needle)) => {
                    haystack.contains(needle.as_str())
                }
                _ => false,
            },
        }
    }

    fn matches(&self, document: &Value) -> bool {
        self.path
            .resolve(document)
            .into_iter()
            .any(|candidate| self.is_satisfied_by(candidate))
    }
}

/// A [`CriteriaQuery`] compiled against serialized entities.
///
/// Backends without a native query language serialize each candidate with
/// `serde_json` and run it through the matcher. Compilation parses every
/// property path up front so malformed input fails before any data is read.
#[derive(Debug, Clone)]
pub struct CriteriaMatcher {
    criteria: Vec<CompiledCriterion>,
    ordering: Vec<(PropertyPath, SortOrder)>,
}

impl CriteriaMatcher {
    pub fn compile(query: &CriteriaQuery) -> StoreResult<Self> {
        let criteria = query
            .criteria()
            .iter()
            .map(CompiledCriterion::compile)
            .collect::<StoreResult<Vec<_>>>()?;
        let ordering = query
            .ordering()
            .iter()
            .map(|o| PropertyPath::parse(o.path()).map(|path| (path, o.order())))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(CriteriaMatcher { criteria, ordering })
    }

    /// `true` when every criterion holds for `document`.
    pub fn matches(&self, document: &Value) -> bool {
        self.criteria.iter().all(|c| c.matches(document))
    }

    /// Orders two documents by the order-by clauses. A missing sort key
    /// sorts before any present key; keys of different types order by
    /// [`compare_sort_keys`].
    pub fn compare(&self, left: &Value, right: &Value) -> Ordering {
        for (path, order) in &self.ordering {
            let ordering = match (path.resolve_first(left), path.resolve_first(right)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => compare_sort_keys(a, b),
            };
            let ordering = if order.is_ascending() {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    pub fn has_ordering(&self) -> bool {
        !self.ordering.is_empty()
    }

    /// Filters and sorts `(document, item)` pairs, keeping the input order
    /// between items that compare equal.
    pub fn apply<T, I>(&self, candidates: I) -> Vec<T>
    where
        I: IntoIterator<Item = (Value, T)>,
    {
        let matched = candidates
            .into_iter()
            .filter(|(document, _)| self.matches(document));
        if self.has_ordering() {
            matched
                .sorted_by(|(a, _), (b, _)| self.compare(a, b))
                .map(|(_, item)| item)
                .collect()
        } else {
            matched.map(|(_, item)| item).collect()
        }
    }
}

/// Equality constraints derived from a prototype entity.
///
/// A top-level property becomes a constraint when its serialized value
/// differs from the one in `T::default()`.
#[derive(Debug, Clone)]
pub struct MirrorMatcher {
    constraints: Vec<(String, Value)>,
}

impl MirrorMatcher {
    pub fn from_prototype<T: Entity>(prototype: &T) -> StoreResult<Self> {
        let prototype_document = serde_json::to_value(prototype)?;
        let default_document = serde_json::to_value(T::default())?;

        let (Value::Object(set), Value::Object(defaults)) = (prototype_document, default_document)
        else {
            log::error!(
                "Entity '{}' does not serialize to an object",
                T::entity_name()
            );
            return Err(StoreError::new(
                &format!(
                    "Entity '{}' does not serialize to an object",
                    T::entity_name()
                ),
                ErrorKind::BadInput,
            ));
        };

        let constraints = set
            .into_iter()
            .filter(|(key, value)| defaults.get(key) != Some(value))
            .collect();
        Ok(MirrorMatcher { constraints })
    }

    pub fn constraints(&self) -> &[(String, Value)] {
        &self.constraints
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.constraints.iter().all(|(key, expected)| {
            document
                .get(key)
                .map(|actual| values_equal(actual, expected))
                .unwrap_or(false)
        })
    }

    /// Keeps the items whose document satisfies every constraint.
    pub fn apply<T, I>(&self, candidates: I) -> Vec<T>
    where
        I: IntoIterator<Item = (Value, T)>,
    {
        candidates
            .into_iter()
            .filter(|(document, _)| self.matches(document))
            .map(|(_, item)| item)
            .collect()
    }
}
