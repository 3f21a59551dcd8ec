use crate::common::DEFAULT_LIMIT;
use crate::config::RepositoryConfig;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::query::{Criterion, OrderBy};

/// Paging parameters shared by every query shape.
///
/// `limit` must be greater than zero. `continuation_token` is `None` for the
/// first page; otherwise it must come from a previous page of the same query
/// shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    limit: usize,
    continuation_token: Option<String>,
}

impl QueryOptions {
    pub fn new(limit: usize) -> Self {
        QueryOptions {
            limit,
            continuation_token: None,
        }
    }

    /// Options using the configured default page size.
    pub fn with_config(config: &RepositoryConfig) -> Self {
        QueryOptions::new(config.default_limit())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    pub fn set_continuation_token(&mut self, token: Option<String>) {
        self.continuation_token = token;
    }

    /// Fails with `BadInput` when the limit is zero.
    pub fn validate(&self) -> StoreResult<()> {
        if self.limit == 0 {
            log::error!("Query limit must be greater than zero");
            return Err(StoreError::new(
                "Query limit must be greater than zero",
                ErrorKind::BadInput,
            ));
        }
        Ok(())
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions::new(DEFAULT_LIMIT)
    }
}

/// A request descriptor that can be dispatched to a query handler.
///
/// The concrete type of a query is part of the handler signature, so new
/// query shapes are added by defining a type and registering a handler for
/// it; neither the repository nor the executor change.
pub trait Query: Send + Sync + 'static {
    fn options(&self) -> &QueryOptions;

    fn limit(&self) -> usize {
        self.options().limit()
    }

    fn continuation_token(&self) -> Option<&str> {
        self.options().continuation_token()
    }
}

macro_rules! impl_query_options {
    ($name:ident $(<$generic:ident>)?) => {
        impl$(<$generic: Send + Sync + 'static>)? Query for $name$(<$generic>)? {
            fn options(&self) -> &QueryOptions {
                &self.options
            }
        }

        impl$(<$generic>)? $name$(<$generic>)? {
            pub fn with_limit(mut self, limit: usize) -> Self {
                self.options.set_limit(limit);
                self
            }

            pub fn with_continuation_token<S: Into<String>>(mut self, token: Option<S>) -> Self {
                self.options.set_continuation_token(token.map(Into::into));
                self
            }

            pub fn with_options(mut self, options: QueryOptions) -> Self {
                self.options = options;
                self
            }
        }
    };
}

/// Matches every entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllQuery {
    options: QueryOptions,
}

impl AllQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &RepositoryConfig) -> Self {
        AllQuery {
            options: QueryOptions::with_config(config),
        }
    }
}

impl_query_options!(AllQuery);

/// Matches entities equal to `prototype` on every property the prototype
/// sets to a non-default value.
#[derive(Debug, Clone)]
pub struct MirrorQuery<T> {
    prototype: T,
    options: QueryOptions,
}

impl<T> MirrorQuery<T> {
    pub fn new(prototype: T) -> Self {
        MirrorQuery {
            prototype,
            options: QueryOptions::default(),
        }
    }

    pub fn with_config(prototype: T, config: &RepositoryConfig) -> Self {
        MirrorQuery {
            prototype,
            options: QueryOptions::with_config(config),
        }
    }

    pub fn prototype(&self) -> &T {
        &self.prototype
    }
}

impl_query_options!(MirrorQuery<T>);

/// Matches entities satisfying every criterion, sorted by the order-by clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaQuery {
    criteria: Vec<Criterion>,
    order_by: Vec<OrderBy>,
    options: QueryOptions,
}

impl CriteriaQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &RepositoryConfig) -> Self {
        CriteriaQuery {
            options: QueryOptions::with_config(config),
            ..Default::default()
        }
    }

    /// Appends a criterion; all criteria must hold.
    pub fn filter(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// Appends an order-by clause; earlier clauses take precedence.
    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order_by
    }
}

impl_query_options!(CriteriaQuery);
