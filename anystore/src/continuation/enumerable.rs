/// One page of query results paired with the token for the next page.
///
/// `continuation_token` is `None` exactly when no further results remained at
/// the moment the page was produced. Each page is a fresh materialization;
/// re-issuing the same token computes the page again rather than replaying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationEnumerable<T> {
    items: Vec<T>,
    continuation_token: Option<String>,
}

impl<T> ContinuationEnumerable<T> {
    pub fn new(items: Vec<T>, continuation_token: Option<String>) -> Self {
        ContinuationEnumerable {
            items,
            continuation_token,
        }
    }

    /// A final page with no results.
    pub fn empty() -> Self {
        ContinuationEnumerable {
            items: Vec::new(),
            continuation_token: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn continuation_token(&self) -> Option<&str> {
        self.continuation_token.as_deref()
    }

    #[inline]
    pub fn has_more(&self) -> bool {
        self.continuation_token.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.items, self.continuation_token)
    }

    /// Projects every item, keeping the token.
    pub fn map<U, F>(self, f: F) -> ContinuationEnumerable<U>
    where
        F: FnMut(T) -> U,
    {
        ContinuationEnumerable {
            items: self.items.into_iter().map(f).collect(),
            continuation_token: self.continuation_token,
        }
    }
}

impl<T> Default for ContinuationEnumerable<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> IntoIterator for ContinuationEnumerable<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ContinuationEnumerable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
