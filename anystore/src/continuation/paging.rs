use crate::continuation::{
    Base64JsonEncoder, ContinuationEnumerable, ContinuationTokenEncoder, OffsetToken,
};
use crate::errors::StoreResult;
use crate::query::QueryOptions;

/// Offset/limit paging over a materialized candidate sequence.
///
/// On resume the page size recorded in the token wins over the query limit,
/// so a caller cannot shift page boundaries halfway through a scan. A page
/// carries a token exactly when at least one more candidate exists after it.
///
/// Consistency is best-effort: each page re-reads the candidate set, so
/// concurrent writes between pages may cause an item to be skipped or seen
/// twice.
#[derive(Clone)]
pub struct OffsetPaginator<E = Base64JsonEncoder<OffsetToken>> {
    encoder: E,
}

impl OffsetPaginator {
    pub fn new() -> Self {
        OffsetPaginator {
            encoder: Base64JsonEncoder::new(),
        }
    }
}

impl Default for OffsetPaginator {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ContinuationTokenEncoder<OffsetToken>> OffsetPaginator<E> {
    pub fn with_encoder(encoder: E) -> Self {
        OffsetPaginator { encoder }
    }

    /// Decodes the resume position for `options` without reading any data.
    pub fn position(&self, options: &QueryOptions) -> StoreResult<OffsetToken> {
        options.validate()?;
        let token = self.encoder.decode(options.continuation_token())?;
        Ok(token.unwrap_or_else(|| OffsetToken::new(options.limit(), 0)))
    }

    /// Cuts one page out of `candidates`.
    pub fn page<T, I>(&self, options: &QueryOptions, candidates: I) -> StoreResult<ContinuationEnumerable<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let position = self.position(options)?;
        let candidates: Vec<T> = candidates.into_iter().collect();
        let total = candidates.len();

        let items: Vec<T> = candidates
            .into_iter()
            .skip(position.offset())
            .take(position.limit())
            .collect();

        let consumed = position.offset().saturating_add(items.len());
        let next = if !items.is_empty() && consumed < total {
            self.encoder.encode(Some(&position.next()))?
        } else {
            None
        };

        log::debug!(
            "Paged {} of {} candidates at offset {}",
            items.len(),
            total,
            position.offset()
        );
        Ok(ContinuationEnumerable::new(items, next))
    }
}
