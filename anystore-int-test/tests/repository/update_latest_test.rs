use anystore::errors::{ErrorKind, StoreResult};
use anystore::memory::MemoryRepository;
use anystore::repository::{RepositoryAdd, RepositoryExt, RepositoryGet, RepositoryUpdate};
use anystore_int_test::test_util::{cleanup, create_test_context, fake_order, run_test, Order};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// Hands out a stale ETag for the first `stale_reads` reads, as if another
/// writer updated the order in between.
struct RacingReader {
    inner: MemoryRepository<Order>,
    reads: AtomicUsize,
    stale_reads: usize,
}

impl RacingReader {
    fn new(inner: MemoryRepository<Order>, stale_reads: usize) -> Self {
        RacingReader {
            inner,
            reads: AtomicUsize::new(0),
            stale_reads,
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryGet<Order> for RacingReader {
    async fn try_get_by_id(&self, id: &str, cancel: &CancellationToken) -> StoreResult<Option<Order>> {
        let read = self.reads.fetch_add(1, Ordering::SeqCst);
        let found = self.inner.try_get_by_id(id, cancel).await?;
        Ok(found.map(|mut order| {
            if read < self.stale_reads {
                order.etag = Some("stale".to_string());
            }
            order
        }))
    }
}

#[async_trait]
impl RepositoryUpdate<Order> for RacingReader {
    async fn update(&self, entity: Order, cancel: &CancellationToken) -> StoreResult<Order> {
        self.inner.update(entity, cancel).await
    }
}

#[test]
fn test_update_latest_applies_mutation() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let order = repo.add(fake_order(), ctx.cancel()).await?;

            let updated = repo
                .update_latest(&order.id, |o: &mut Order| o.city = "Oslo".to_string(), ctx.cancel())
                .await?;
            assert_eq!(updated.city, "Oslo");
            assert_eq!(repo.get_by_id(&order.id, ctx.cancel()).await?.city, "Oslo");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_latest_recovers_from_contention() {
    run_test(
        create_test_context,
        |ctx| async move {
            let order = ctx.repository().add(fake_order(), ctx.cancel()).await?;
            let racing = RacingReader::new(ctx.repository(), 2);

            let updated = racing
                .update_latest_with_retries(&order.id, 3, |o: &mut Order| o.total = 7, ctx.cancel())
                .await?;
            assert_eq!(updated.total, 7);
            assert_eq!(racing.reads(), 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_latest_gives_up_after_retries() {
    run_test(
        create_test_context,
        |ctx| async move {
            let order = ctx.repository().add(fake_order(), ctx.cancel()).await?;
            let racing = RacingReader::new(ctx.repository(), usize::MAX);

            let err = racing
                .update_latest_with_retries(&order.id, 2, |o: &mut Order| o.total = 7, ctx.cancel())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::Concurrency);
            assert_eq!(racing.reads(), 3);

            let stored = ctx.repository().get_by_id(&order.id, ctx.cancel()).await?;
            assert_eq!(stored.total, order.total);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_latest_missing_entity() {
    run_test(
        create_test_context,
        |ctx| async move {
            let err = ctx
                .repository()
                .update_latest("missing", |o: &mut Order| o.total = 1, ctx.cancel())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}
