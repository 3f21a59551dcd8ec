use anystore::decorator::{
    dispatcher_fn, validator_fn, Events, Logging, RepositoryBuilder, RepositoryEvent,
    RepositoryEventKind, Validation,
};
use anystore::errors::{ErrorKind, StoreResult};
use anystore::memory::MemoryRepository;
use anystore::repository::{
    RepositoryAdd, RepositoryExt, RepositoryFind, RepositoryRemove, RepositoryUpdate,
};
use anystore_int_test::test_util::{cleanup, create_test_context, fake_order, run_test, Order};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Add-only repository that counts calls into the backend.
struct CountingAdds {
    inner: MemoryRepository<Order>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RepositoryAdd<Order> for CountingAdds {
    async fn add(&self, entity: Order, cancel: &CancellationToken) -> StoreResult<Order> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.add(entity, cancel).await
    }
}

fn has_customer(order: &Order) -> Result<(), String> {
    if order.customer.trim().is_empty() {
        Err("customer is required".to_string())
    } else {
        Ok(())
    }
}

fn recorder() -> (
    Arc<Mutex<Vec<(RepositoryEventKind, String)>>>,
    impl Fn(RepositoryEvent<Order>) -> StoreResult<()> + Send + Sync,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let record = move |event: RepositoryEvent<Order>| {
        sink.lock()
            .push((event.kind(), event.id().to_string()));
        Ok(())
    };
    (seen, record)
}

#[test]
fn test_chain_calls_inner_once() {
    run_test(
        create_test_context,
        |ctx| async move {
            let calls = Arc::new(AtomicUsize::new(0));
            let counting = CountingAdds {
                inner: ctx.repository(),
                calls: calls.clone(),
            };
            let repo = RepositoryBuilder::new(counting)
                .with(Validation::new(validator_fn::<Order, _>(has_customer)))
                .with(Logging::new("orders"))
                .build();

            let added = repo.add(fake_order(), ctx.cancel()).await?;
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert!(ctx.repository().store().contains(&added.id));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_rejected_entity_never_reaches_backend() {
    run_test(
        create_test_context,
        |ctx| async move {
            let calls = Arc::new(AtomicUsize::new(0));
            let counting = CountingAdds {
                inner: ctx.repository(),
                calls: calls.clone(),
            };
            let repo = RepositoryBuilder::new(counting)
                .with(Logging::new("orders"))
                .with(Validation::new(validator_fn::<Order, _>(has_customer)))
                .build();

            let mut order = fake_order();
            order.customer = "  ".to_string();
            let err = repo.add(order, ctx.cancel()).await.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);
            assert_eq!(calls.load(Ordering::SeqCst), 0);
            assert!(ctx.repository().store().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_full_stack_emits_events_for_mutations() {
    run_test(
        create_test_context,
        |ctx| async move {
            let (seen, record) = recorder();
            let builder = RepositoryBuilder::new(ctx.repository())
                .with(Validation::new(validator_fn::<Order, _>(has_customer)))
                .with(Events::new(dispatcher_fn::<Order, _>(record)))
                .with(Logging::new("orders"));
            assert_eq!(builder.layers(), &["logging", "events", "validation"]);
            let repo = builder.build();

            let added = repo.add(fake_order(), ctx.cancel()).await?;
            let mut changed = repo.get_by_id(&added.id, ctx.cancel()).await?;
            changed.total += 5;
            repo.update(changed, ctx.cancel()).await?;
            assert!(repo.try_remove(&added.id, ctx.cancel()).await?);
            assert!(!repo.try_remove(&added.id, ctx.cancel()).await?);

            let mut invalid = fake_order();
            invalid.customer.clear();
            assert!(repo.add(invalid, ctx.cancel()).await.is_err());

            let events = seen.lock().clone();
            assert_eq!(
                events,
                vec![
                    (RepositoryEventKind::Added, added.id.clone()),
                    (RepositoryEventKind::Updated, added.id.clone()),
                    (RepositoryEventKind::Removed, added.id.clone()),
                ]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_decorated_repository_still_pages() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = RepositoryBuilder::new(ctx.repository())
                .with(Logging::new("orders"))
                .build();
            for _ in 0..5 {
                repo.add(fake_order(), ctx.cancel()).await?;
            }

            let first = repo.find_all(None, 2, ctx.cancel()).await?;
            assert_eq!(first.len(), 2);
            assert!(first.has_more());
            assert_eq!(repo.find_all_items(2, ctx.cancel()).await?.len(), 5);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_latest_through_decorators() {
    run_test(
        create_test_context,
        |ctx| async move {
            let (seen, record) = recorder();
            let repo = RepositoryBuilder::new(ctx.repository())
                .with(Events::new(dispatcher_fn::<Order, _>(record)))
                .build();
            let added = repo.add(fake_order(), ctx.cancel()).await?;

            let updated = repo
                .update_latest(&added.id, |o: &mut Order| o.total = 1, ctx.cancel())
                .await?;
            assert_eq!(updated.total, 1);
            assert_eq!(seen.lock().len(), 2);
            Ok(())
        },
        cleanup,
    )
}
