use anystore::decorator::{
    EventBusDispatcher, Events, RepositoryBuilder, RepositoryEvent, RepositoryEventKind,
    RepositoryEventListener,
};
use anystore::errors::{ErrorKind, StoreError};
use anystore::repository::{RepositoryAdd, RepositoryAddOrUpdate, RepositoryGet};
use anystore_int_test::test_util::{cleanup, create_test_context, fake_order, run_test, Order};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_bus_listeners_receive_events() {
    run_test(
        create_test_context,
        |ctx| async move {
            let bus = EventBusDispatcher::<Order>::new();
            let kinds = Arc::new(Mutex::new(Vec::new()));
            let sink = kinds.clone();
            bus.register(RepositoryEventListener::new(
                move |event: RepositoryEvent<Order>| {
                    sink.lock()
                        .push(event.kind());
                    Ok(())
                },
            ))?;

            let repo = RepositoryBuilder::new(ctx.repository())
                .with(Events::new(bus.clone()))
                .build();
            let first = repo.add_or_update(fake_order(), ctx.cancel()).await?;
            repo.add_or_update(first.entity, ctx.cancel()).await?;

            assert_eq!(
                *kinds.lock(),
                vec![RepositoryEventKind::Added, RepositoryEventKind::Updated]
            );
            bus.close()?;
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_listener_failure_surfaces_after_write() {
    run_test(
        create_test_context,
        |ctx| async move {
            let bus = EventBusDispatcher::<Order>::new();
            bus.register(RepositoryEventListener::new(|_event: RepositoryEvent<Order>| {
                Err(StoreError::new("listener down", ErrorKind::BackendError))
            }))?;

            let repo = RepositoryBuilder::new(ctx.repository())
                .with(Events::new(bus))
                .build();
            let mut order = fake_order();
            order.id = "order-9".to_string();

            let err = repo.add(order, ctx.cancel()).await.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EventError);
            assert!(repo.try_get_by_id("order-9", ctx.cancel()).await?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_deregistered_listener_is_silent() {
    run_test(
        create_test_context,
        |ctx| async move {
            let bus = EventBusDispatcher::<Order>::new();
            let count = Arc::new(Mutex::new(0usize));
            let sink = count.clone();
            let subscriber = bus.register(RepositoryEventListener::new(
                move |_event: RepositoryEvent<Order>| {
                    *sink.lock() += 1;
                    Ok(())
                },
            ))?;
            bus.deregister(subscriber)?;
            assert!(!bus.has_listeners());

            let repo = RepositoryBuilder::new(ctx.repository())
                .with(Events::new(bus))
                .build();
            repo.add(fake_order(), ctx.cancel()).await?;
            assert_eq!(*count.lock(), 0);
            Ok(())
        },
        cleanup,
    )
}
