use anystore::errors::{ErrorKind, StoreResult};
use anystore::repository::{
    RepositoryAdd, RepositoryAddOrUpdate, RepositoryExt, RepositoryGet, RepositoryRemove,
    RepositoryUpdate,
};
use anystore_int_test::test_util::{cleanup, create_test_context, fake_order, run_test};

#[test]
fn test_add_generates_identity() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let order = repo.add(fake_order(), ctx.cancel()).await?;

            assert!(!order.id.is_empty());
            assert!(order.etag.is_some());
            assert!(order.modified.is_some());

            let stored = repo.get_by_id(&order.id, ctx.cancel()).await?;
            assert_eq!(stored, order);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_add_keeps_caller_id() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let mut order = fake_order();
            order.id = "order-1".to_string();

            let added = repo.add(order, ctx.cancel()).await?;
            assert_eq!(added.id, "order-1");
            assert!(repo.try_get_by_id("order-1", ctx.cancel()).await?.is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_add_duplicate_id_conflicts() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let first = repo.add(fake_order(), ctx.cancel()).await?;

            let mut second = fake_order();
            second.id = first.id.clone();
            let err = repo.add(second, ctx.cancel()).await.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::Conflict);
            assert_eq!(repo.store().len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_get_missing_entity() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            assert!(repo.try_get_by_id("missing", ctx.cancel()).await?.is_none());

            let err = repo.get_by_id("missing", ctx.cancel()).await.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_unknown_is_not_found() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let mut order = fake_order();
            order.id = "never-added".to_string();

            let err = repo.update(order, ctx.cancel()).await.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_refreshes_etag_and_rejects_stale_copy() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let added = repo.add(fake_order(), ctx.cancel()).await?;

            let mut fresh = added.clone();
            fresh.total += 1;
            let updated = repo.update(fresh, ctx.cancel()).await?;
            assert_ne!(updated.etag, added.etag);

            let mut stale = added.clone();
            stale.total += 2;
            let err = repo.update(stale, ctx.cancel()).await.unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::Concurrency);

            let stored = repo.get_by_id(&added.id, ctx.cancel()).await?;
            assert_eq!(stored.total, added.total + 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_add_or_update_reports_branch() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let created = repo.add_or_update(fake_order(), ctx.cancel()).await?;
            assert!(created.was_added);

            let mut changed = created.entity.clone();
            changed.city = "Lisbon".to_string();
            let result = repo.add_or_update(changed, ctx.cancel()).await?;
            assert!(!result.was_added);
            assert_eq!(result.entity.city, "Lisbon");
            assert_eq!(repo.store().len(), 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_try_remove() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let order = repo.add(fake_order(), ctx.cancel()).await?;

            assert!(repo.try_remove(&order.id, ctx.cancel()).await?);
            assert!(!repo.try_remove(&order.id, ctx.cancel()).await?);
            assert!(repo.try_get_by_id(&order.id, ctx.cancel()).await?.is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_cancelled_add_writes_nothing() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            ctx.cancel().cancel();

            let result: StoreResult<_> = repo.add(fake_order(), ctx.cancel()).await;
            assert_eq!(result.unwrap_err().kind(), &ErrorKind::Cancelled);
            assert!(repo.store().is_empty());
            Ok(())
        },
        cleanup,
    )
}
