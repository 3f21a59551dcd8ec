use anystore::config::RepositoryConfig;
use anystore::errors::ErrorKind;
use anystore::memory::MemoryRepository;
use anystore::query::AllQuery;
use anystore::repository::{RepositoryAdd, RepositoryFind};
use anystore_int_test::test_util::{cleanup, create_test_context, fake_orders, run_test, Order};
use std::collections::HashSet;

#[test]
fn test_pages_cover_every_entity_once() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            for order in fake_orders(10) {
                repo.add(order, ctx.cancel()).await?;
            }

            let mut sizes = Vec::new();
            let mut seen = HashSet::new();
            let mut token: Option<String> = None;
            loop {
                let page = repo.find_all(token.as_deref(), 3, ctx.cancel()).await?;
                sizes.push(page.len());
                for order in page.iter() {
                    assert!(seen.insert(order.id.clone()), "duplicate id {}", order.id);
                }
                match page.continuation_token() {
                    Some(next) => token = Some(next.to_string()),
                    None => break,
                }
            }

            assert_eq!(sizes, vec![3, 3, 3, 1]);
            assert_eq!(seen.len(), 10);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_all_items_walks_every_page() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            let mut added = Vec::new();
            for order in fake_orders(7) {
                added.push(repo.add(order, ctx.cancel()).await?.id);
            }

            let items = repo.find_all_items(2, ctx.cancel()).await?;
            let ids = items.into_iter().map(|o| o.id).collect::<Vec<_>>();
            assert_eq!(ids, added);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_exact_multiple_ends_without_token() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            for order in fake_orders(6) {
                repo.add(order, ctx.cancel()).await?;
            }

            let first = repo.find_all(None, 3, ctx.cancel()).await?;
            let second = repo
                .find_all(first.continuation_token(), 3, ctx.cancel())
                .await?;
            assert_eq!(second.len(), 3);
            assert!(second.continuation_token().is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_repository_has_no_token() {
    run_test(
        create_test_context,
        |ctx| async move {
            let page = ctx.repository().find_all(None, 5, ctx.cancel()).await?;
            assert!(page.is_empty());
            assert!(!page.has_more());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_token_is_bad_input() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = ctx.repository();
            for order in fake_orders(2) {
                repo.add(order, ctx.cancel()).await?;
            }

            for token in ["not a token!", "", "eyJub3QiOiJ0b2tlbiJ9"] {
                let err = repo
                    .find_all(Some(token), 1, ctx.cancel())
                    .await
                    .unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::BadInput, "token {:?}", token);
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_zero_limit_is_bad_input() {
    run_test(
        create_test_context,
        |ctx| async move {
            let err = ctx
                .repository()
                .find_all(None, 0, ctx.cancel())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::BadInput);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_configured_default_limit() {
    run_test(
        create_test_context,
        |ctx| async move {
            let config = RepositoryConfig::builder().default_limit(4).build()?;
            let repo = MemoryRepository::<Order>::builder()
                .config(config)
                .build()?;
            for order in fake_orders(5) {
                repo.add(order, ctx.cancel()).await?;
            }

            let query = AllQuery::with_config(repo.config());
            let page = repo.find::<_, Order>(&query, ctx.cancel()).await?;
            assert_eq!(page.len(), 4);
            assert!(page.has_more());
            Ok(())
        },
        cleanup,
    )
}
