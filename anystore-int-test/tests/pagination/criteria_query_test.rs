use anystore::errors::{ErrorKind, StoreResult};
use anystore::query::{desc, property, CriteriaQuery, MirrorQuery};
use anystore::repository::{RepositoryAdd, RepositoryFind};
use anystore_int_test::test_util::{
    cleanup, create_test_context, fake_order, run_test, Order, OrderLine, TestContext,
};

async fn seed(ctx: &TestContext) -> StoreResult<()> {
    let repo = ctx.repository();
    let specs: [(&str, u32, &[&str]); 6] = [
        ("Porto", 120, &["widget", "bolt"]),
        ("Porto", 80, &["gadget"]),
        ("Lisbon", 300, &["widget"]),
        ("Lisbon", 40, &["nut", "bolt"]),
        ("Faro", 200, &["widget", "gadget"]),
        ("Faro", 10, &[]),
    ];
    for (city, total, lines) in specs {
        let mut order = fake_order();
        order.city = city.to_string();
        order.total = total;
        order.lines = lines
            .iter()
            .map(|name| OrderLine {
                name: name.to_string(),
                quantity: 1,
            })
            .collect();
        repo.add(order, ctx.cancel()).await?;
    }
    Ok(())
}

#[test]
fn test_collection_path_matches_any_element() {
    run_test(
        create_test_context,
        |ctx| async move {
            seed(&ctx).await?;
            let query = CriteriaQuery::new()
                .filter(property("lines[].name").eq("widget"))
                .order_by(desc("total"));

            let page = ctx.repository().find::<_, Order>(&query, ctx.cancel()).await?;
            let totals = page.iter().map(|o| o.total).collect::<Vec<_>>();
            assert_eq!(totals, vec![300, 200, 120]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_criteria_combine_with_and() {
    run_test(
        create_test_context,
        |ctx| async move {
            seed(&ctx).await?;
            let query = CriteriaQuery::new()
                .filter(property("city").is_in(["Porto", "Faro"]))
                .filter(property("total").gte(100))
                .order_by(desc("total"));

            let page = ctx.repository().find::<_, Order>(&query, ctx.cancel()).await?;
            let cities = page.iter().map(|o| o.city.as_str()).collect::<Vec<_>>();
            assert_eq!(cities, vec!["Faro", "Porto"]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_criteria_pages_keep_filter_and_order() {
    run_test(
        create_test_context,
        |ctx| async move {
            seed(&ctx).await?;
            let repo = ctx.repository();
            let query = CriteriaQuery::new()
                .filter(property("total").gt(30))
                .order_by(desc("total"))
                .with_limit(2);

            let first = repo.find::<_, Order>(&query, ctx.cancel()).await?;
            let next = query
                .clone()
                .with_continuation_token(first.continuation_token());
            let second = repo.find::<_, Order>(&next, ctx.cancel()).await?;
            let last = query
                .clone()
                .with_continuation_token(second.continuation_token());
            let third = repo.find::<_, Order>(&last, ctx.cancel()).await?;

            let totals = first
                .iter()
                .chain(second.iter())
                .chain(third.iter())
                .map(|o| o.total)
                .collect::<Vec<_>>();
            assert_eq!(totals, vec![300, 200, 120, 80, 40]);
            assert!(third.continuation_token().is_none());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_path_is_bad_input() {
    run_test(
        create_test_context,
        |ctx| async move {
            let query = CriteriaQuery::new().filter(property("lines[x].name").eq("widget"));
            let err = ctx
                .repository()
                .find::<_, Order>(&query, ctx.cancel())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::BadInput);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_mirror_query_matches_set_properties() {
    run_test(
        create_test_context,
        |ctx| async move {
            seed(&ctx).await?;
            let prototype = Order {
                city: "Lisbon".to_string(),
                ..Order::default()
            };

            let page = ctx
                .repository()
                .find::<_, Order>(&MirrorQuery::new(prototype), ctx.cancel())
                .await?;
            let mut totals = page.iter().map(|o| o.total).collect::<Vec<_>>();
            totals.sort();
            assert_eq!(totals, vec![40, 300]);
            Ok(())
        },
        cleanup,
    )
}
