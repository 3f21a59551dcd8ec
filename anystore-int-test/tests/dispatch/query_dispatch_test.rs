use anystore::continuation::{ContinuationEnumerable, OffsetPaginator};
use anystore::errors::{ErrorKind, StoreResult};
use anystore::handler::{handler_fn, HandlerModule, HandlerRegistryBuilder, QueryHandler};
use anystore::memory::{MemoryRepository, MemoryStore};
use anystore::query::{AllQuery, CriteriaQuery, Query, QueryOptions};
use anystore::repository::{RepositoryAdd, RepositoryFind};
use anystore_int_test::test_util::{
    cleanup, create_test_context, fake_order, fake_orders, run_test, Order,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Orders shipped to one city.
struct ByCityQuery {
    city: String,
    options: QueryOptions,
}

impl ByCityQuery {
    fn new(city: &str) -> Self {
        ByCityQuery {
            city: city.to_string(),
            options: QueryOptions::default(),
        }
    }
}

impl Query for ByCityQuery {
    fn options(&self) -> &QueryOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq)]
struct OrderSummary {
    id: String,
    total: u32,
}

struct ByCityHandler {
    store: MemoryStore<Order>,
    paginator: OffsetPaginator,
}

#[async_trait]
impl QueryHandler<Order, ByCityQuery, OrderSummary> for ByCityHandler {
    async fn execute(
        &self,
        query: &ByCityQuery,
        _cancel: &CancellationToken,
    ) -> StoreResult<ContinuationEnumerable<OrderSummary>> {
        let matching = self
            .store
            .snapshot()
            .into_iter()
            .filter(|o| o.city == query.city)
            .map(|o| OrderSummary {
                id: o.id,
                total: o.total,
            })
            .collect::<Vec<_>>();
        self.paginator.page(query.options(), matching)
    }
}

struct ReportingModule {
    store: MemoryStore<Order>,
}

impl HandlerModule for ReportingModule {
    fn name(&self) -> &str {
        "reporting"
    }

    fn load(&self, registrar: &mut HandlerRegistryBuilder) -> StoreResult<()> {
        registrar.register::<Order, ByCityQuery, OrderSummary, _>(ByCityHandler {
            store: self.store.clone(),
            paginator: OffsetPaginator::new(),
        })?;

        let store = self.store.clone();
        registrar.register::<Order, AllQuery, String, _>(handler_fn(
            move |_query: &AllQuery, _cancel| {
                let customers = store
                    .snapshot()
                    .into_iter()
                    .map(|o| o.customer)
                    .collect::<Vec<_>>();
                Ok(ContinuationEnumerable::new(customers, None))
            },
        ))
    }
}

fn reporting_repository() -> StoreResult<MemoryRepository<Order>> {
    let builder = MemoryRepository::<Order>::builder();
    let store = builder.store_handle();
    builder.load_module(ReportingModule { store }).build()
}

#[test]
fn test_custom_query_reaches_its_handler() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = reporting_repository()?;
            let mut expected = Vec::new();
            for (i, mut order) in fake_orders(4).into_iter().enumerate() {
                order.city = if i % 2 == 0 { "Braga" } else { "Evora" }.to_string();
                let added = repo.add(order, ctx.cancel()).await?;
                if added.city == "Braga" {
                    expected.push(OrderSummary {
                        id: added.id,
                        total: added.total,
                    });
                }
            }

            let page = repo
                .find::<_, OrderSummary>(&ByCityQuery::new("Braga"), ctx.cancel())
                .await?;
            assert_eq!(page.items(), expected.as_slice());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_result_type_selects_handler() {
    run_test(
        create_test_context,
        |ctx| async move {
            let repo = reporting_repository()?;
            let added = repo.add(fake_order(), ctx.cancel()).await?;

            let orders = repo.find::<_, Order>(&AllQuery::new(), ctx.cancel()).await?;
            assert_eq!(orders.items(), &[added.clone()]);

            let customers = repo.find::<_, String>(&AllQuery::new(), ctx.cancel()).await?;
            assert_eq!(customers.items(), &[added.customer]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unregistered_query_is_unsupported() {
    run_test(
        create_test_context,
        |ctx| async move {
            let err = ctx
                .repository()
                .find::<_, OrderSummary>(&ByCityQuery::new("Braga"), ctx.cancel())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnsupportedFeature);
            assert!(err.message().contains("ByCityQuery"));
            assert!(err.message().contains("orders"));
            assert!(err.message().contains(ctx.name()));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_registry_lists_loaded_signatures() {
    run_test(
        create_test_context,
        |_ctx| async move {
            let repo = reporting_repository()?;
            let registry = repo.registry();
            assert_eq!(registry.len(), 5);
            assert!(registry.contains::<Order, ByCityQuery, OrderSummary>());
            assert!(registry.contains::<Order, CriteriaQuery, Order>());
            assert!(!registry.contains::<Order, ByCityQuery, Order>());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_signature_fails_build() {
    run_test(
        create_test_context,
        |_ctx| async move {
            let builder = MemoryRepository::<Order>::builder();
            let store = builder.store_handle();
            let result = builder
                .load_module(ReportingModule {
                    store: store.clone(),
                })
                .load_module(ReportingModule { store })
                .build();
            match result {
                Ok(_) => panic!("duplicate registration should fail"),
                Err(err) => assert_eq!(err.kind(), &ErrorKind::InvalidOperation),
            }
            Ok(())
        },
        cleanup,
    )
}
