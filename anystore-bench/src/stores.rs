//! Repository factory functions for benchmarks

use crate::data_gen::generate_orders;
use crate::data_gen::BenchOrder;
use anystore::errors::StoreResult;
use anystore::memory::MemoryRepository;
use anystore::repository::RepositoryAdd;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

/// Runtime shared by the async benchmark bodies.
pub fn bench_runtime() -> Runtime {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => panic!("failed to build benchmark runtime: {}", e),
    }
}

/// Creates a memory repository pre-populated with `count` generated orders.
pub fn create_populated_repository(
    runtime: &Runtime,
    count: usize,
) -> StoreResult<MemoryRepository<BenchOrder>> {
    let repository = MemoryRepository::new()?;
    let cancel = CancellationToken::new();
    runtime.block_on(async {
        for order in generate_orders(count) {
            repository.add(order, &cancel).await?;
        }
        log::debug!("Populated benchmark repository with {} orders", count);
        StoreResult::Ok(())
    })?;
    Ok(repository)
}
