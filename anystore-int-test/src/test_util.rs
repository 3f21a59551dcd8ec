use anystore::config::RepositoryConfig;
use anystore::entity::Timestamp;
use anystore::errors::{ErrorKind, StoreError, StoreResult};
use anystore::memory::MemoryRepository;
use anystore_derive::Entity;
use fake::faker::address::en::CityName;
use fake::faker::company::en::Buzzword;
use fake::faker::name::en::Name;
use fake::Fake;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::thread;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Entity)]
#[entity(name = "orders", etag = "etag", timestamp = "modified")]
pub struct Order {
    pub id: String,
    pub etag: Option<String>,
    pub modified: Option<Timestamp>,
    pub customer: String,
    pub city: String,
    pub total: u32,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
}

/// Generates an unsaved order with random customer data.
pub fn fake_order() -> Order {
    let line_count = (1..4).fake::<usize>();
    Order {
        customer: Name().fake(),
        city: CityName().fake(),
        total: (10..1000).fake(),
        lines: (0..line_count)
            .map(|_| OrderLine {
                name: Buzzword().fake(),
                quantity: (1..10).fake(),
            })
            .collect(),
        ..Order::default()
    }
}

pub fn fake_orders(count: usize) -> Vec<Order> {
    (0..count).map(|_| fake_order()).collect()
}

/// Runs an async test on a fresh runtime with retry logic and error handling.
pub fn run_test<B, T, F, A>(before: B, test: T, after: A)
where
    B: Fn() -> StoreResult<TestContext>,
    T: Fn(TestContext) -> F,
    F: Future<Output = StoreResult<()>>,
    A: Fn(TestContext) -> StoreResult<()>,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let backtrace = Backtrace::capture();
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => return Err((format!("Runtime failed: {:?}", e), backtrace.to_string())),
            };

            match before() {
                Ok(ctx) => match runtime.block_on(test(ctx.clone())) {
                    Ok(_) => match after(ctx) {
                        Ok(_) => Ok(()),
                        Err(e) => Err((format!("After run failed: {:?}", e), backtrace.to_string())),
                    },
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        }));

        let elapsed = start_time.elapsed();

        match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                last_error = Some(e.clone());
                last_backtrace = Some(bt);
                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("Error: {}", e);
                    thread::sleep(Duration::from_millis(50 * attempt as u64));
                }
            }
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                last_error = Some(format!("Panic: {}", err_msg));
                last_backtrace = Some(Backtrace::capture().to_string());

                if attempt < MAX_RETRIES {
                    eprintln!(
                        "\n========== Test Attempt {}/{} Panicked (took {:?}) ==========",
                        attempt, MAX_RETRIES, elapsed
                    );
                    eprintln!("Panic: {}", err_msg);
                    thread::sleep(Duration::from_millis(50 * attempt as u64));
                }
            }
        }
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    name: String,
    repository: MemoryRepository<Order>,
    cancel: CancellationToken,
}

impl TestContext {
    pub fn new(name: String, repository: MemoryRepository<Order>) -> Self {
        Self {
            name,
            repository,
            cancel: CancellationToken::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repository(&self) -> MemoryRepository<Order> {
        self.repository.clone()
    }

    pub fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }
}

pub fn random_name() -> String {
    format!("memory-{}", uuid::Uuid::new_v4())
}

pub fn create_test_context() -> StoreResult<TestContext> {
    let name = random_name();
    let config = RepositoryConfig::builder()
        .backend_name(&name)
        .build()?;
    let repository = MemoryRepository::builder().config(config).build()?;
    Ok(TestContext::new(name, repository))
}

pub fn cleanup(ctx: TestContext) -> StoreResult<()> {
    ctx.repository().store().clear();
    if !ctx.repository().store().is_empty() {
        return Err(StoreError::new(
            "Store still holds entities after cleanup",
            ErrorKind::InternalError,
        ));
    }
    Ok(())
}
