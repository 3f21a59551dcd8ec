//! Data generators for benchmarks

use anystore::entity::Timestamp;
use anystore_derive::Entity;
use fake::faker::address::en::CityName;
use fake::faker::company::en::Buzzword;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Entity)]
#[entity(name = "bench_orders", etag = "etag", timestamp = "modified")]
pub struct BenchOrder {
    pub id: String,
    pub etag: Option<String>,
    pub modified: Option<Timestamp>,
    pub customer: String,
    pub city: String,
    pub total: u32,
    pub lines: Vec<BenchLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchLine {
    pub name: String,
    pub quantity: u32,
}

/// Generate unsaved orders with one to four lines each
pub fn generate_orders(count: usize) -> Vec<BenchOrder> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let line_count = rng.gen_range(1..5);
            BenchOrder {
                customer: Name().fake(),
                city: CityName().fake(),
                total: rng.gen_range(1..10_000),
                lines: (0..line_count)
                    .map(|_| BenchLine {
                        name: Buzzword().fake(),
                        quantity: rng.gen_range(1..20),
                    })
                    .collect(),
                ..BenchOrder::default()
            }
        })
        .collect()
}
