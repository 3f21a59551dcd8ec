use crate::common::get_current_time_or_zero;
use log::{info, warn};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const MAX_NODE_ID: u64 = (1 << NODE_ID_BITS) - 1;
const TIMESTAMP_LEFT_SHIFT: u64 = SEQUENCE_BITS + NODE_ID_BITS;
const EPOCH: u64 = 1288834974657;

struct SnowflakeState {
    last_timestamp: u64,
    sequence: u64,
}

/// Time-ordered 64-bit identity generator.
///
/// Layout: milliseconds since a fixed epoch, a random node id, and a
/// per-millisecond sequence. Ids from one generator are strictly increasing.
pub struct SnowflakeIdGenerator {
    node_id: u64,
    state: Mutex<SnowflakeState>,
}

impl Default for SnowflakeIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SnowflakeIdGenerator {
    pub fn new() -> Self {
        let mut node_id = Self::random_node_id();
        if node_id > MAX_NODE_ID {
            warn!("Node id can't be greater than {}", MAX_NODE_ID);
            node_id = OsRng.gen_range(1..=MAX_NODE_ID);
        }
        info!("Snowflake id generator initialized with node id: {}", node_id);

        SnowflakeIdGenerator {
            node_id,
            state: Mutex::new(SnowflakeState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    pub fn get_id(&self) -> u64 {
        let mut state = self.state.lock();
        let mut timestamp = (get_current_time_or_zero() as u64).max(EPOCH);

        // clock moved backwards: stay on the last observed millisecond
        if timestamp < state.last_timestamp {
            timestamp = state.last_timestamp;
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // sequence exhausted for this millisecond, borrow the next one
                timestamp += 1;
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        ((timestamp - EPOCH) << TIMESTAMP_LEFT_SHIFT)
            | (self.node_id << SEQUENCE_BITS)
            | state.sequence
    }

    fn random_node_id() -> u64 {
        let uuid = uuid::Uuid::new_v4();
        let uid = uuid.as_bytes();
        let rnd_byte = OsRng.gen::<u64>() & 0x000000FF;

        ((0x000000FF & uid[uid.len() - 1] as u64) | (0x0000FF00 & (rnd_byte << 8))) >> 6
    }
}
