// query constants
pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_MAX_UPDATE_RETRIES: usize = 3;

// backend constants
pub const MEMORY_BACKEND: &str = "memory";

// event constants
pub const REPOSITORY_EVENT: &str = "anystore_repository_event";
