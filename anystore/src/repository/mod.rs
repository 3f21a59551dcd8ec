//! The uniform repository contract.
//!
//! The contract is split into capability traits so that a backend (or a
//! decorator over a backend) implements exactly the operations it supports:
//!
//! | trait | operation |
//! |---|---|
//! | [`RepositoryAdd`] | `add` |
//! | [`RepositoryGet`] | `try_get_by_id` |
//! | [`RepositoryUpdate`] | `update` |
//! | [`RepositoryAddOrUpdate`] | `add_or_update` |
//! | [`RepositoryRemove`] | `try_remove` |
//! | [`RepositoryFind`] | `find`, `find_all`, `find_all_items` |
//!
//! [`Repository`] is implemented for anything that has all six.
//! [`RepositoryExt`] layers the throwing and retrying helpers on top.

mod capability;
mod ext;

pub use capability::*;
pub use ext::*;
