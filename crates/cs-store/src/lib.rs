//! `cs-store` — the shared, namespaced key/value space entities talk through.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`store`]    | `StateStore`, `Node`, `Tree`, `CollisionPolicy`         |
//! | [`namespace`]| `make_namespace`, `qualify`, `split_key`, delimiter     |
//! | [`error`]    | `StoreError`, `StoreResult<T>`                          |
//!
//! # Key model
//!
//! A key such as `"C:outputs:real_output"` is a path of segments joined by
//! [`NAMESPACE_DELIMITER`].  The store keeps an explicit tree of branch nodes
//! keyed by segment, so `get_all("C:outputs")` returns the whole sub-tree
//! without scanning unrelated keys.  Only the latest value per key is kept.
//!
//! # Concurrency
//!
//! None.  The environment resumes exactly one process at a time and hands it
//! `&mut StateStore`, so every access is serialised by construction.

pub mod error;
pub mod namespace;
pub mod store;


pub use error::{StoreError, StoreResult};
pub use namespace::{NAMESPACE_DELIMITER, make_namespace, qualify, split_key};
pub use store::{CollisionPolicy, Node, StateStore, Tree};
