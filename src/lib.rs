//! Content-addressed object storage for vit repositories.
//!
//! File contents become blob objects and directories become tree objects.
//! Every object is stored under `.vit/objects/<2 hex>/<38 hex>` as the zlib
//! compressed form of `"<kind> <size>\0<payload>"`, addressed by the SHA-1 of
//! that uncompressed encoding.
//!
//! ```no_run
//! use std::path::Path;
//! use vit_store::{ObjectKind, ObjectStore, TreeBuilder};
//!
//! let store = ObjectStore::new("/tmp/objects");
//! let blob = store.put(ObjectKind::Blob, b"hi\n")?;
//! let tree = TreeBuilder::new(&store).build(Path::new("."))?;
//! println!("{blob} {tree}");
//! # Ok::<(), vit_store::Error>(())
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::cli;
pub use error::{Error, Result};
pub use utils::{
    EntryMode, ObjectId, ObjectKind, ObjectStore, Repository, SpecialFiles, Tree, TreeBuilder,
    TreeEntry, decode, encode, hash_object,
};
