pub mod compress;
pub mod object;
pub mod object_id;
pub mod repository;
pub mod store;
pub mod tree;
pub mod tree_entry;

pub use compress::*;
pub use object::*;
pub use object_id::*;
pub use repository::*;
pub use store::*;
pub use tree::*;
pub use tree_entry::*;
