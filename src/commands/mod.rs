pub mod cat_file;
pub mod hash_object;
pub mod init;
pub mod ls_tree;
pub mod write_tree;

pub use cat_file::*;
pub use hash_object::*;
pub use init::*;
pub use ls_tree::*;
pub use write_tree::*;
