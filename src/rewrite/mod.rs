pub mod apply;
pub mod imports;
pub mod patterns;
pub mod tree;

pub use apply::WriteMode;
pub use tree::fix_tree;
