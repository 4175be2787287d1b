pub mod fake;
pub mod tree;
