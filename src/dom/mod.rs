pub mod distill;
pub mod node;
pub mod serialize;
