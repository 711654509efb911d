pub mod algorithm;
pub mod node;
pub mod selector;
