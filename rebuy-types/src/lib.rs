pub mod expand;
pub mod expr;
pub mod field;
pub mod lookup;
pub mod project;
pub mod shop;
pub mod sort;
pub mod summarize;
pub mod value;
