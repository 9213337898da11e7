//! Grammar productions, split by syntactic category.

mod expr;
mod function;
mod stmt;
