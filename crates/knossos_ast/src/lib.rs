#![doc = include_str!("../README.md")]

pub mod block;
pub mod expr;
pub mod signature;
pub mod typed;
pub mod types;
