#![doc = include_str!("../README.md")]

pub mod lexer;
pub mod parser;

pub use lexer::{lex, Lexer};
pub use parser::{parse, Module, Parser};
