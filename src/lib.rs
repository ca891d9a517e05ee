pub mod ast;
pub mod codegen;
pub mod driver;
pub mod env;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod lower;
pub mod natives;
pub mod parser;
pub mod span;
