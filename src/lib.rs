//! A tiny singly linked list library with a line-oriented command REPL.
//!
//! The crate has two layers. [`list::LinkedList`] is the core: an ordered,
//! position-indexed sequence with front/back insertion, positional
//! insert/remove/get, predicate search, and full clear. Around it sits a
//! small interpreter that maps textual command names (`append`, `get`,
//! `insertat`, ...) onto list operations, with prefix matching for
//! abbreviations, line-tagged error reporting, and a file-based test
//! runner that compares each command's output against an expected field on
//! the same line.
//!
//! The main entry point is [`Interpreter`], which owns one shared
//! `LinkedList<i64>` and a pluggable set of command factories. The
//! [`command`] module exposes the traits for implementing commands of your
//! own.

mod builtin;
pub mod command;
mod interpreter;
pub mod list;
mod parser;

pub use interpreter::{Interpreter, LineResult};
pub use list::{LinkedList, ListError};
