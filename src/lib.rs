//! Interactive SQLite shell: rustyline line editing with lexical syntax
//! highlighting and completion, statements executed through rusqlite,
//! results rendered as ASCII tables.

pub mod commands;
pub mod db;
pub mod helper;
pub mod history;
pub mod repl;
pub mod syntax;
pub mod table;
pub mod token;

pub use db::{Database, Execution};
pub use helper::ReplHelper;
pub use repl::Repl;
