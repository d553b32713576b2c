//! Dot command parsing and execution.
//!
//! Lines starting with `.` are shell commands, not SQL: they run immediately
//! and never enter the statement buffer. Commands are case-insensitive and
//! take whitespace-separated arguments. Each returns a [`CommandResult`]
//! telling the REPL what to print and whether to keep going.

use crate::db::Database;

/// Canonical command names, used by the completer. Aliases are accepted by
/// the dispatcher but not offered as candidates.
pub const DOT_COMMANDS: &[&str] = &[".exit", ".help", ".indexes", ".quit", ".schema", ".tables"];

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Output(String),
    Exit,
    Continue,
    Error(String),
}

pub struct CommandHandler;

impl CommandHandler {
    pub fn is_command(input: &str) -> bool {
        input.trim_start().starts_with('.')
    }

    pub fn execute(input: &str, db: &Database) -> CommandResult {
        let parts: Vec<&str> = input.split_whitespace().collect();

        let Some(cmd) = parts.first() else {
            return CommandResult::Continue;
        };
        let cmd = cmd.to_lowercase();
        let args = &parts[1..];

        match cmd.as_str() {
            ".quit" | ".exit" | ".q" => CommandResult::Exit,
            ".help" | ".h" | ".?" => CommandResult::Output(help_text()),
            ".tables" => list_tables(db),
            ".schema" => show_schema(db, args),
            ".indexes" => list_indexes(db, args),
            _ => CommandResult::Error(format!(
                "Unknown command: {}. Type .help for available commands.",
                cmd
            )),
        }
    }
}

fn help_text() -> String {
    r#"sqlish commands:

  .quit, .exit, .q     Exit the shell
  .help, .h, .?        Show this help message
  .tables              List tables and views
  .schema [TABLE]      Show CREATE statements for TABLE (or everything)
  .indexes [TABLE]     List indexes (optionally for a specific table)

SQL statements end with a semicolon (;) and may span multiple lines.
Use Ctrl+C to cancel the statement being typed.
Use Ctrl+D or .quit to exit."#
        .to_string()
}

fn list_tables(db: &Database) -> CommandResult {
    match db.table_names() {
        Ok(tables) if tables.is_empty() => CommandResult::Output("No tables found.".to_string()),
        Ok(tables) => CommandResult::Output(tables.join("\n")),
        Err(err) => CommandResult::Error(format!("{err:#}")),
    }
}

fn show_schema(db: &Database, args: &[&str]) -> CommandResult {
    let table = args.first().copied();
    match db.schema_sql(table) {
        Ok(statements) if statements.is_empty() => match table {
            Some(table) => CommandResult::Error(format!("Table '{}' not found.", table)),
            None => CommandResult::Output("No tables found.".to_string()),
        },
        Ok(statements) => CommandResult::Output(statements.join("\n\n")),
        Err(err) => CommandResult::Error(format!("{err:#}")),
    }
}

fn list_indexes(db: &Database, args: &[&str]) -> CommandResult {
    match db.indexes(args.first().copied()) {
        Ok(indexes) if indexes.is_empty() => CommandResult::Output("No indexes found.".to_string()),
        Ok(indexes) => CommandResult::Output(indexes.join("\n")),
        Err(err) => CommandResult::Error(format!("{err:#}")),
    }
}
