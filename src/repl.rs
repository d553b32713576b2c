//! The read-eval-print loop.
//!
//! Reads lines through rustyline (history, editing, highlighting,
//! completion via [`ReplHelper`]), dispatches dot commands immediately, and
//! accumulates SQL across lines until a terminating `;` before executing.
//! The prompt switches from `sqlish>` to `   ...>` while a statement is
//! open. Ctrl+C discards the open statement; Ctrl+D (or `.quit`) leaves the
//! loop. Statement errors print and the loop continues.

use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::commands::{CommandHandler, CommandResult};
use crate::db::{Database, Execution};
use crate::helper::ReplHelper;
use crate::history::history_path;
use crate::table::TableFormatter;

const PRIMARY_PROMPT: &str = "sqlish> ";
const CONTINUATION_PROMPT: &str = "   ...> ";

pub struct Repl {
    db: Database,
    editor: Editor<ReplHelper, DefaultHistory>,
    sql_buffer: String,
}

impl Repl {
    pub fn new(db: Database) -> Result<Self> {
        let mut editor: Editor<ReplHelper, DefaultHistory> =
            Editor::new().context("failed to initialize line editor")?;
        editor.set_helper(Some(ReplHelper::new()));

        if let Some(history_file) = history_path() {
            let _ = editor.load_history(&history_file);
        }

        let mut repl = Self {
            db,
            editor,
            sql_buffer: String::new(),
        };
        repl.refresh_completions();
        Ok(repl)
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = if self.sql_buffer.is_empty() {
                PRIMARY_PROMPT
            } else {
                CONTINUATION_PROMPT
            };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Cancel the statement being typed, keep the session.
                    self.sql_buffer.clear();
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye");
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return true;
        }

        if self.sql_buffer.is_empty() && CommandHandler::is_command(trimmed) {
            self.editor.add_history_entry(trimmed).ok();
            return self.execute_command(trimmed);
        }

        if !self.sql_buffer.is_empty() {
            self.sql_buffer.push(' ');
        }
        self.sql_buffer.push_str(trimmed);

        if self.sql_buffer.trim_end().ends_with(';') {
            let sql = std::mem::take(&mut self.sql_buffer);
            self.editor.add_history_entry(&sql).ok();
            self.execute_sql(&sql);
        }

        true
    }

    fn execute_command(&mut self, input: &str) -> bool {
        match CommandHandler::execute(input, &self.db) {
            CommandResult::Exit => false,
            CommandResult::Output(text) => {
                println!("{}", text);
                true
            }
            CommandResult::Continue => true,
            CommandResult::Error(msg) => {
                eprintln!("Error: {}", msg);
                true
            }
        }
    }

    fn execute_sql(&mut self, sql: &str) {
        let start = Instant::now();

        match self.db.execute(sql) {
            Ok(result) => {
                self.print_result(result, start.elapsed());
                self.refresh_completions();
            }
            Err(err) => {
                eprintln!("Error: {:#}", err);
            }
        }
    }

    fn print_result(&self, result: Execution, elapsed: Duration) {
        match result {
            Execution::Rows { columns, rows } => {
                if rows.is_empty() {
                    println!("Empty set ({:.3} sec)", elapsed.as_secs_f64());
                } else {
                    let formatter = TableFormatter::new(&columns, &rows);
                    println!("{}", formatter.render());
                    println!(
                        "{} row{} in set ({:.3} sec)",
                        formatter.row_count(),
                        if formatter.row_count() == 1 { "" } else { "s" },
                        elapsed.as_secs_f64()
                    );
                }
            }
            Execution::Affected { count } => {
                println!(
                    "Query OK, {} row{} affected ({:.3} sec)",
                    count,
                    if count == 1 { "" } else { "s" },
                    elapsed.as_secs_f64()
                );
            }
        }
    }

    /// Push the current table names into the completer. Runs at startup and
    /// after every successful statement.
    fn refresh_completions(&mut self) {
        match self.db.table_names() {
            Ok(names) => {
                if let Some(helper) = self.editor.helper_mut() {
                    helper.set_table_names(names);
                }
            }
            Err(err) => log::debug!("completion refresh failed: {err:#}"),
        }
    }

    fn print_welcome(&self) {
        println!("sqlish {}", env!("CARGO_PKG_VERSION"));
        println!("Enter \".help\" for usage hints.");
        match self.db.path() {
            Some(path) => println!("Connected to: {}", path.display()),
            None => println!("Connected to a transient in-memory database."),
        }
        println!();
    }

    fn save_history(&mut self) {
        if let Some(history_file) = history_path() {
            if let Err(e) = self.editor.save_history(&history_file) {
                eprintln!("Warning: could not save history: {}", e);
            }
        }
    }
}
