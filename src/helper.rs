use std::borrow::Cow;
use std::io::Write;

use crossterm::style::Print;
use crossterm::style::ResetColor;
use crossterm::style::SetForegroundColor;
use crossterm::ExecutableCommand;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::Context;
use rustyline_derive::Helper;
use rustyline_derive::Hinter;
use rustyline_derive::Validator;

use crate::commands::DOT_COMMANDS;
use crate::syntax;
use crate::syntax::KEYWORDS;

/// Editor helper wiring syntax highlighting and completion into rustyline.
/// The table-name vocabulary is pushed in by the REPL after statements run,
/// so completion follows whatever DDL the session executes.
#[derive(Helper, Hinter, Validator)]
pub struct ReplHelper {
    table_names: Vec<String>,
}

impl ReplHelper {
    pub fn new() -> Self {
        ReplHelper {
            table_names: Vec::new(),
        }
    }

    pub fn set_table_names(&mut self, names: Vec<String>) {
        self.table_names = names;
    }
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let spans = syntax::classify(line);
        if spans.is_empty() {
            return Cow::Borrowed(line);
        }

        let mut output = Vec::with_capacity(line.len() * 2);
        let mut cursor = 0;
        for (span, semantic) in spans {
            if cursor < span.start {
                output.write_all(line[cursor..span.start].as_bytes()).unwrap();
            }
            output
                .execute(SetForegroundColor(semantic.color()))
                .unwrap()
                .execute(Print(&line[span.start..span.end]))
                .unwrap()
                .execute(ResetColor)
                .unwrap();
            cursor = span.end;
        }
        if cursor < line.len() {
            output.write_all(line[cursor..].as_bytes()).unwrap();
        }

        Cow::Owned(String::from_utf8(output).unwrap())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let indent = line.len() - line.trim_start().len();

        // Dot-command lines complete against the command table instead of SQL.
        if line[indent..].starts_with('.') && pos >= indent {
            let prefix = &line[indent..pos];
            let candidates = DOT_COMMANDS
                .iter()
                .filter(|name| name.starts_with(prefix))
                .map(|name| pair(name))
                .collect();
            return Ok((indent, candidates));
        }

        let start = word_start(line, pos);
        let word = &line[start..pos];

        let mut candidates: Vec<Pair> = KEYWORDS
            .iter()
            .filter(|kw| kw.len() >= word.len() && kw[..word.len()].eq_ignore_ascii_case(word))
            .map(|kw| pair(kw))
            .collect();

        candidates.extend(
            self.table_names
                .iter()
                .filter(|name| {
                    name.len() >= word.len() && name[..word.len()].eq_ignore_ascii_case(word)
                })
                .map(|name| pair(name)),
        );

        Ok((start, candidates))
    }
}

fn pair(candidate: &str) -> Pair {
    Pair {
        display: candidate.to_string(),
        replacement: candidate.to_string(),
    }
}

fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(pos)
}
