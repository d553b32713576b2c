use std::ops::Range;

use crossterm::style::Color;
use smallvec::SmallVec;

use crate::token::{TokenKind, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Display category of a lexed span. Keywords are recognized here, not in
/// the tokenizer, so the keyword table stays shared with the completer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantic {
    Keyword,
    Ident,
    Literal,
    Number,
    Comment,
    Operator,
    Bracket,
    Parameter,
    Error,
}

impl Semantic {
    pub fn color(&self) -> Color {
        match self {
            Semantic::Keyword => Color::Blue,
            Semantic::Ident => Color::Green,
            Semantic::Literal => Color::Yellow,
            Semantic::Number => Color::DarkYellow,
            Semantic::Comment => Color::DarkGrey,
            Semantic::Operator => Color::DarkCyan,
            Semantic::Bracket => Color::Cyan,
            Semantic::Parameter => Color::Magenta,
            Semantic::Error => Color::DarkRed,
        }
    }
}

/// SQLite keyword list, uppercase and sorted for binary search.
pub const KEYWORDS: &[&str] = &[
    "ABORT",
    "ACTION",
    "ADD",
    "AFTER",
    "ALL",
    "ALTER",
    "ALWAYS",
    "ANALYZE",
    "AND",
    "AS",
    "ASC",
    "ATTACH",
    "AUTOINCREMENT",
    "BEFORE",
    "BEGIN",
    "BETWEEN",
    "BY",
    "CASCADE",
    "CASE",
    "CAST",
    "CHECK",
    "COLLATE",
    "COLUMN",
    "COMMIT",
    "CONFLICT",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "DATABASE",
    "DEFAULT",
    "DEFERRABLE",
    "DEFERRED",
    "DELETE",
    "DESC",
    "DETACH",
    "DISTINCT",
    "DO",
    "DROP",
    "EACH",
    "ELSE",
    "END",
    "ESCAPE",
    "EXCEPT",
    "EXCLUDE",
    "EXCLUSIVE",
    "EXISTS",
    "EXPLAIN",
    "FAIL",
    "FILTER",
    "FIRST",
    "FOLLOWING",
    "FOR",
    "FOREIGN",
    "FROM",
    "FULL",
    "GENERATED",
    "GLOB",
    "GROUP",
    "GROUPS",
    "HAVING",
    "IF",
    "IGNORE",
    "IMMEDIATE",
    "IN",
    "INDEX",
    "INDEXED",
    "INITIALLY",
    "INNER",
    "INSERT",
    "INSTEAD",
    "INTERSECT",
    "INTO",
    "IS",
    "ISNULL",
    "JOIN",
    "KEY",
    "LAST",
    "LEFT",
    "LIKE",
    "LIMIT",
    "MATCH",
    "MATERIALIZED",
    "NATURAL",
    "NO",
    "NOT",
    "NOTHING",
    "NOTNULL",
    "NULL",
    "NULLS",
    "OF",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OTHERS",
    "OUTER",
    "OVER",
    "PARTITION",
    "PLAN",
    "PRAGMA",
    "PRECEDING",
    "PRIMARY",
    "QUERY",
    "RAISE",
    "RANGE",
    "RECURSIVE",
    "REFERENCES",
    "REGEXP",
    "REINDEX",
    "RELEASE",
    "RENAME",
    "REPLACE",
    "RESTRICT",
    "RETURNING",
    "RIGHT",
    "ROLLBACK",
    "ROW",
    "ROWS",
    "SAVEPOINT",
    "SELECT",
    "SET",
    "TABLE",
    "TEMP",
    "TEMPORARY",
    "THEN",
    "TIES",
    "TO",
    "TRANSACTION",
    "TRIGGER",
    "UNBOUNDED",
    "UNION",
    "UNIQUE",
    "UPDATE",
    "USING",
    "VACUUM",
    "VALUES",
    "VIEW",
    "VIRTUAL",
    "WHEN",
    "WHERE",
    "WINDOW",
    "WITH",
    "WITHOUT",
];

pub fn is_keyword(word: &str) -> bool {
    let upper = word.to_ascii_uppercase();
    KEYWORDS.binary_search(&upper.as_str()).is_ok()
}

/// Lex a line and assign one display semantic per token. Whitespace carries
/// none; most lines classify into a handful of spans, hence the SmallVec.
pub fn classify(line: &str) -> SmallVec<[(Span, Semantic); 8]> {
    Tokenizer::new(line)
        .filter_map(|token| {
            let semantic = match token.kind {
                TokenKind::Ident if is_keyword(token.text()) => Semantic::Keyword,
                TokenKind::Ident | TokenKind::QuotedIdent => Semantic::Ident,
                TokenKind::String | TokenKind::Blob => Semantic::Literal,
                TokenKind::Number => Semantic::Number,
                TokenKind::LineComment | TokenKind::BlockComment => Semantic::Comment,
                TokenKind::Op => Semantic::Operator,
                TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Dot => Semantic::Bracket,
                TokenKind::Param => Semantic::Parameter,
                TokenKind::Error => Semantic::Error,
                TokenKind::Whitespace => return None,
            };
            Some((token.span, semantic))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted() {
        let mut sorted = KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KEYWORDS);
    }

    #[test]
    fn keywords_match_case_insensitively() {
        assert!(is_keyword("select"));
        assert!(is_keyword("SELECT"));
        assert!(is_keyword("Select"));
        assert!(!is_keyword("users"));
        assert!(!is_keyword("selects"));
    }

    #[test]
    fn empty_line_classifies_to_nothing() {
        assert!(classify("").is_empty());
        assert!(classify("   ").is_empty());
    }

    #[test]
    fn spans_are_ascending_and_disjoint() {
        let spans = classify("select id, name from users where id = 1;");
        for pair in spans.windows(2) {
            assert!(pair[0].0.end <= pair[1].0.start);
        }
    }

    #[test]
    fn classifies_a_full_statement() {
        let spans = classify("select 'x' from t1 -- done");
        let semantics: Vec<_> = spans.iter().map(|(_, s)| *s).collect();
        assert_eq!(
            semantics,
            vec![
                Semantic::Keyword,
                Semantic::Literal,
                Semantic::Keyword,
                Semantic::Ident,
                Semantic::Comment,
            ]
        );
    }

    #[test]
    fn quoted_identifier_is_ident_not_literal() {
        let spans = classify("\"select\"");
        assert_eq!(spans[0].1, Semantic::Ident);
    }
}
