use logos::Lexer;
use logos::Logos;

use crate::syntax::Span;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub source: &'a str,
    pub kind: TokenKind,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn text(&self) -> &'a str {
        &self.source[std::ops::Range::from(self.span)]
    }
}

impl<'a> std::fmt::Debug for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.span)
    }
}

pub struct Tokenizer<'a> {
    source: &'a str,
    lexer: Lexer<'a, TokenKind>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            source,
            lexer: TokenKind::lexer(source),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = match self.lexer.next()? {
            Ok(kind) => kind,
            // Unlexable bytes become Error tokens so the caller still sees
            // every span of the line.
            Err(()) => TokenKind::Error,
        };
        let span = (self.lexer.span().start..self.lexer.span().end).into();
        Some(Token {
            source: self.source,
            kind,
            span,
        })
    }
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Error,

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    #[regex(r"--[^\n]*")]
    LineComment,

    // Second pattern catches an unterminated comment running to end of input.
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    #[regex(r"/\*([^*]|\*[^/])*\*?")]
    BlockComment,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,

    #[regex(r"(==|!=|<>|<=|>=|<<|>>|\|\||[-+*/%&|~<>=])")]
    Op,

    #[regex(r#"[_a-zA-Z][_$a-zA-Z0-9]*"#)]
    Ident,

    #[regex(r#""([^"]|"")*""#)]
    #[regex(r#"`[^`]*`"#)]
    #[regex(r#"\[[^\]]*\]"#)]
    QuotedIdent,

    // SQL strings escape a quote by doubling it. The unterminated form is
    // kept as one token so it highlights as a single run.
    #[regex(r#"'([^']|'')*'"#)]
    #[regex(r#"'([^']|'')*"#)]
    String,

    #[regex(r"[xX]'[0-9a-fA-F]*'")]
    Blob,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Number,

    #[regex(r"\?[0-9]*")]
    #[regex(r"[:@$][_a-zA-Z][_$a-zA-Z0-9]*")]
    Param,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Tokenizer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_simple_select() {
        use TokenKind::*;
        assert_eq!(
            kinds("select * from users;"),
            vec![Ident, Op, Ident, Ident, Semicolon]
        );
    }

    #[test]
    fn spans_map_back_to_source() {
        let source = "insert into t values (1, 'a')";
        for token in Tokenizer::new(source) {
            let range = std::ops::Range::from(token.span);
            assert_eq!(token.text(), &source[range]);
        }
    }

    #[test]
    fn doubled_quote_stays_inside_string() {
        let tokens: Vec<_> = Tokenizer::new("'it''s'").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text(), "'it''s'");
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let tokens: Vec<_> = Tokenizer::new("select 'oops").collect();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::String);
        assert_eq!(tokens.last().unwrap().text(), "'oops");
    }

    #[test]
    fn comments_terminated_and_not() {
        let tokens: Vec<_> = Tokenizer::new("/* a */ -- rest").collect();
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[1].kind, TokenKind::LineComment);

        let tokens: Vec<_> = Tokenizer::new("/* open").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
    }

    #[test]
    fn block_comment_with_inner_stars() {
        let tokens: Vec<_> = Tokenizer::new("/* ** */").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::BlockComment);
        assert_eq!(tokens[0].text(), "/* ** */");
    }

    #[test]
    fn blob_literal_is_one_token() {
        let tokens: Vec<_> = Tokenizer::new("x'CAFE'").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Blob);
    }

    #[test]
    fn bind_parameters() {
        use TokenKind::*;
        assert_eq!(kinds("? ?3 :name @name $name"), vec![Param; 5]);
    }

    #[test]
    fn numbers() {
        use TokenKind::*;
        assert_eq!(kinds("1 1.5 .5 1e3 0xFF"), vec![Number; 5]);
    }

    #[test]
    fn unlexable_input_becomes_error_tokens() {
        let tokens: Vec<_> = Tokenizer::new("select \u{1f980}").collect();
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert!(tokens[1..].iter().all(|t| t.kind == TokenKind::Error));
    }

    #[test]
    fn multichar_operators_lex_as_one_token() {
        use TokenKind::*;
        assert_eq!(
            kinds("a <= b <> c || d"),
            vec![Ident, Op, Ident, Op, Ident, Op, Ident]
        );
    }
}
