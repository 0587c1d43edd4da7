/**
 * A small free-format reference tokenizer, producing the token stream consumed by
 * the analyzer. This is not a complete COBOL lexer (no fixed-format columns, COPY
 * expansion or continuation lines), but is sufficient for driving the analyzer from
 * plain source text.
 */
use logos::Logos;

use super::token::{Token, TokenCategory, TokenContext};

/// Raw lexemes recognised within free-format COBOL source.
#[derive(Logos, Debug, Copy, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[regex(r"\*>[^\n]*", logos::skip)]
    Comment,
    #[regex(r#""([^"\n]|"")*""#)]
    #[regex(r#"'([^'\n]|'')*'"#)]
    StringLiteral,
    #[regex(r"[+-]?[0-9]+(\.[0-9]+)?", priority = 5)]
    NumericLiteral,
    #[regex(r"[A-Za-z0-9][A-Za-z0-9-]*", priority = 3)]
    Word,
    #[regex(r"\*\*|<=|>=|<>|[.,()+\-*/=<>:&]")]
    Symbol,
}

/// Reserved words which begin an imperative statement.
const STATEMENT_WORDS: &[&str] = &[
    "ACCEPT", "ADD", "ALLOCATE", "CALL", "CANCEL", "CLOSE", "COMMIT", "COMPUTE", "CONTINUE",
    "DELETE", "DISPLAY", "DIVIDE", "EVALUATE", "EXIT", "FREE", "GENERATE", "GO", "GOBACK", "IF",
    "INITIALIZE", "INITIATE", "INSPECT", "INVOKE", "MERGE", "MOVE", "MULTIPLY", "OPEN", "PERFORM",
    "RAISE", "READ", "RELEASE", "RESUME", "RETURN", "REWRITE", "ROLLBACK", "SEARCH", "SET", "SORT",
    "START", "STOP", "STRING", "SUBTRACT", "SUPPRESS", "TERMINATE", "UNLOCK", "UNSTRING",
    "VALIDATE", "WRITE",
];

/// Reserved words which begin a data description clause.
const CLAUSE_WORDS: &[&str] = &[
    "BASED", "BINARY", "COMP", "COMPUTATIONAL", "EXTERNAL", "GLOBAL", "IS", "JUST", "JUSTIFIED",
    "PACKED-DECIMAL", "PIC", "PICTURE", "SYNC", "SYNCHRONIZED", "TYPEDEF", "VALUE",
];

/// Reserved words standing in for a literal value.
const FIGURATIVE_WORDS: &[&str] = &[
    "HIGH-VALUE", "HIGH-VALUES", "LOW-VALUE", "LOW-VALUES", "NULL", "NULLS", "QUOTE", "QUOTES",
    "SPACE", "SPACES", "ZERO", "ZEROES", "ZEROS",
];

/// All other reserved words, which are neither statements, clauses nor figurative literals.
const RESERVED_WORDS: &[&str] = &[
    "ADVANCING", "AFTER", "ALPHABETIC", "ALPHABETIC-LOWER", "ALPHABETIC-UPPER", "AND", "AS", "AT",
    "BY", "BYTE-LENGTH", "CHARACTERS", "COMMAND-LINE", "CONSTANT", "CORR", "CORRESPONDING", "CYCLE",
    "DATA", "DATE", "DAY", "DAY-OF-WEEK", "DEPENDING", "DIVISION", "ELSE", "END", "END-ACCEPT",
    "END-ADD", "END-CALL", "END-COMPUTE", "END-DELETE", "END-DISPLAY", "END-DIVIDE", "END-IF",
    "END-MULTIPLY", "END-RETURN", "END-REWRITE", "END-SUBTRACT", "ENVIRONMENT", "EQUAL", "ERROR",
    "EXCEPTION", "FILE", "FOR", "FOREVER", "FROM", "FUNCTION", "FUNCTION-ID", "GIVING", "GREATER",
    "IDENTIFICATION", "INITIALIZED", "INTO", "INVALID", "KEY", "LAST", "LENGTH", "LESS", "LINKAGE",
    "LOCAL-STORAGE", "LOCK", "NEGATIVE", "NEXT", "NO", "NORMAL", "NOT", "NUMERIC", "OF", "ON", "OR",
    "OVERRIDE", "PARAGRAPH", "POSITIVE", "PRINTING", "PROCEDURE", "PROGRAM", "PROGRAM-ID", "RAISING",
    "RECORD", "RECORDS", "REEL", "REMAINDER", "REMOVAL", "RETRY", "RETURNING", "REWIND", "RUN",
    "SECONDS", "SECTION", "SENTENCE", "SIZE", "STANDARD-ERROR", "STANDARD-INPUT", "STANDARD-OUTPUT",
    "STATEMENT", "STATUS", "THAN", "THEN", "TIME", "TIMES", "TO", "UNIT", "UPON", "WITH",
    "WORKING-STORAGE", "YYYYDDD", "YYYYMMDD",
];

/// A lexer for free-format COBOL source, producing analyzer tokens.
pub struct Lexer<'src> {
    input: &'src str,
    generated: logos::SpannedIter<'src, Lexeme>,
    line_starts: Vec<usize>,
    eof_reached: bool,

    /// Token held back after splitting a signed literal.
    pending: Option<Token>,

    /// Whether the last token produced completes an operand.
    after_operand: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(input.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self {
            input,
            generated: Lexeme::lexer(input).spanned(),
            line_starts,
            eof_reached: false,
            pending: None,
            after_operand: false,
        }
    }

    /// Converts a byte offset into a 1-based (line, column) pair.
    fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line.saturating_sub(1)];
        (line.max(1), offset - line_start + 1)
    }
}

/// Allows for iterating over the lexer's tokens.
/// The final token produced is always an EOF sentinel.
impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(held) = self.pending.take() {
            self.after_operand = true;
            return Some(held);
        }

        let token = match self.generated.next() {
            Some((kind, span)) => {
                let text = &self.input[span.clone()];
                let (line, column) = self.line_col(span.start);
                match kind {
                    Ok(Lexeme::Word) => classify_word(text.to_ascii_uppercase(), line, column),
                    Ok(Lexeme::NumericLiteral) => {
                        Token::new(text, TokenCategory::Numeric, line, column)
                    }
                    Ok(Lexeme::StringLiteral) => {
                        Token::new(text, TokenCategory::String, line, column)
                    }

                    // Unknown characters are passed through as symbols, the analyzer
                    // reports on them where they are not accepted.
                    Ok(Lexeme::Symbol) | Ok(Lexeme::Comment) | Err(_) => {
                        Token::new(text, TokenCategory::Symbol, line, column)
                    }
                }
            }

            // No more tokens, EOF already reached, exit.
            None if self.eof_reached => return None,

            // End of tokens reached, return EOF token.
            None => {
                self.eof_reached = true;
                let (line, column) = self.line_col(self.input.len());
                return Some(Token::eof(line, column));
            }
        };

        // A signed literal directly after an operand is a binary operator (`A -1`).
        if token.category == TokenCategory::Numeric
            && self.after_operand
            && (token.value.starts_with('+') || token.value.starts_with('-'))
        {
            let (sign, digits) = token.value.split_at(1);
            self.pending = Some(Token::new(
                digits,
                TokenCategory::Numeric,
                token.line,
                token.column + 1,
            ));
            self.after_operand = false;
            return Some(Token::new(sign, TokenCategory::Symbol, token.line, token.column));
        }

        self.after_operand = matches!(
            token.category,
            TokenCategory::Identifier
                | TokenCategory::Numeric
                | TokenCategory::String
                | TokenCategory::FigurativeLiteral
        ) || token.is(")");
        Some(token)
    }
}

/// Assigns a category and clause context to a single upper-cased word.
fn classify_word(word: String, line: usize, column: usize) -> Token {
    let (category, context) = if STATEMENT_WORDS.contains(&word.as_str()) {
        (TokenCategory::Reserved, TokenContext::IsStatement)
    } else if CLAUSE_WORDS.contains(&word.as_str()) {
        (TokenCategory::Reserved, TokenContext::IsClause)
    } else if FIGURATIVE_WORDS.contains(&word.as_str()) {
        (TokenCategory::FigurativeLiteral, TokenContext::None)
    } else if RESERVED_WORDS.contains(&word.as_str()) || word.starts_with("END-") {
        (TokenCategory::Reserved, TokenContext::None)
    } else {
        (TokenCategory::Identifier, TokenContext::None)
    };
    Token::new(word, category, line, column).with_context(context)
}

/// Tokenizes the given free-format source into an EOF-terminated token sequence.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn splits_picture_strings() {
        assert_eq!(
            values("PIC S9(5)V9(2)."),
            vec!["PIC", "S9", "(", "5", ")", "V9", "(", "2", ")", ".", "EOF"]
        );
    }

    #[test]
    fn separates_trailing_period_from_numbers() {
        assert_eq!(values("VALUE 10."), vec!["VALUE", "10", ".", "EOF"]);
        assert_eq!(values("VALUE 10.25."), vec!["VALUE", "10.25", ".", "EOF"]);
    }

    #[test]
    fn tags_contexts_and_categories() {
        let tokens = tokenize("display Ws-Name zero pic");
        assert_eq!(tokens[0].clause_context, TokenContext::IsStatement);
        assert_eq!(tokens[0].value, "DISPLAY");
        assert_eq!(tokens[1].category, TokenCategory::Identifier);
        assert_eq!(tokens[1].value, "WS-NAME");
        assert_eq!(tokens[2].category, TokenCategory::FigurativeLiteral);
        assert_eq!(tokens[3].clause_context, TokenContext::IsClause);
        assert!(tokens[4].is_eof());
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = tokenize("MOVE A\n   TO B. *> trailing comment\n");
        let to = &tokens[2];
        assert_eq!((to.value.as_str(), to.line, to.column), ("TO", 2, 4));
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[5].line, 3);
    }

    #[test]
    fn splits_signs_after_operands() {
        assert_eq!(values("A -1"), vec!["A", "-", "1", "EOF"]);
        assert_eq!(values("MOVE -1 TO A"), vec!["MOVE", "-1", "TO", "A", "EOF"]);
    }

    #[test]
    fn recognises_compound_symbols() {
        assert_eq!(
            values("A ** 2 >= B"),
            vec!["A", "**", "2", ">=", "B", "EOF"]
        );
    }
}
