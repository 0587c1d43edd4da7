/**
 * Shape validation for conditional and arithmetic expressions.
 * No expression tree is built here, expressions are only checked for balanced parentheses
 * and matching operator arity.
 */
use super::{
    err::DiagnosticKind,
    token::{Token, TokenCategory},
    Analyzer,
};

/// The role of a single token within an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExprItem {
    Operand,
    Binary { prec: u8, right_assoc: bool },
    Prefix { prec: u8 },
    Postfix,
    Open,
    Close,
}

/// A token annotated with its expression role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExprToken {
    pub item: ExprItem,
    pub token: Token,
}

impl ExprToken {
    fn new(item: ExprItem, token: Token) -> Self {
        Self { item, token }
    }

    /// Whether this item completes an operand, so that a following `+`/`-` is binary.
    fn ends_operand(&self) -> bool {
        matches!(self.item, ExprItem::Operand | ExprItem::Close | ExprItem::Postfix)
    }
}

// Boolean operator precedences, arithmetic operators bind tighter than all of these.
const PREC_OR: u8 = 0;
const PREC_AND: u8 = 1;
const PREC_NOT: u8 = 2;
const PREC_RELATIONAL: u8 = 3;
const PREC_ADDITIVE: u8 = 4;
const PREC_MULTIPLICATIVE: u8 = 5;
const PREC_POWER: u8 = 6;
const PREC_SIGN: u8 = 7;

/// Words which test the class or sign of the operand preceding them.
const CLASS_WORDS: &[&str] = &[
    "NUMERIC",
    "ALPHABETIC",
    "ALPHABETIC-LOWER",
    "ALPHABETIC-UPPER",
    "POSITIVE",
    "NEGATIVE",
];

/// Noise words which may appear within a condition without changing its shape.
const NOISE_WORDS: &[&str] = &["IS", "THAN", "TO", ","];

const UNBALANCED_CONDITION: &str = "This expression is not balanced, one or more parenthesis do not have their matching opening or closing pair, it is an invalid expression.";
const INVALID_CONDITION: &str = "This expression cannot be correctly evaluated. Please make sure that all operators have their matching operands.";
const CONSECUTIVE_OPERATORS: &str = "Invalid token after an arithmetic operator, expected a numeric literal or identifier instead of another arithmetic operator.";
const TRAILING_OPERATOR: &str = "Invalid arithmetic expression, expected a numeric literal or identifier after this operator. Arithmetic expressions cannot end with an operator.";
const LEADING_OPERATOR: &str = "Invalid arithmetic expression, expected a numeric literal or identifier before this operator.";
const INVALID_ARITHMETIC_SYMBOL: &str = "Invalid symbol in this arithmetic expression. Valid operators are: +, -, *, /, **, ( and ).";
const EMPTY_PARENTHESES: &str = "Invalid arithmetic expression, expected a numeric literal or identifier between these parentheses.";
const UNBALANCED_ARITHMETIC: &str = "This arithmetic expression is not balanced, one or more parenthesis do not have their matching opening or closing pair.";

/// Returns whether all parentheses within the expression have a matching pair.
pub(crate) fn is_balanced(expr: &[ExprToken]) -> bool {
    let mut depth: usize = 0;
    for et in expr {
        match et.item {
            ExprItem::Open => depth += 1,
            ExprItem::Close => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Converts an infix expression into postfix form.
/// Unmatched parentheses are dropped, balance is checked separately.
pub(crate) fn shunting_yard(expr: &[ExprToken]) -> Vec<ExprToken> {
    let mut output = Vec::with_capacity(expr.len());
    let mut stack: Vec<ExprToken> = Vec::new();

    for et in expr {
        match et.item {
            ExprItem::Operand | ExprItem::Postfix => output.push(et.clone()),
            ExprItem::Prefix { .. } | ExprItem::Open => stack.push(et.clone()),
            ExprItem::Binary { prec, right_assoc } => {
                while let Some(top) = stack.last() {
                    let pops = match top.item {
                        ExprItem::Binary { prec: top_prec, .. } => {
                            top_prec > prec || (top_prec == prec && !right_assoc)
                        }
                        ExprItem::Prefix { prec: top_prec } => top_prec >= prec,
                        _ => false,
                    };
                    if !pops {
                        break;
                    }
                    output.extend(stack.pop());
                }
                stack.push(et.clone());
            }
            ExprItem::Close => {
                while let Some(top) = stack.pop() {
                    if top.item == ExprItem::Open {
                        break;
                    }
                    output.push(top);
                }
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top.item != ExprItem::Open {
            output.push(top);
        }
    }
    output
}

/// Checks that every operator within a postfix expression has its operands, and that the
/// expression reduces to a single value. On failure, returns the token arity broke at.
pub(crate) fn evaluate_postfix(postfix: &[ExprToken]) -> Result<(), Token> {
    let mut depth: usize = 0;
    for et in postfix {
        match et.item {
            ExprItem::Operand => depth += 1,
            ExprItem::Binary { .. } => {
                if depth < 2 {
                    return Err(et.token.clone());
                }
                depth -= 1;
            }
            ExprItem::Prefix { .. } | ExprItem::Postfix => {
                if depth < 1 {
                    return Err(et.token.clone());
                }
            }
            ExprItem::Open | ExprItem::Close => {}
        }
    }

    match postfix.last() {
        Some(last) if depth != 1 => Err(last.token.clone()),
        _ => Ok(()),
    }
}

/// Whether the given word is a class or sign test, when directly following an operand.
/// Figurative zero is only a sign test in that position (`A IS ZERO`).
fn is_class_word(word: &str) -> bool {
    CLASS_WORDS.contains(&word) || matches!(word, "ZERO" | "ZEROS" | "ZEROES")
}

/// Arithmetic operator symbols.
fn is_arithmetic_operator(value: &str) -> bool {
    matches!(value, "+" | "-" | "*" | "/" | "**")
}

/// The previous element seen while scanning an arithmetic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithState {
    Start,
    Operand,
    Operator,
    Open,
    Close,
}

impl<'a> Analyzer<'a> {
    /// Reads a relational operator starting at the given offset from the cursor.
    /// Returns the normalised operator and the number of tokens it spans.
    fn relational_at(&self, offset: isize) -> Option<(String, isize)> {
        let first = self.lookahead(offset);
        match first.value.as_str() {
            "=" | "<" | ">" | "<=" | ">=" | "<>" => Some((first.value.clone(), 1)),
            "EQUAL" => {
                let len = if self.lookahead_is(offset + 1, "TO") { 2 } else { 1 };
                Some(("=".into(), len))
            }
            "GREATER" | "LESS" => {
                let op = if first.is("GREATER") { ">" } else { "<" };
                let mut len = 1;
                if self.lookahead_is(offset + len, "THAN") {
                    len += 1;
                }
                if self.lookahead_is(offset + len, "OR") && self.lookahead_is(offset + len + 1, "EQUAL")
                {
                    len += 2;
                    if self.lookahead_is(offset + len, "TO") {
                        len += 1;
                    }
                    return Some((format!("{op}="), len));
                }
                Some((op.into(), len))
            }
            _ => None,
        }
    }

    /// Whether a condition being collected ends at the current token.
    fn at_condition_end(&self, delimiter: &str) -> bool {
        let cur = self.current();
        cur.is(delimiter)
            || cur.is(".")
            || cur.is("ELSE")
            || cur.is("END-IF")
            || cur.is_eof()
            || self.at_statement()
            || (cur.is("NEXT") && self.lookahead_is(1, "SENTENCE"))
    }

    /// Accepts `count` tokens, returning a single symbol token standing in for all of them.
    fn merge_tokens(&mut self, count: isize, value: String) -> Token {
        let first = self.current().clone();
        for _ in 0..count {
            self.accept();
        }
        Token::new(value, TokenCategory::Symbol, first.line, first.column)
    }

    /// Validates a boolean condition, collected up to the given delimiter or the next
    /// statement boundary. The delimiter itself is not consumed.
    pub fn condition(&mut self, delimiter: &str) {
        let mut expression: Vec<ExprToken> = Vec::new();
        let mut first: Option<Token> = None;

        while !self.at_condition_end(delimiter) {
            let cur = self.current().clone();
            if first.is_none() {
                first = Some(cur.clone());
            }
            let prev_ends_operand = expression.last().is_some_and(|e| e.ends_operand());

            // Noise words are kept in the output, but play no part in the expression.
            if NOISE_WORDS.contains(&cur.value.as_str()) {
                self.accept();
                continue;
            }

            // "NOT" directly before a relational or class test negates that test.
            if cur.is("NOT") {
                if let Some((op, len)) = self.relational_at(1) {
                    let merged = self.merge_tokens(len + 1, format!("NOT {op}"));
                    expression.push(ExprToken::new(
                        ExprItem::Binary {
                            prec: PREC_RELATIONAL,
                            right_assoc: false,
                        },
                        merged,
                    ));
                    continue;
                }
                let next = self.lookahead(1).value.clone();
                if prev_ends_operand && is_class_word(&next) {
                    let merged = self.merge_tokens(2, format!("NOT {next}"));
                    expression.push(ExprToken::new(ExprItem::Postfix, merged));
                    continue;
                }
                self.accept();
                expression.push(ExprToken::new(ExprItem::Prefix { prec: PREC_NOT }, cur));
                continue;
            }

            if let Some((op, len)) = self.relational_at(0) {
                let token = if len == 1 {
                    self.accept();
                    cur
                } else {
                    self.merge_tokens(len, op)
                };
                expression.push(ExprToken::new(
                    ExprItem::Binary {
                        prec: PREC_RELATIONAL,
                        right_assoc: false,
                    },
                    token,
                ));
                continue;
            }

            let item = match cur.value.as_str() {
                "AND" => ExprItem::Binary {
                    prec: PREC_AND,
                    right_assoc: false,
                },
                "OR" => ExprItem::Binary {
                    prec: PREC_OR,
                    right_assoc: false,
                },
                "(" => ExprItem::Open,
                ")" => ExprItem::Close,
                "**" => ExprItem::Binary {
                    prec: PREC_POWER,
                    right_assoc: true,
                },
                "*" | "/" => ExprItem::Binary {
                    prec: PREC_MULTIPLICATIVE,
                    right_assoc: false,
                },
                "+" | "-" if prev_ends_operand => ExprItem::Binary {
                    prec: PREC_ADDITIVE,
                    right_assoc: false,
                },
                "+" | "-" => ExprItem::Prefix { prec: PREC_SIGN },
                word if prev_ends_operand && is_class_word(word) => ExprItem::Postfix,
                _ => ExprItem::Operand,
            };
            self.accept();
            expression.push(ExprToken::new(item, cur));
        }

        let Some(first) = first.filter(|_| !expression.is_empty()) else {
            let token = self.current().clone();
            self.report(
                token,
                DiagnosticKind::ExpectedCategory("conditional expression".into()),
            );
            return;
        };

        if !is_balanced(&expression) {
            self.report(first, DiagnosticKind::General(UNBALANCED_CONDITION.into()));
        }

        let postfix = shunting_yard(&expression);
        if let Err(token) = evaluate_postfix(&postfix) {
            self.report(token, DiagnosticKind::General(INVALID_CONDITION.into()));
        }
    }

    /// Validates a flat arithmetic expression from the current position.
    /// The expression ends at the first token which cannot continue it.
    /// Returns whether the expression was valid.
    pub fn arithmetic(&mut self) -> bool {
        let before = self.reported;
        let first = self.current().clone();
        let mut state = ArithState::Start;
        let mut last_operator: Option<Token> = None;
        let mut depth: isize = 0;
        let mut unbalanced = false;

        loop {
            let cur = self.current().clone();
            match cur.category {
                TokenCategory::Identifier | TokenCategory::Numeric => {
                    if matches!(state, ArithState::Operand | ArithState::Close) {
                        break;
                    }
                    self.accept();
                    state = ArithState::Operand;
                }
                TokenCategory::Symbol if cur.is("(") => {
                    if matches!(state, ArithState::Operand | ArithState::Close) {
                        break;
                    }
                    self.accept();
                    depth += 1;
                    state = ArithState::Open;
                }
                TokenCategory::Symbol if cur.is(")") => {
                    match state {
                        ArithState::Operator => {
                            if let Some(op) = last_operator.take() {
                                self.report(op, DiagnosticKind::General(TRAILING_OPERATOR.into()));
                            }
                        }
                        ArithState::Open => {
                            self.report(
                                cur.clone(),
                                DiagnosticKind::General(EMPTY_PARENTHESES.into()),
                            );
                        }
                        _ => {}
                    }
                    self.accept();
                    depth -= 1;
                    unbalanced |= depth < 0;
                    state = ArithState::Close;
                }
                TokenCategory::Symbol if is_arithmetic_operator(&cur.value) => {
                    match state {
                        ArithState::Operator => {
                            self.report(
                                cur.clone(),
                                DiagnosticKind::General(CONSECUTIVE_OPERATORS.into()),
                            );
                        }
                        ArithState::Start | ArithState::Open
                            if !(cur.is("+") || cur.is("-")) =>
                        {
                            self.report(
                                cur.clone(),
                                DiagnosticKind::General(LEADING_OPERATOR.into()),
                            );
                        }
                        _ => {}
                    }
                    self.accept();
                    last_operator = Some(cur);
                    state = ArithState::Operator;
                }
                TokenCategory::Symbol if !cur.is(".") => {
                    self.report(cur, DiagnosticKind::General(INVALID_ARITHMETIC_SYMBOL.into()));
                    self.skip();
                    last_operator = None;
                    state = ArithState::Operator;
                }
                _ => break,
            }
        }

        match state {
            ArithState::Start => {
                let token = self.current().clone();
                self.report(
                    token,
                    DiagnosticKind::ExpectedCategory(
                        "identifier, numeric literal or valid arithmetic symbol".into(),
                    ),
                );
            }
            ArithState::Operator => {
                if let Some(op) = last_operator {
                    self.report(op, DiagnosticKind::General(TRAILING_OPERATOR.into()));
                }
            }
            _ => {}
        }

        if unbalanced || depth != 0 {
            self.report(first, DiagnosticKind::General(UNBALANCED_ARITHMETIC.into()));
        }
        self.reported == before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::analyzer::{
        err::Diagnostic, lexer::tokenize, sink::CollectingSink, symbols::SymbolTable,
    };

    /// Runs the given validator over the given source, returning all diagnostics and the
    /// token the cursor stopped at.
    fn run(src: &str, f: impl FnOnce(&mut Analyzer)) -> (Vec<Diagnostic>, String) {
        let tokens = tokenize(src);
        let mut symbols = SymbolTable::new();
        let mut sink = CollectingSink::new();
        let stopped = {
            let mut analyzer = Analyzer::new("expr.cob", &tokens, &mut symbols, &mut sink);
            f(&mut analyzer);
            analyzer.current().to_string()
        };
        (sink.into_diagnostics(), stopped)
    }

    fn tok(value: &str) -> Token {
        Token::new(value, TokenCategory::Identifier, 1, 1)
    }

    fn operand(value: &str) -> ExprToken {
        ExprToken::new(ExprItem::Operand, tok(value))
    }

    fn binary(value: &str, prec: u8) -> ExprToken {
        ExprToken::new(
            ExprItem::Binary {
                prec,
                right_assoc: false,
            },
            tok(value),
        )
    }

    #[test]
    fn balance_requires_ordered_pairs() {
        let open = ExprToken::new(ExprItem::Open, tok("("));
        let close = ExprToken::new(ExprItem::Close, tok(")"));
        assert!(is_balanced(&[open.clone(), operand("A"), close.clone()]));
        assert!(!is_balanced(&[close.clone(), operand("A"), open.clone()]));
        assert!(!is_balanced(&[open, operand("A")]));
    }

    #[test]
    fn shunting_yard_respects_precedence() {
        // A = 1 OR B = 2 AND C = 3
        let infix = vec![
            operand("A"),
            binary("=", PREC_RELATIONAL),
            operand("1"),
            binary("OR", PREC_OR),
            operand("B"),
            binary("=", PREC_RELATIONAL),
            operand("2"),
            binary("AND", PREC_AND),
            operand("C"),
            binary("=", PREC_RELATIONAL),
            operand("3"),
        ];
        let postfix: Vec<String> = shunting_yard(&infix)
            .into_iter()
            .map(|e| e.token.value)
            .collect();
        assert_eq!(
            postfix,
            vec!["A", "1", "=", "B", "2", "=", "C", "3", "=", "AND", "OR"]
        );
        assert!(evaluate_postfix(&shunting_yard(&infix)).is_ok());
    }

    #[test]
    fn postfix_reports_where_arity_breaks() {
        let postfix = vec![operand("A"), binary("AND", PREC_AND)];
        assert_eq!(evaluate_postfix(&postfix).unwrap_err().value, "AND");
        let postfix = vec![operand("A"), operand("B")];
        assert_eq!(evaluate_postfix(&postfix).unwrap_err().value, "B");
    }

    #[test]
    fn valid_conditions_pass() {
        for cond in [
            "A > B THEN",
            "A NOT > B THEN",
            "A IS NOT EQUAL TO B THEN",
            "(A = 1 OR B = 2) AND NOT C < 3 THEN",
            "A IS GREATER THAN OR EQUAL TO B + 1 THEN",
            "A IS NOT NUMERIC THEN",
            "A IS ZERO THEN",
            "A = ZERO THEN",
        ] {
            let (diags, stopped) = run(cond, |a| a.condition("THEN"));
            assert!(diags.is_empty(), "{cond}: {diags:?}");
            assert_eq!(stopped, "THEN");
        }
    }

    #[test]
    fn unbalanced_condition_reports_at_first_token() {
        let (diags, _) = run("(A = B THEN", |a| a.condition("THEN"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].token.value, "(");
        assert!(diags[0].to_string().contains("not balanced"));
    }

    #[test]
    fn unbalanced_condition_anchors_on_noise_words() {
        let (diags, _) = run("IS (A = B THEN", |a| a.condition("THEN"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].token.value, "IS");
    }

    #[test]
    fn dangling_operator_reports_once() {
        let (diags, _) = run("A = B AND THEN", |a| a.condition("THEN"));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].token.value, "AND");
    }

    #[test]
    fn condition_stops_at_statements() {
        let (diags, stopped) = run("A = B DISPLAY A", |a| a.condition("THEN"));
        assert!(diags.is_empty());
        assert_eq!(stopped, "DISPLAY");
    }

    #[test]
    fn trailing_operator_in_parentheses() {
        let (diags, stopped) = run("( A + ) .", |a| {
            assert!(!a.arithmetic());
        });
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].token.value, "+");
        assert!(diags[0].to_string().contains("cannot end with an operator"));
        assert_eq!(stopped, ".");
    }

    #[test]
    fn empty_parentheses_are_rejected() {
        let (diags, stopped) = run("A * ( ) .", |a| {
            assert!(!a.arithmetic());
        });
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].token.value, ")");
        assert!(diags[0].to_string().contains("between these parentheses"));
        assert_eq!(stopped, ".");
    }

    #[test]
    fn consecutive_operators_report_second() {
        let (diags, _) = run("A + * B .", |a| {
            a.arithmetic();
        });
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].token.value, "*");
    }

    #[test]
    fn arithmetic_stops_after_operand_run() {
        let (diags, stopped) = run("-(A + 2) ** B / 4 ON SIZE ERROR", |a| {
            assert!(a.arithmetic());
        });
        assert!(diags.is_empty());
        assert_eq!(stopped, "ON");
    }

    #[test]
    fn invalid_symbols_are_skipped() {
        let (diags, stopped) = run("A & B .", |a| {
            a.arithmetic();
        });
        assert_eq!(diags.len(), 1);
        assert!(diags[0].to_string().contains("Invalid symbol"));
        assert_eq!(stopped, ".");
    }

    #[test]
    fn unbalanced_arithmetic_reports_at_first_token() {
        let (diags, _) = run("(A + B .", |a| {
            a.arithmetic();
        });
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].token.value, "(");
    }
}
