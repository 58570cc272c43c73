//! Formula parser for the textual surface syntax.
//!
//! The grammar is a classic precedence ladder, lowest binding first:
//!
//! ```text
//! expression := orExpr (impliesOp orExpr)*
//! orExpr     := andExpr (orOp andExpr)*
//! andExpr    := prefixExpr (andOp prefixExpr)*
//! prefixExpr := prefixOp* atom
//! atom       := identifier | '(' expression ')'
//! ```
//!
//! Every operator accepts several aliases (see the tables below); word
//! aliases are case-insensitive. Binary chains at the same level fold
//! **left-to-right**, including implication: `a -> b -> c` parses as
//! `(a -> b) -> c`. A run of prefix operators binds right-to-left, so
//! `~☐p` is `Not(Box(p))`.
//!
//! Identifiers are runs of letters, digits, `_` and `$`. Whether an
//! identifier is a variable or a boolean constant is decided by
//! [`ExprManager::mk_atom`], not by the grammar.

use log::{debug, trace};
use thiserror::Error;

use crate::manager::ExprManager;
use crate::reference::Ref;

/// Aliases for the conjunction `∧`.
const AND_SYMBOLS: [&str; 6] = ["&&", "&", "^", "/\\", "∧", "*"];
/// Aliases for the disjunction `∨`.
const OR_SYMBOLS: [&str; 5] = ["||", "|", "\\/", "∨", "+"];
/// Aliases for the implication `→`.
const IMPLIES_SYMBOLS: [&str; 3] = ["->", "=>", "→"];
/// Aliases for the negation `¬`.
const NOT_SYMBOLS: [&str; 3] = ["~", "¬", "!"];
/// Aliases for the necessity `☐`.
const BOX_SYMBOLS: [&str; 2] = ["☐", "□"];
/// Aliases for the possibility `◇`.
const DIAMOND_SYMBOLS: [&str; 1] = ["◇"];

/// Symbolic aliases longer than one character, matched before single ones.
const WIDE_SYMBOLS: [&str; 6] = ["/\\", "\\/", "->", "=>", "&&", "||"];

/// A formula failed to parse.
///
/// Positions are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,
    #[error("unrecognized character {ch:?} at byte {pos}")]
    UnrecognizedChar { ch: char, pos: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected a variable, constant, or '(' at byte {pos}, found {found:?}")]
    ExpectedAtom { found: String, pos: usize },
    #[error("unclosed '(' opened at byte {pos}")]
    UnclosedParen { pos: usize },
    #[error("unexpected trailing input {found:?} at byte {pos}")]
    TrailingInput { found: String, pos: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Ident(String),
    Sym(&'static str),
    LParen,
    RParen,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(word) => write!(f, "{}", word),
            TokenKind::Sym(sym) => write!(f, "{}", sym),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn single_symbol(ch: char) -> Option<&'static str> {
    Some(match ch {
        '&' => "&",
        '^' => "^",
        '*' => "*",
        '∧' => "∧",
        '|' => "|",
        '+' => "+",
        '∨' => "∨",
        '~' => "~",
        '!' => "!",
        '¬' => "¬",
        '→' => "→",
        '☐' => "☐",
        '□' => "□",
        '◇' => "◇",
        _ => return None,
    })
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = if ch == '(' {
            chars.next();
            TokenKind::LParen
        } else if ch == ')' {
            chars.next();
            TokenKind::RParen
        } else if ch == '⊤' || ch == '⊥' {
            // The constant glyphs are standalone atoms.
            chars.next();
            TokenKind::Ident(ch.to_string())
        } else if is_ident_char(ch) {
            let mut word = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if !is_ident_char(c) {
                    break;
                }
                word.push(c);
                chars.next();
            }
            TokenKind::Ident(word)
        } else if let Some(sym) = WIDE_SYMBOLS.iter().copied().find(|s| input[pos..].starts_with(s)) {
            // All wide symbols are two ASCII characters.
            chars.next();
            chars.next();
            TokenKind::Sym(sym)
        } else if let Some(sym) = single_symbol(ch) {
            chars.next();
            TokenKind::Sym(sym)
        } else {
            return Err(ParseError::UnrecognizedChar { ch, pos });
        };

        trace!("token {:?} at byte {}", kind, pos);
        tokens.push(Token { kind, pos });
    }

    Ok(tokens)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BinOp {
    Implies,
    Or,
    And,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PrefixOp {
    Not,
    Box,
    Diamond,
}

fn binary_op(kind: &TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Sym(sym) => {
            if AND_SYMBOLS.contains(sym) {
                Some(BinOp::And)
            } else if OR_SYMBOLS.contains(sym) {
                Some(BinOp::Or)
            } else if IMPLIES_SYMBOLS.contains(sym) {
                Some(BinOp::Implies)
            } else {
                None
            }
        }
        TokenKind::Ident(word) => {
            if word.eq_ignore_ascii_case("and") {
                Some(BinOp::And)
            } else if word.eq_ignore_ascii_case("or") || word.eq_ignore_ascii_case("v") {
                Some(BinOp::Or)
            } else if word.eq_ignore_ascii_case("implies") {
                Some(BinOp::Implies)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn prefix_op(kind: &TokenKind) -> Option<PrefixOp> {
    match kind {
        TokenKind::Sym(sym) => {
            if NOT_SYMBOLS.contains(sym) {
                Some(PrefixOp::Not)
            } else if BOX_SYMBOLS.contains(sym) {
                Some(PrefixOp::Box)
            } else if DIAMOND_SYMBOLS.contains(sym) {
                Some(PrefixOp::Diamond)
            } else {
                None
            }
        }
        TokenKind::Ident(word) => {
            if word.eq_ignore_ascii_case("not") {
                Some(PrefixOp::Not)
            } else if word.eq_ignore_ascii_case("box") {
                Some(PrefixOp::Box)
            } else if word.eq_ignore_ascii_case("diamond") {
                Some(PrefixOp::Diamond)
            } else {
                None
            }
        }
        _ => None,
    }
}

struct Parser<'a> {
    manager: &'a ExprManager,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn peek_binary(&self) -> Option<BinOp> {
        self.peek().and_then(|t| binary_op(&t.kind))
    }

    fn parse_expression(&mut self) -> Result<Ref, ParseError> {
        let mut expr = self.parse_or()?;
        while self.peek_binary() == Some(BinOp::Implies) {
            self.advance();
            let rhs = self.parse_or()?;
            expr = self.manager.mk_implies(expr, rhs);
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Ref, ParseError> {
        let mut expr = self.parse_and()?;
        while self.peek_binary() == Some(BinOp::Or) {
            self.advance();
            let rhs = self.parse_and()?;
            expr = self.manager.mk_or(expr, rhs);
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Ref, ParseError> {
        let mut expr = self.parse_prefix()?;
        while self.peek_binary() == Some(BinOp::And) {
            self.advance();
            let rhs = self.parse_prefix()?;
            expr = self.manager.mk_and(expr, rhs);
        }
        Ok(expr)
    }

    fn parse_prefix(&mut self) -> Result<Ref, ParseError> {
        if let Some(op) = self.peek().and_then(|t| prefix_op(&t.kind)) {
            self.advance();
            let arg = self.parse_prefix()?;
            return Ok(match op {
                PrefixOp::Not => self.manager.mk_not(arg),
                PrefixOp::Box => self.manager.mk_box(arg),
                PrefixOp::Diamond => self.manager.mk_diamond(arg),
            });
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Ref, ParseError> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(ParseError::UnexpectedEnd),
        };

        match token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(self.manager.mk_atom(&name))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                match self.peek() {
                    Some(t) if t.kind == TokenKind::RParen => {
                        self.advance();
                        Ok(inner)
                    }
                    _ => Err(ParseError::UnclosedParen { pos: token.pos }),
                }
            }
            kind => Err(ParseError::ExpectedAtom {
                found: kind.to_string(),
                pos: token.pos,
            }),
        }
    }
}

impl ExprManager {
    /// Parse a formula from its textual surface syntax.
    ///
    /// On success the formula has been interned through this manager and the
    /// root reference is returned. Malformed input fails with a
    /// [`ParseError`] without partial recovery; nodes interned before the
    /// failure simply stay in the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use kripke_rs::manager::ExprManager;
    ///
    /// let m = ExprManager::new();
    /// let f = m.parse("box (p -> q) and ◇p").unwrap();
    /// assert_eq!(m.to_text(f), "(☐(p → q) ∧ ◇p)");
    /// ```
    pub fn parse(&self, input: &str) -> Result<Ref, ParseError> {
        debug!("parse({:?})", input);

        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut parser = Parser {
            manager: self,
            tokens,
            pos: 0,
        };
        let expr = parser.parse_expression()?;

        if let Some(token) = parser.peek() {
            return Err(ParseError::TrailingInput {
                found: token.kind.to_string(),
                pos: token.pos,
            });
        }

        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_atoms() {
        let m = ExprManager::new();

        assert_eq!(m.parse("p").unwrap(), m.mk_var("p"));
        assert_eq!(m.parse("  p  ").unwrap(), m.mk_var("p"));
        assert_eq!(m.parse("p_1$x").unwrap(), m.mk_var("p_1$x"));

        assert_eq!(m.parse("true").unwrap(), m.top);
        assert_eq!(m.parse("TRUE").unwrap(), m.top);
        assert_eq!(m.parse("1").unwrap(), m.top);
        assert_eq!(m.parse("⊤").unwrap(), m.top);
        assert_eq!(m.parse("false").unwrap(), m.bot);
        assert_eq!(m.parse("0").unwrap(), m.bot);
        assert_eq!(m.parse("⊥").unwrap(), m.bot);
    }

    #[test]
    fn test_and_aliases() {
        let m = ExprManager::new();
        let expected = m.mk_and(m.mk_var("p"), m.mk_var("q"));

        for op in ["and", "AND", "And", "&&", "&", "^", "/\\", "∧", "*"] {
            let input = format!("p {} q", op);
            assert_eq!(m.parse(&input).unwrap(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_or_aliases() {
        let m = ExprManager::new();
        let expected = m.mk_or(m.mk_var("p"), m.mk_var("q"));

        for op in ["or", "OR", "v", "V", "||", "|", "\\/", "∨", "+"] {
            let input = format!("p {} q", op);
            assert_eq!(m.parse(&input).unwrap(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_implies_aliases() {
        let m = ExprManager::new();
        let expected = m.mk_implies(m.mk_var("p"), m.mk_var("q"));

        for op in ["implies", "IMPLIES", "->", "=>", "→"] {
            let input = format!("p {} q", op);
            assert_eq!(m.parse(&input).unwrap(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_prefix_aliases() {
        let m = ExprManager::new();
        let p = m.mk_var("p");

        for op in ["not", "NOT", "~", "¬", "!"] {
            let input = format!("{} p", op);
            assert_eq!(m.parse(&input).unwrap(), m.mk_not(p), "input {:?}", input);
        }
        for op in ["box", "BOX", "☐", "□"] {
            let input = format!("{} p", op);
            assert_eq!(m.parse(&input).unwrap(), m.mk_box(p), "input {:?}", input);
        }
        for op in ["diamond", "DIAMOND", "◇"] {
            let input = format!("{} p", op);
            assert_eq!(
                m.parse(&input).unwrap(),
                m.mk_diamond(p),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_precedence() {
        let m = ExprManager::new();
        let p = m.mk_var("p");
        let q = m.mk_var("q");
        let r = m.mk_var("r");
        let s = m.mk_var("s");

        // Implies < Or < And < prefix.
        let expected = m.mk_implies(p, m.mk_or(q, m.mk_and(r, s)));
        assert_eq!(m.parse("p -> q or r and s").unwrap(), expected);

        assert_eq!(
            m.parse("box p and q").unwrap(),
            m.mk_and(m.mk_box(p), q),
        );
        assert_eq!(m.parse("~p or q").unwrap(), m.mk_or(m.mk_not(p), q));
    }

    #[test]
    fn test_prefix_stacking() {
        let m = ExprManager::new();
        let p = m.mk_var("p");

        assert_eq!(m.parse("~~p").unwrap(), m.mk_not(m.mk_not(p)));
        assert_eq!(
            m.parse("~ box ◇ p").unwrap(),
            m.mk_not(m.mk_box(m.mk_diamond(p)))
        );
        assert_eq!(m.parse("☐☐p").unwrap(), m.mk_box(m.mk_box(p)));
    }

    #[test]
    fn test_left_associativity() {
        let m = ExprManager::new();
        let a = m.mk_var("a");
        let b = m.mk_var("b");
        let c = m.mk_var("c");

        assert_eq!(
            m.parse("a & b & c").unwrap(),
            m.mk_and(m.mk_and(a, b), c)
        );
        assert_eq!(m.parse("a | b | c").unwrap(), m.mk_or(m.mk_or(a, b), c));
        // Implication folds left too.
        assert_eq!(
            m.parse("a -> b -> c").unwrap(),
            m.mk_implies(m.mk_implies(a, b), c)
        );
    }

    #[test]
    fn test_parens() {
        let m = ExprManager::new();
        let a = m.mk_var("a");
        let b = m.mk_var("b");
        let c = m.mk_var("c");

        assert_eq!(
            m.parse("a -> (b -> c)").unwrap(),
            m.mk_implies(a, m.mk_implies(b, c))
        );
        assert_eq!(
            m.parse("(a | b) & c").unwrap(),
            m.mk_and(m.mk_or(a, b), c)
        );
        assert_eq!(m.parse("((a))").unwrap(), a);
    }

    #[test]
    fn test_no_whitespace() {
        let m = ExprManager::new();
        let p = m.mk_var("p");
        let q = m.mk_var("q");

        assert_eq!(m.parse("p∧q").unwrap(), m.mk_and(p, q));
        assert_eq!(m.parse("¬p→◇q").unwrap(), m.mk_implies(m.mk_not(p), m.mk_diamond(q)));
    }

    #[test]
    fn test_parse_interns() {
        let m = ExprManager::new();

        let f1 = m.parse("p -> q & ~r").unwrap();
        let f2 = m.parse("p implies (q and not r)").unwrap();
        assert_eq!(f1, f2);
    }

    #[test]
    fn test_operator_words_in_atom_position() {
        let m = ExprManager::new();

        // A binary operator word in operand position is just a variable.
        assert_eq!(
            m.parse("p & and").unwrap(),
            m.mk_and(m.mk_var("p"), m.mk_var("and"))
        );
        assert_eq!(m.parse("v").unwrap(), m.mk_var("v"));
    }

    #[test]
    fn test_errors() {
        let m = ExprManager::new();

        assert_eq!(m.parse("").unwrap_err(), ParseError::EmptyInput);
        assert_eq!(m.parse("   ").unwrap_err(), ParseError::EmptyInput);

        assert_eq!(
            m.parse("(p").unwrap_err(),
            ParseError::UnclosedParen { pos: 0 }
        );
        assert_eq!(
            m.parse("p & (q | r").unwrap_err(),
            ParseError::UnclosedParen { pos: 4 }
        );

        assert!(matches!(
            m.parse("p)").unwrap_err(),
            ParseError::TrailingInput { .. }
        ));
        assert!(matches!(
            m.parse("p q").unwrap_err(),
            ParseError::TrailingInput { .. }
        ));

        assert!(matches!(
            m.parse(") p").unwrap_err(),
            ParseError::ExpectedAtom { .. }
        ));
        assert!(matches!(
            m.parse("p &").unwrap_err(),
            ParseError::UnexpectedEnd
        ));
        assert!(matches!(
            m.parse("not").unwrap_err(),
            ParseError::UnexpectedEnd
        ));

        assert_eq!(
            m.parse("p # q").unwrap_err(),
            ParseError::UnrecognizedChar { ch: '#', pos: 2 }
        );
    }
}
