use crate::error::{EvaluationError, Result};
use crate::interpreter::number::Number;
use crate::interpreter::operator::ComparisonOperator;
use crate::interpreter::token::{Token, TokenKind};

/// Literal exponents beyond this magnitude are rejected while reading the literal.
const EXPONENT_LIMIT: i64 = 1_000_000_000_000;

/// Operator symbols, longest first so that e.g. `**` wins over `*`.
static SYMBOLS: [(&str, TokenKind); 18] = [
    ("===", TokenKind::Comparison(ComparisonOperator::Equal)),
    ("==", TokenKind::Comparison(ComparisonOperator::Equal)),
    ("<=", TokenKind::Comparison(ComparisonOperator::LessOrEqual)),
    (">=", TokenKind::Comparison(ComparisonOperator::GreaterOrEqual)),
    ("!=", TokenKind::Comparison(ComparisonOperator::NotEqual)),
    ("<>", TokenKind::Comparison(ComparisonOperator::NotEqual)),
    ("**", TokenKind::DoubleAsterisk),
    ("=", TokenKind::Comparison(ComparisonOperator::Equal)),
    ("<", TokenKind::Comparison(ComparisonOperator::Less)),
    (">", TokenKind::Comparison(ComparisonOperator::Greater)),
    ("!", TokenKind::Exclamation),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Dash),
    ("*", TokenKind::Asterisk),
    ("/", TokenKind::ForwardSlash),
    ("(", TokenKind::LeftParentheses),
    (")", TokenKind::RightParentheses),
    (",", TokenKind::Comma),
];

/// Converts an expression into the tokens it consists of.
///
/// # Arguments
///
/// * `expression`: A normalized (trimmed, lower-cased) text expression.
///
/// returns: The tokens of the expression, in the order they appear.
///
/// # Examples
///
/// ```
/// use decimal_calculator::interpreter::lexer::tokenize;
///
/// let tokens = tokenize("2 ** 3").unwrap();
/// let lexemes: Vec<_> = tokens.iter().map(|token| token.lexeme.as_str()).collect();
/// assert_eq!(lexemes, ["2", "**", "3"]);
/// ```
pub fn tokenize(expression: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(expression);
    let mut tokens = vec![];
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    source: &'a str,
    characters: Vec<(usize, char)>,
    index: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            characters: source.char_indices().collect(),
            index: 0,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.characters
            .get(self.index + offset)
            .map(|&(_, character)| character)
    }

    fn offset(&self) -> usize {
        self.characters
            .get(self.index)
            .map_or(self.source.len(), |&(position, _)| position)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        while matches!(self.peek_at(0), Some(' ' | '\t')) {
            self.index += 1;
        }
        let start = self.offset();
        let character = match self.peek_at(0) {
            None => return Ok(None),
            Some(character) => character,
        };

        let starts_number = character.is_ascii_digit()
            || (matches!(character, '.' | ',')
                && self.peek_at(1).map_or(false, |next| next.is_ascii_digit()));
        if starts_number {
            return self.number(start).map(Some);
        }
        if character.is_alphabetic() || character == '_' {
            return Ok(Some(self.name(start)));
        }

        let rest = &self.source[start..];
        match SYMBOLS.iter().find(|(symbol, _)| rest.starts_with(symbol)) {
            Some((symbol, kind)) => {
                self.index += symbol.len();
                Ok(Some(Token::new(kind.clone(), *symbol, start)))
            }
            None => Err(EvaluationError::IllegalCharacter {
                character,
                position: start,
            }),
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_at(0).map_or(false, |c| c.is_ascii_digit()) {
            self.index += 1;
        }
    }

    /// Reads `[digits][(.|,)digits][(e|E)[+-]digits]`.
    fn number(&mut self, start: usize) -> Result<Token> {
        self.skip_digits();
        if matches!(self.peek_at(0), Some('.' | ',')) {
            self.index += 1;
            self.skip_digits();
        }
        if matches!(self.peek_at(0), Some('e' | 'E')) {
            let digit_offset = if matches!(self.peek_at(1), Some('+' | '-')) {
                2
            } else {
                1
            };
            if self
                .peek_at(digit_offset)
                .map_or(false, |c| c.is_ascii_digit())
            {
                self.index += digit_offset;
                self.skip_digits();
                if self.peek_at(0) == Some('.') {
                    self.index += 1;
                    self.skip_digits();
                    return Err(EvaluationError::MalformedNumber {
                        lexeme: self.source[start..self.offset()].to_string(),
                        position: start,
                    });
                }
            }
        }
        literal(&self.source[start..self.offset()], start)
    }

    fn name(&mut self, start: usize) -> Token {
        while self
            .peek_at(0)
            .map_or(false, |c| c.is_alphanumeric() || c == '_')
        {
            self.index += 1;
        }
        let lexeme = &self.source[start..self.offset()];
        Token::new(TokenKind::Identifier(lexeme.to_string()), lexeme, start)
    }
}

fn literal(lexeme: &str, position: usize) -> Result<Token> {
    let malformed = || EvaluationError::MalformedNumber {
        lexeme: lexeme.to_string(),
        position,
    };
    let value: Number = lexeme
        .replacen(',', ".", 1)
        .parse()
        .map_err(|_| malformed())?;
    if value.adjusted().abs() > EXPONENT_LIMIT {
        return Err(malformed());
    }
    Ok(Token::new(TokenKind::Literal(value), lexeme, position))
}

/// Splits a numeric literal at its decimal comma into the literals on either side
/// of it and a comma token between them: `3,4` becomes `3` `,` `4`, `2,` becomes
/// `2` `,` and `,5` becomes `,` `5`.
///
/// Returns `None` for tokens that are not literals written with a comma, and for
/// literals such as `2,e3` whose exponent cannot stand alone.
pub(crate) fn split_at_decimal_comma(token: &Token) -> Result<Option<Vec<Token>>> {
    if !matches!(token.kind, TokenKind::Literal(_)) {
        return Ok(None);
    }
    let comma = match token.lexeme.find(',') {
        Some(comma) => comma,
        None => return Ok(None),
    };
    let (integer, fraction) = (&token.lexeme[..comma], &token.lexeme[comma + 1..]);
    if !fraction.is_empty() && !fraction.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }

    let mut pieces = vec![];
    if !integer.is_empty() {
        pieces.push(literal(integer, token.position)?);
    }
    pieces.push(Token::new(TokenKind::Comma, ",", token.position + comma));
    if !fraction.is_empty() {
        pieces.push(literal(fraction, token.position + comma + 1)?);
    }
    Ok(Some(pieces))
}
