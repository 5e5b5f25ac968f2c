use super::Parser;
use crate::error::Result;
use crate::interpreter::lexer::split_at_decimal_comma;
use crate::interpreter::registry::Function;
use crate::interpreter::syntax::program::Instruction;
use crate::interpreter::token::TokenKind;
use log::trace;

impl Parser<'_> {
    /// `name(a, b)`, `name(a b)` or `name(a)`. Both arguments are read whatever the
    /// arity of the function, so that a surplus argument is reported as such.
    pub(super) fn parse_parenthesized_call(&mut self, function: &'static Function) -> Result<()> {
        let open = self.expect(TokenKind::LeftParentheses)?;
        self.nested(open.position, |parser| {
            let arguments = parser.parse_arguments(function, true)?;
            parser.expect(TokenKind::RightParentheses)?;
            parser.emit_call(function, arguments)
        })
    }

    /// `name a, b`, `name a b` or `name a`, where each argument is a whole additive
    /// expression. A second argument is only read when the function accepts one.
    pub(super) fn parse_bare_call(&mut self, function: &'static Function, position: usize) -> Result<()> {
        self.nested(position, |parser| {
            let arguments = parser.parse_arguments(function, false)?;
            parser.emit_call(function, arguments)
        })
    }

    fn parse_arguments(&mut self, function: &Function, parenthesized: bool) -> Result<usize> {
        let takes_pair = function.arity().accepts(2);
        self.splitting_decimal_commas(takes_pair, |parser| parser.parse_expression(0))?;
        if !takes_pair && !parenthesized {
            return Ok(1);
        }

        self.split_leading_comma()?;
        match self.tokens.front() {
            Some(token) if token.kind == TokenKind::Comma => {
                self.tokens.pop_front();
            }
            Some(token) if token.starts_expression() => {}
            _ => return Ok(1),
        }
        self.splitting_decimal_commas(false, |parser| parser.parse_expression(0))?;
        Ok(2)
    }

    /// A literal such as `,4` right after the first argument is the argument
    /// separator followed by the number `4`.
    fn split_leading_comma(&mut self) -> Result<()> {
        let pieces = match self.tokens.front() {
            Some(token) if token.lexeme.starts_with(',') => split_at_decimal_comma(token)?,
            _ => None,
        };
        if let Some(pieces) = pieces {
            self.tokens.pop_front();
            for piece in pieces.into_iter().rev() {
                self.tokens.push_front(piece);
            }
        }
        Ok(())
    }

    fn emit_call(&mut self, function: &'static Function, arguments: usize) -> Result<()> {
        function.check_arity(arguments)?;
        trace!("call to {} with {} argument(s)", function.name, arguments);
        self.output.push(Instruction::Call {
            function,
            arguments,
        });
        Ok(())
    }
}
