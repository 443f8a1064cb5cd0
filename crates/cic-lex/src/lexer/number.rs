//! Number literal lexing.
//!
//! Integers are decimal, hexadecimal (`0x`) or binary (`0b`), with `_` legal
//! as a digit separator, decoded to 64-bit signed values. Doubles require a
//! digit on both sides of the decimal point and at least one exponent digit.

use crate::token::Token;
use crate::Lexer;
use cic_util::ParseResult;

impl<'a> Lexer<'a> {
    /// Lexes a number literal starting at an ASCII digit.
    pub(crate) fn lex_number(&mut self) -> ParseResult<Token> {
        if self.cursor.current_char() == '0' {
            match self.cursor.peek_char(1) {
                'x' | 'X' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    return self.lex_integer(16);
                }
                'b' | 'B' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    return self.lex_integer(2);
                }
                c if c.is_ascii_digit() || c == '_' => {
                    return Err(self.error("Leading zeros are not permitted"));
                }
                _ => {}
            }
        }

        let start = self.cursor.position();
        self.skip_digits();

        // A '.' starts a fraction only when a digit follows, so `1..2`
        // stays an integer range.
        let is_double = (self.cursor.current_char() == '.'
            && self.cursor.peek_char(1).is_ascii_digit())
            || self.cursor.current_char() == 'e'
            || self.cursor.current_char() == 'E';

        if !is_double {
            let digits = self.cursor.slice_from(start).replace('_', "");
            return match digits.parse::<i64>() {
                Ok(value) => Ok(Token::Long(value)),
                Err(_) => Err(self.error("Integer too large")),
            };
        }

        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            self.skip_digits();
        }

        if self.cursor.current_char() == 'e' || self.cursor.current_char() == 'E' {
            self.cursor.advance();
            if self.cursor.current_char() == '+' || self.cursor.current_char() == '-' {
                self.cursor.advance();
            }
            if !self.cursor.current_char().is_ascii_digit() {
                return Err(self.error("Invalid floating-point number"));
            }
            self.skip_digits();
        }

        let text = self.cursor.slice_from(start).replace('_', "");
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::Double(value)),
            _ => Err(self.error("Invalid floating-point number")),
        }
    }

    /// Lexes the digits of a hex or binary literal, after the prefix.
    fn lex_integer(&mut self, base: u32) -> ParseResult<Token> {
        let start = self.cursor.position();
        loop {
            let c = self.cursor.current_char();
            if c == '_' || c.is_digit(base) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let digits = self.cursor.slice_from(start).replace('_', "");
        if digits.is_empty() {
            return Err(self.error(format!("No digits after base-{} prefix", base)));
        }

        match i64::from_str_radix(&digits, base) {
            Ok(value) => Ok(Token::Long(value)),
            Err(_) => Err(self.error("Integer too large")),
        }
    }

    /// Skips decimal digits and `_` separators.
    fn skip_digits(&mut self) {
        loop {
            let c = self.cursor.current_char();
            if c == '_' || c.is_ascii_digit() {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::Token;
    use crate::Lexer;

    fn lex_one(source: &str) -> Token {
        let mut lexer = Lexer::new("test.ci", source);
        lexer.next_token().expect("lex error");
        lexer.current
    }

    fn lex_fails(source: &str) -> String {
        let mut lexer = Lexer::new("test.ci", source);
        lexer.next_token().expect_err("expected a lex error").message
    }

    #[test]
    fn test_decimal() {
        assert_eq!(lex_one("0"), Token::Long(0));
        assert_eq!(lex_one("42"), Token::Long(42));
        assert_eq!(lex_one("9223372036854775807"), Token::Long(i64::MAX));
    }

    #[test]
    fn test_decimal_overflow() {
        assert_eq!(lex_fails("9223372036854775808"), "Integer too large");
    }

    #[test]
    fn test_hex() {
        assert_eq!(lex_one("0xFF"), Token::Long(255));
        assert_eq!(lex_one("0x0"), Token::Long(0));
        assert_eq!(lex_one("0Xab"), Token::Long(171));
    }

    #[test]
    fn test_binary() {
        assert_eq!(lex_one("0b1010"), Token::Long(10));
        assert_eq!(lex_one("0B1"), Token::Long(1));
    }

    #[test]
    fn test_underscore_separators() {
        assert_eq!(lex_one("1_000_000"), Token::Long(1_000_000));
        assert_eq!(lex_one("0xFF_FF"), Token::Long(0xFFFF));
        assert_eq!(lex_one("0b1111_0000"), Token::Long(0b1111_0000));
    }

    #[test]
    fn test_empty_prefix() {
        assert_eq!(lex_fails("0x"), "No digits after base-16 prefix");
        assert_eq!(lex_fails("0b;"), "No digits after base-2 prefix");
    }

    #[test]
    fn test_leading_zero() {
        assert_eq!(lex_fails("0123"), "Leading zeros are not permitted");
    }

    #[test]
    fn test_doubles() {
        assert_eq!(lex_one("3.14"), Token::Double(3.14));
        assert_eq!(lex_one("0.5"), Token::Double(0.5));
        assert_eq!(lex_one("1e10"), Token::Double(1e10));
        assert_eq!(lex_one("2.5e-3"), Token::Double(2.5e-3));
        assert_eq!(lex_one("1E+2"), Token::Double(100.0));
    }

    #[test]
    fn test_missing_exponent_digits() {
        assert_eq!(lex_fails("1e"), "Invalid floating-point number");
        assert_eq!(lex_fails("1e+"), "Invalid floating-point number");
    }

    #[test]
    fn test_range_is_not_a_double() {
        let mut lexer = Lexer::new("test.ci", "1..2");
        lexer.next_token().unwrap();
        assert_eq!(lexer.current, Token::Long(1));
        lexer.next_token().unwrap();
        assert_eq!(lexer.current, Token::DotDot);
        lexer.next_token().unwrap();
        assert_eq!(lexer.current, Token::Long(2));
    }
}
