use chumsky::prelude::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Var,
    Fun,
    If,
    Else,
    While,
    For,
    Print,
    Return,
    And,
    Or,
    // Reserved but has no grammar production; the parser treats it as a
    // statement boundary during error recovery.
    Class,
    True,
    False,
    Nil,

    // Literals and identifiers
    Ident(String),
    Number(f64),
    Str(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Assign,
    Eq,
    NotEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,

    // Delimiters
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Var => "var",
            Token::Fun => "fun",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
            Token::For => "for",
            Token::Print => "print",
            Token::Return => "return",
            Token::And => "and",
            Token::Or => "or",
            Token::Class => "class",
            Token::True => "true",
            Token::False => "false",
            Token::Nil => "nil",
            Token::Ident(name) => return write!(f, "{}", name),
            Token::Number(n) => return write!(f, "{}", n),
            Token::Str(s) => return write!(f, "\"{}\"", s),
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Bang => "!",
            Token::Assign => "=",
            Token::Eq => "==",
            Token::NotEq => "!=",
            Token::Greater => ">",
            Token::GreaterEq => ">=",
            Token::Less => "<",
            Token::LessEq => "<=",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
        };
        write!(f, "{}", text)
    }
}

pub fn lexer<'a>(
) -> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    let number = text::int(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| Token::Number(s.parse().unwrap()));

    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('"'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
    )));

    let string = just('"')
        .ignore_then(none_of("\\\"").or(escape).repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(Token::Str);

    let ident = text::ident().map(|s: &str| match s {
        "var" => Token::Var,
        "fun" => Token::Fun,
        "if" => Token::If,
        "else" => Token::Else,
        "while" => Token::While,
        "for" => Token::For,
        "print" => Token::Print,
        "return" => Token::Return,
        "and" => Token::And,
        "or" => Token::Or,
        "class" => Token::Class,
        "true" => Token::True,
        "false" => Token::False,
        "nil" => Token::Nil,
        _ => Token::Ident(s.to_string()),
    });

    let op_double = choice((
        just("==").to(Token::Eq),
        just("!=").to(Token::NotEq),
        just(">=").to(Token::GreaterEq),
        just("<=").to(Token::LessEq),
    ));

    let op_single = choice((
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('>').to(Token::Greater),
        just('<').to(Token::Less),
        just('!').to(Token::Bang),
        just('=').to(Token::Assign),
        just(';').to(Token::Semicolon),
        just(',').to(Token::Comma),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('{').to(Token::LBrace),
        just('}').to(Token::RBrace),
    ));

    let op = op_double.or(op_single);

    let comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .padded();

    let token = number
        .or(string)
        .or(ident)
        .or(op)
        .map_with(|tok, e| (tok, e.span()))
        .padded_by(comment.clone().repeated())
        .padded();

    token
        .repeated()
        .collect()
        .then_ignore(comment.repeated())
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chumsky::Parser;

    fn lex(source: &str) -> Vec<Token> {
        lexer()
            .parse(source)
            .output()
            .expect("Lexer failed")
            .iter()
            .map(|(tok, _)| tok.clone())
            .collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(lex("var"), vec![Token::Var]);
        assert_eq!(lex("fun"), vec![Token::Fun]);
        assert_eq!(lex("print"), vec![Token::Print]);
        assert_eq!(lex("true"), vec![Token::True]);
        assert_eq!(lex("false"), vec![Token::False]);
        assert_eq!(lex("nil"), vec![Token::Nil]);
        assert_eq!(lex("and or"), vec![Token::And, Token::Or]);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(lex("foo"), vec![Token::Ident("foo".to_string())]);
        assert_eq!(lex("bar123"), vec![Token::Ident("bar123".to_string())]);
        assert_eq!(lex("_test"), vec![Token::Ident("_test".to_string())]);
        // Keyword prefixes stay identifiers
        assert_eq!(lex("variable"), vec![Token::Ident("variable".to_string())]);
        assert_eq!(lex("orchid"), vec![Token::Ident("orchid".to_string())]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42"), vec![Token::Number(42.0)]);
        assert_eq!(lex("0"), vec![Token::Number(0.0)]);
        assert_eq!(lex("3.14"), vec![Token::Number(3.14)]);
        assert_eq!(lex("123.456"), vec![Token::Number(123.456)]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex(r#""hello""#), vec![Token::Str("hello".to_string())]);
        assert_eq!(lex(r#""""#), vec![Token::Str("".to_string())]);
        assert_eq!(
            lex(r#""line\nbreak""#),
            vec![Token::Str("line\nbreak".to_string())]
        );
        assert_eq!(
            lex(r#""quote\"here""#),
            vec![Token::Str("quote\"here".to_string())]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(lex("+ - * /"), vec![Token::Plus, Token::Minus, Token::Star, Token::Slash]);
        assert_eq!(lex("=="), vec![Token::Eq]);
        assert_eq!(lex("!="), vec![Token::NotEq]);
        assert_eq!(lex(">="), vec![Token::GreaterEq]);
        assert_eq!(lex("<="), vec![Token::LessEq]);
        // `==` must not lex as two assigns
        assert_eq!(lex("= ="), vec![Token::Assign, Token::Assign]);
        assert_eq!(lex("!="), vec![Token::NotEq]);
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            lex("(){};,"),
            vec![
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::Semicolon,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            lex("var x = 1; // trailing comment"),
            vec![
                Token::Var,
                Token::Ident("x".to_string()),
                Token::Assign,
                Token::Number(1.0),
                Token::Semicolon,
            ]
        );
        assert_eq!(
            lex("// a full line\nprint 1;"),
            vec![Token::Print, Token::Number(1.0), Token::Semicolon]
        );
    }

    #[test]
    fn test_spans_cover_lexemes() {
        let tokens = lexer().parse("var abc").into_output().expect("Lexer failed");
        let (_, span) = &tokens[1];
        assert_eq!(span.start, 4);
        assert_eq!(span.end, 7);
    }

    #[test]
    fn test_unterminated_string_fails() {
        assert!(lexer().parse(r#""unterminated"#).into_output().is_none());
    }
}
