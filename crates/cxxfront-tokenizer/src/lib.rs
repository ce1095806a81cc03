mod cursor;
mod token;

use cursor::{Cursor, EOF_CHAR};
pub use line_index::LineCol;
use line_index::LineIndex;
use text_size::{TextRange, TextSize};
pub use token::{Token, TokenKind};
use token::TokenKind::*;

/// Which dialect extensions the lexer and parser accept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub gnu: bool,
    pub msvc: bool,
}

impl RuleSet {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn gnu() -> Self {
        Self { gnu: true, msvc: false }
    }

    pub fn msvc() -> Self {
        Self { gnu: false, msvc: true }
    }
}

struct Lexer<'t> {
    text: &'t str,
    cursor: Cursor<'t>,
    rules: RuleSet,
    comments: Vec<Token>,
}

impl<'t> Lexer<'t> {
    fn new(text: &'t str, rules: RuleSet) -> Self {
        Self { text, cursor: Cursor::new(text), rules, comments: Vec::new() }
    }

    fn range(&self) -> TextRange {
        let end = TextSize::new(self.text.len() as u32) - self.cursor.len();
        let len = self.cursor.pos_within_token();
        TextRange::at(end - len, len)
    }

    fn text(&self) -> &'t str {
        let range: std::ops::Range<usize> = self.range().into();
        &self.text[range]
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.peek() {
                c if c.is_ascii_whitespace() => {
                    self.cursor.advance_while(|c| c.is_ascii_whitespace());
                }
                '\\' if self.cursor.second() == '\n' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    self.comments.push(Token::new(COMMENT, self.range()));
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    loop {
                        match self.cursor.peek() {
                            EOF_CHAR => break,
                            '*' if self.cursor.second() == '/' => {
                                self.cursor.advance();
                                self.cursor.advance();
                                break;
                            }
                            _ => {
                                self.cursor.advance();
                            }
                        }
                    }
                    self.comments.push(Token::new(COMMENT, self.range()));
                }
                // Preprocessor directives are line trivia here; a
                // backslash-newline continues the line.
                '#' => loop {
                    match self.cursor.peek() {
                        EOF_CHAR | '\n' => break,
                        '\\' if self.cursor.second() == '\n' => {
                            self.cursor.advance();
                            self.cursor.advance();
                        }
                        _ => {
                            self.cursor.advance();
                        }
                    }
                },
                _ => break,
            }
            self.cursor.reset_pos_within_token();
        }
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ';' => SEMICOLON,
            ',' => COMMA,
            '~' => TILDE,
            '?' => QUESTION,
            ':' => {
                if self.cursor.advance_if(':') {
                    SCOPE
                } else {
                    COLON
                }
            }
            '.' => {
                if self.cursor.peek().is_ascii_digit() {
                    self.fraction()
                } else if self.cursor.advance_if('*') {
                    PM_OP
                } else if self.cursor.matches('.') && self.cursor.second() == '.' {
                    self.cursor.advance();
                    self.cursor.advance();
                    ELLIPSIS
                } else {
                    DOT
                }
            }
            '+' => {
                if self.cursor.advance_if('+') {
                    INC_OP
                } else if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else {
                    PLUS
                }
            }
            '-' => {
                if self.cursor.advance_if('-') {
                    INC_OP
                } else if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else if self.cursor.advance_if('>') {
                    if self.cursor.advance_if('*') { PM_OP } else { ARROW_OP }
                } else {
                    MINUS
                }
            }
            '*' => {
                if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else {
                    STAR
                }
            }
            '/' => {
                if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else {
                    SLASH
                }
            }
            '%' => {
                if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else {
                    PERCENT
                }
            }
            '^' => {
                if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else {
                    CARET
                }
            }
            '&' => {
                if self.cursor.advance_if('&') {
                    LOG_AND_OP
                } else if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else {
                    AMP
                }
            }
            '|' => {
                if self.cursor.advance_if('|') {
                    LOG_OR_OP
                } else if self.cursor.advance_if('=') {
                    ASSIGN_OP
                } else {
                    PIPE
                }
            }
            '!' => {
                if self.cursor.advance_if('=') {
                    EQUAL_OP
                } else {
                    BANG
                }
            }
            '=' => {
                if self.cursor.advance_if('=') {
                    EQUAL_OP
                } else {
                    EQ
                }
            }
            '<' => {
                if self.cursor.advance_if('<') {
                    if self.cursor.advance_if('=') { ASSIGN_OP } else { SHIFT_OP }
                } else if self.cursor.advance_if('=') {
                    REL_OP
                } else {
                    LESS
                }
            }
            '>' => {
                if self.cursor.advance_if('>') {
                    if self.cursor.advance_if('=') { ASSIGN_OP } else { SHIFT_OP }
                } else if self.cursor.advance_if('=') {
                    REL_OP
                } else {
                    GREATER
                }
            }
            first_char @ '0'..='9' => self.number(first_char),
            '\'' => self.char_const(CHAR_CONST),
            '"' => self.string_literal(STRING_LITERAL),
            'L' if self.cursor.matches('\'') => {
                self.cursor.advance();
                self.char_const(WIDE_CHAR_CONST)
            }
            'L' if self.cursor.matches('"') => {
                self.cursor.advance();
                self.string_literal(WIDE_STRING_LITERAL)
            }
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                self.identifier_kind()
            }
            EOF_CHAR => EOF,
            _ => BAD_TOKEN,
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();
        Token::new(kind, range)
    }

    fn number(&mut self, first_char: char) -> TokenKind {
        if first_char == '0' && (self.cursor.matches('x') || self.cursor.matches('X')) {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_hexdigit());
            self.integer_suffix();
            return CONSTANT;
        }

        self.cursor.advance_while(|c| c.is_ascii_digit());
        if self.cursor.matches('.') && self.cursor.second() != '.' {
            self.cursor.advance();
            return self.fraction();
        }
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.exponent();
            self.float_suffix();
        } else {
            self.integer_suffix();
        }
        CONSTANT
    }

    /// Digits after the decimal point, then exponent and suffix.
    fn fraction(&mut self) -> TokenKind {
        self.cursor.advance_while(|c| c.is_ascii_digit());
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.exponent();
        }
        self.float_suffix();
        CONSTANT
    }

    fn exponent(&mut self) {
        self.cursor.advance();
        if self.cursor.matches('+') || self.cursor.matches('-') {
            self.cursor.advance();
        }
        self.cursor.advance_while(|c| c.is_ascii_digit());
    }

    fn integer_suffix(&mut self) {
        self.cursor.advance_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    }

    fn float_suffix(&mut self) {
        self.cursor.advance_while(|c| matches!(c, 'f' | 'F' | 'l' | 'L'));
    }

    fn char_const(&mut self, kind: TokenKind) -> TokenKind {
        loop {
            match self.cursor.advance() {
                '\\' => {
                    self.cursor.advance();
                }
                '\'' => return kind,
                '\n' | EOF_CHAR => return BAD_TOKEN,
                _ => {}
            }
        }
    }

    fn string_literal(&mut self, kind: TokenKind) -> TokenKind {
        loop {
            match self.cursor.advance() {
                '\\' => {
                    self.cursor.advance();
                }
                '"' => return kind,
                EOF_CHAR => return BAD_TOKEN,
                _ => {}
            }
        }
    }

    fn identifier_kind(&self) -> TokenKind {
        match self.text() {
            "auto" => AUTO_KW,
            "bool" => BOOL_KW,
            "break" => BREAK_KW,
            "case" => CASE_KW,
            "catch" => CATCH_KW,
            "char" => CHAR_KW,
            "class" => CLASS_KW,
            "const" => CONST_KW,
            "continue" => CONTINUE_KW,
            "default" => DEFAULT_KW,
            "delete" => DELETE_KW,
            "do" => DO_KW,
            "double" => DOUBLE_KW,
            "else" => ELSE_KW,
            "enum" => ENUM_KW,
            "extern" => EXTERN_KW,
            "float" => FLOAT_KW,
            "for" => FOR_KW,
            "friend" => FRIEND_KW,
            "goto" => GOTO_KW,
            "if" => IF_KW,
            "inline" => INLINE_KW,
            "int" => INT_KW,
            "long" => LONG_KW,
            "mutable" => MUTABLE_KW,
            "namespace" => NAMESPACE_KW,
            "new" => NEW_KW,
            "operator" => OPERATOR_KW,
            "private" => PRIVATE_KW,
            "protected" => PROTECTED_KW,
            "public" => PUBLIC_KW,
            "register" => REGISTER_KW,
            "return" => RETURN_KW,
            "short" => SHORT_KW,
            "signed" => SIGNED_KW,
            "sizeof" => SIZEOF_KW,
            "static" => STATIC_KW,
            "struct" => STRUCT_KW,
            "switch" => SWITCH_KW,
            "template" => TEMPLATE_KW,
            "this" => THIS_KW,
            "throw" => THROW_KW,
            "try" => TRY_KW,
            "typedef" => TYPEDEF_KW,
            "typeid" => TYPEID_KW,
            "union" => UNION_KW,
            "unsigned" => UNSIGNED_KW,
            "using" => USING_KW,
            "virtual" => VIRTUAL_KW,
            "void" => VOID_KW,
            "volatile" => VOLATILE_KW,
            "wchar_t" => WCHAR_KW,
            "while" => WHILE_KW,
            "typeof" | "__typeof__" if self.rules.gnu => TYPEOF_KW,
            "__int64" if self.rules.msvc => INT64_KW,
            _ => IDENTIFIER,
        }
    }
}

/// Lexes the whole input. Comments go to a side list, the token
/// list always ends with a single `EOF` token.
pub fn tokenize(text: &str, rules: RuleSet) -> (Vec<Token>, Vec<Token>) {
    let mut lexer = Lexer::new(text, rules);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == EOF;
        tokens.push(token);
        if done {
            break;
        }
    }
    (tokens, lexer.comments)
}

/// A position in the token stream that can be returned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    comment_cursor: usize,
}

/// Fully lexed input with lookahead, rewind and comment draining.
pub struct TokenStream<'t> {
    text: &'t str,
    tokens: Vec<Token>,
    comments: Vec<Token>,
    pos: usize,
    comment_cursor: usize,
    line_index: LineIndex,
}

impl<'t> TokenStream<'t> {
    pub fn new(text: &'t str, rules: RuleSet) -> Self {
        let (tokens, comments) = tokenize(text, rules);
        Self {
            text,
            tokens,
            comments,
            pos: 0,
            comment_cursor: 0,
            line_index: LineIndex::new(text),
        }
    }

    pub fn source(&self) -> &'t str {
        self.text
    }

    pub fn peek(&self, n: usize) -> Token {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    pub fn current(&self) -> Token {
        self.peek(0)
    }

    pub fn next(&mut self) -> Token {
        let token = self.current();
        if token.kind != EOF {
            self.pos += 1;
        }
        token
    }

    pub fn at_eof(&self) -> bool {
        self.current().kind == EOF
    }

    pub fn mark(&self) -> Checkpoint {
        Checkpoint { pos: self.pos, comment_cursor: self.comment_cursor }
    }

    pub fn reset(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.comment_cursor = checkpoint.comment_cursor;
    }

    /// Comments that lie before the current token and have not been
    /// claimed yet. Rewinding past them makes them claimable again.
    pub fn take_comments(&mut self) -> &[Token] {
        let limit = self.current().range.start();
        let start = self.comment_cursor;
        let mut end = start;
        while end < self.comments.len() && self.comments[end].range.end() <= limit {
            end += 1;
        }
        self.comment_cursor = end;
        &self.comments[start..end]
    }

    /// Splits a `>>` at the current position into two `>` tokens so a
    /// nested template argument list can close.
    pub fn split_shift(&mut self) {
        let token = self.current();
        debug_assert_eq!(token.kind, SHIFT_OP);
        debug_assert_eq!(self.text(token.range), ">>");
        let mid = token.range.start() + TextSize::new(1);
        self.tokens[self.pos] = Token::new(GREATER, TextRange::new(token.range.start(), mid));
        self.tokens.insert(self.pos + 1, Token::new(GREATER, TextRange::new(mid, token.range.end())));
    }

    pub fn text(&self, range: TextRange) -> &'t str {
        &self.text[std::ops::Range::<usize>::from(range)]
    }

    pub fn token_text(&self, token: Token) -> &'t str {
        self.text(token.range)
    }

    pub fn locate(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let (tokens, _) = tokenize(text, RuleSet::strict());
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn punctuation_and_composed_operators() {
        assert_eq!(
            kinds("a += b << c && d ->* e"),
            vec![
                IDENTIFIER, ASSIGN_OP, IDENTIFIER, SHIFT_OP, IDENTIFIER, LOG_AND_OP, IDENTIFIER,
                PM_OP, IDENTIFIER, EOF
            ]
        );
        assert_eq!(kinds("::"), vec![SCOPE, EOF]);
        assert_eq!(kinds(": :"), vec![COLON, COLON, EOF]);
        assert_eq!(kinds("..."), vec![ELLIPSIS, EOF]);
        assert_eq!(kinds(".* . ->"), vec![PM_OP, DOT, ARROW_OP, EOF]);
        assert_eq!(kinds("< << <<= <="), vec![LESS, SHIFT_OP, ASSIGN_OP, REL_OP, EOF]);
        assert_eq!(kinds("== != ="), vec![EQUAL_OP, EQUAL_OP, EQ, EOF]);
    }

    #[test]
    fn literals() {
        assert_eq!(kinds("0 42 0x1fU 10uL 1.5 .5 1e10 1.e-3f"), vec![
            CONSTANT, CONSTANT, CONSTANT, CONSTANT, CONSTANT, CONSTANT, CONSTANT, CONSTANT, EOF
        ]);
        assert_eq!(kinds(r"'a' '\n' L'x'"), vec![CHAR_CONST, CHAR_CONST, WIDE_CHAR_CONST, EOF]);
        assert_eq!(kinds(r#""hi" L"wide" "esc\"aped""#), vec![
            STRING_LITERAL, WIDE_STRING_LITERAL, STRING_LITERAL, EOF
        ]);
        assert_eq!(kinds("'unterminated"), vec![BAD_TOKEN, EOF]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("class x; wchar_t w;"), vec![
            CLASS_KW, IDENTIFIER, SEMICOLON, WCHAR_KW, IDENTIFIER, SEMICOLON, EOF
        ]);
        // `typeof` is an identifier unless the GNU rules are on.
        assert_eq!(kinds("typeof"), vec![IDENTIFIER, EOF]);
        let (tokens, _) = tokenize("typeof __int64", RuleSet::gnu());
        assert_eq!(tokens[0].kind, TYPEOF_KW);
        assert_eq!(tokens[1].kind, IDENTIFIER);
        let (tokens, _) = tokenize("__int64", RuleSet::msvc());
        assert_eq!(tokens[0].kind, INT64_KW);
    }

    #[test]
    fn directives_are_trivia() {
        assert_eq!(kinds("#include <x.h>\nint a;"), vec![INT_KW, IDENTIFIER, SEMICOLON, EOF]);
        assert_eq!(kinds("#define M(a) \\\n  (a)\nint b;"), vec![
            INT_KW, IDENTIFIER, SEMICOLON, EOF
        ]);
        assert_eq!(kinds("#endif"), vec![EOF]);
    }

    #[test]
    fn comments_go_to_side_list() {
        let (tokens, comments) = tokenize("int a; // trailing\n/* block */ int b;", RuleSet::strict());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![INT_KW, IDENTIFIER, SEMICOLON, INT_KW, IDENTIFIER, SEMICOLON, EOF]);
        assert_eq!(comments.len(), 2);
        assert!(comments.iter().all(|c| c.kind == COMMENT));
    }

    #[test]
    fn stream_rewind_restores_comments() {
        let text = "int a; /* note */ int b;";
        let mut stream = TokenStream::new(text, RuleSet::strict());
        let start = stream.mark();
        for _ in 0..3 {
            stream.next();
        }
        assert_eq!(stream.take_comments().len(), 1);
        assert_eq!(stream.take_comments().len(), 0);
        stream.reset(start);
        for _ in 0..3 {
            stream.next();
        }
        assert_eq!(stream.take_comments().len(), 1);
    }

    #[test]
    fn splitting_a_right_shift() {
        let mut stream = TokenStream::new("a>>b", RuleSet::strict());
        stream.next();
        assert_eq!(stream.current().kind, SHIFT_OP);
        stream.split_shift();
        assert_eq!(stream.next().kind, GREATER);
        let second = stream.next();
        assert_eq!(second.kind, GREATER);
        assert_eq!(stream.text(second.range), ">");
        assert_eq!(stream.next().kind, IDENTIFIER);
    }

    #[test]
    fn lookahead_is_clamped_at_eof() {
        let stream = TokenStream::new("x", RuleSet::strict());
        assert_eq!(stream.peek_kind(0), IDENTIFIER);
        assert_eq!(stream.peek_kind(1), EOF);
        assert_eq!(stream.peek_kind(100), EOF);
    }
}
