use text_size::{TextRange, TextSize};

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    SEMICOLON,
    COLON,
    COMMA,
    DOT,
    QUESTION,
    TILDE,
    STAR,
    AMP,
    PLUS,
    MINUS,
    BANG,
    SLASH,
    PERCENT,
    CARET,
    PIPE,
    LESS,
    GREATER,
    EQ,

    /// `+=` `-=` `*=` `/=` `%=` `<<=` `>>=` `&=` `^=` `|=`
    ASSIGN_OP,
    /// `==` `!=`
    EQUAL_OP,
    /// `<=` `>=`
    REL_OP,
    /// `<<` `>>`
    SHIFT_OP,
    LOG_OR_OP,
    LOG_AND_OP,
    /// `++` `--`
    INC_OP,
    SCOPE,
    ELLIPSIS,
    /// `.*` `->*`
    PM_OP,
    ARROW_OP,

    IDENTIFIER,
    CONSTANT,
    CHAR_CONST,
    WIDE_CHAR_CONST,
    STRING_LITERAL,
    WIDE_STRING_LITERAL,

    AUTO_KW,
    BOOL_KW,
    BREAK_KW,
    CASE_KW,
    CATCH_KW,
    CHAR_KW,
    CLASS_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DELETE_KW,
    DO_KW,
    DOUBLE_KW,
    ELSE_KW,
    ENUM_KW,
    EXTERN_KW,
    FLOAT_KW,
    FOR_KW,
    FRIEND_KW,
    GOTO_KW,
    IF_KW,
    INLINE_KW,
    INT_KW,
    LONG_KW,
    MUTABLE_KW,
    NAMESPACE_KW,
    NEW_KW,
    OPERATOR_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    REGISTER_KW,
    RETURN_KW,
    SHORT_KW,
    SIGNED_KW,
    SIZEOF_KW,
    STATIC_KW,
    STRUCT_KW,
    SWITCH_KW,
    TEMPLATE_KW,
    THIS_KW,
    THROW_KW,
    TRY_KW,
    TYPEDEF_KW,
    TYPEID_KW,
    UNION_KW,
    UNSIGNED_KW,
    USING_KW,
    VIRTUAL_KW,
    VOID_KW,
    VOLATILE_KW,
    WCHAR_KW,
    WHILE_KW,

    /// `typeof` / `__typeof__`, recognized only under the GNU rule set.
    TYPEOF_KW,
    /// `__int64`, recognized only under the MSVC rule set.
    INT64_KW,

    COMMENT,
    BAD_TOKEN,
    EOF,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::AUTO_KW
                | Self::BOOL_KW
                | Self::BREAK_KW
                | Self::CASE_KW
                | Self::CATCH_KW
                | Self::CHAR_KW
                | Self::CLASS_KW
                | Self::CONST_KW
                | Self::CONTINUE_KW
                | Self::DEFAULT_KW
                | Self::DELETE_KW
                | Self::DO_KW
                | Self::DOUBLE_KW
                | Self::ELSE_KW
                | Self::ENUM_KW
                | Self::EXTERN_KW
                | Self::FLOAT_KW
                | Self::FOR_KW
                | Self::FRIEND_KW
                | Self::GOTO_KW
                | Self::IF_KW
                | Self::INLINE_KW
                | Self::INT_KW
                | Self::LONG_KW
                | Self::MUTABLE_KW
                | Self::NAMESPACE_KW
                | Self::NEW_KW
                | Self::OPERATOR_KW
                | Self::PRIVATE_KW
                | Self::PROTECTED_KW
                | Self::PUBLIC_KW
                | Self::REGISTER_KW
                | Self::RETURN_KW
                | Self::SHORT_KW
                | Self::SIGNED_KW
                | Self::SIZEOF_KW
                | Self::STATIC_KW
                | Self::STRUCT_KW
                | Self::SWITCH_KW
                | Self::TEMPLATE_KW
                | Self::THIS_KW
                | Self::THROW_KW
                | Self::TRY_KW
                | Self::TYPEDEF_KW
                | Self::TYPEID_KW
                | Self::UNION_KW
                | Self::UNSIGNED_KW
                | Self::USING_KW
                | Self::VIRTUAL_KW
                | Self::VOID_KW
                | Self::VOLATILE_KW
                | Self::WCHAR_KW
                | Self::WHILE_KW
                | Self::TYPEOF_KW
                | Self::INT64_KW
        )
    }

    /// Built-in type keywords that may start an integral type specifier.
    pub fn is_integral_type(self) -> bool {
        matches!(
            self,
            Self::CHAR_KW
                | Self::WCHAR_KW
                | Self::BOOL_KW
                | Self::SHORT_KW
                | Self::INT_KW
                | Self::LONG_KW
                | Self::SIGNED_KW
                | Self::UNSIGNED_KW
                | Self::FLOAT_KW
                | Self::DOUBLE_KW
                | Self::VOID_KW
                | Self::INT64_KW
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: TextRange,
}

impl Token {
    pub const EOF: Self = Self { kind: TokenKind::EOF, range: TextRange::empty(TextSize::new(0)) };

    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }
}
