//! Compact byte-string encodings of C++ types and (qualified) names.
//!
//! The encodings are not normalized, as that would require symbol
//! lookup and type analysis.
//!
//! ```text
//! 'b' bool            'c' char            'w' wchar_t
//! 'i' int             's' short           'l' long
//! 'j' long long       'f' float           'd' double
//! 'r' long double     'v' void
//!
//! 'T' template-id     (Foo<int,char> ==> T[3]Foo[2]ic; [2] is the
//!     byte length of "ic", not the number of arguments)
//! 'e' ...
//! '?' no return type (constructors and destructors)
//! '*' non-type template argument
//!
//! 'S' signed   'U' unsigned   'C' const   'V' volatile
//!
//! 'P' pointer         'R' reference
//! 'A' array           (char[16] ==> A16_c)
//! 'F' function        (char foo(int) ==> Fi_c)
//! 'M' pointer to member (Type::* ==> M[4]Type)
//!
//! 'Q' qualified name  (X::YY ==> Q[2][1]X[2]YY, ::YY ==> Q[2][0][2]YY)
//!
//! [n] stands for the byte 0x80 + n; a bare [0] marks the global scope.
//!
//! Operator function names are stored by their spelling ("+", "new[]"),
//! destructors as '~' plus the class name, and conversion operators as
//! '@' plus the encoded target type.
//! ```

mod unmangle;

use std::fmt;

/// Hard ceiling on the byte length of a single encoding.
pub const MAX_ENCODING_LEN: usize = 256;

/// A length prefix is a single byte, so names and counted fields
/// cannot exceed this.
pub const MAX_NAME_LEN: usize = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    /// The encoding grew past [`MAX_ENCODING_LEN`], or a counted field
    /// past [`MAX_NAME_LEN`].
    Overflow,
    /// The byte string does not follow the encoding grammar.
    Malformed,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => f.write_str("encoding too long"),
            Self::Malformed => f.write_str("malformed encoding"),
        }
    }
}

impl std::error::Error for EncodingError {}

fn fmt_bytes(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &b in bytes {
        if b >= 0x80 {
            write!(f, "[{}]", b - 0x80)?;
        } else {
            write!(f, "{}", b as char)?;
        }
    }
    Ok(())
}

/// An encoding under construction.
///
/// Overflow is sticky: once an operation would grow the buffer past
/// its limits all further operations are ignored and [`EncodingBuf::get`]
/// reports the failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingBuf {
    buf: Vec<u8>,
    overflowed: bool,
}

impl EncodingBuf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn is_qualified(&self) -> bool {
        self.buf.first() == Some(&b'Q')
    }

    pub fn is_simple_name(&self) -> bool {
        self.buf.first().is_some_and(|&b| b >= 0x80)
    }

    pub fn is_template_id(&self) -> bool {
        self.buf.first() == Some(&b'T')
    }

    /// Freezes the buffer. Fails if any operation overflowed.
    pub fn get(&self) -> Result<Encoding, EncodingError> {
        if self.overflowed {
            Err(EncodingError::Overflow)
        } else {
            Ok(Encoding { bytes: self.buf.clone().into_boxed_slice() })
        }
    }

    fn append(&mut self, c: u8) {
        if self.overflowed || self.buf.len() == MAX_ENCODING_LEN {
            self.overflowed = true;
            return;
        }
        self.buf.push(c);
    }

    fn append_bytes(&mut self, bytes: &[u8]) {
        if self.overflowed || self.buf.len() + bytes.len() > MAX_ENCODING_LEN {
            self.overflowed = true;
            return;
        }
        self.buf.extend_from_slice(bytes);
    }

    fn prepend_bytes(&mut self, bytes: &[u8]) {
        if self.overflowed || self.buf.len() + bytes.len() > MAX_ENCODING_LEN {
            self.overflowed = true;
            return;
        }
        self.buf.splice(0..0, bytes.iter().copied());
    }

    fn length_byte(&mut self, n: usize) -> u8 {
        if n > MAX_NAME_LEN {
            self.overflowed = true;
            return 0x80;
        }
        0x80 + n as u8
    }

    fn append_with_length(&mut self, bytes: &[u8]) {
        let prefix = self.length_byte(bytes.len());
        self.append(prefix);
        self.append_bytes(bytes);
    }

    pub fn append_encoding(&mut self, other: &Self) {
        if other.overflowed {
            self.overflowed = true;
        }
        self.append_bytes(&other.buf);
    }

    pub fn append_with_length_of(&mut self, other: &Self) {
        if other.overflowed {
            self.overflowed = true;
        }
        let prefix = self.length_byte(other.buf.len());
        self.append(prefix);
        self.append_bytes(&other.buf);
    }

    pub fn cv_qualify(&mut self, is_const: bool, is_volatile: bool) {
        if is_volatile {
            self.prepend_bytes(b"V");
        }
        if is_const {
            self.prepend_bytes(b"C");
        }
    }

    pub fn simple_const(&mut self) {
        self.append_bytes(b"Ci");
    }

    pub fn global_scope(&mut self) {
        self.append_bytes(&[b'Q', 0x81, 0x80]);
    }

    pub fn simple_name(&mut self, name: &str) {
        self.append_with_length(name.as_bytes());
        self.bump_qualified_count();
    }

    /// Components appended to an already qualified buffer raise the
    /// count byte so trailing `qualified` calls are not needed.
    fn bump_qualified_count(&mut self) {
        if self.overflowed || !self.is_qualified() {
            return;
        }
        let count = self.buf[1] - 0x80;
        if count as usize == MAX_NAME_LEN {
            self.overflowed = true;
        } else {
            self.buf[1] += 1;
        }
    }

    /// Internal name for an anonymous class, enum or namespace. The
    /// caller numbers them.
    pub fn anonymous(&mut self, seq: u32) {
        let name = format!("`{:04}", seq % 10000);
        self.append_with_length(name.as_bytes());
        self.bump_qualified_count();
    }

    pub fn template_id(&mut self, name: &str, args: &Self) {
        if args.overflowed {
            self.overflowed = true;
        }
        self.append(b'T');
        self.simple_name(name);
        let prefix = self.length_byte(args.buf.len());
        self.append(prefix);
        self.append_bytes(&args.buf);
    }

    pub fn qualified(&mut self, n: usize) {
        let count = self.length_byte(n);
        self.prepend_bytes(&[b'Q', count]);
    }

    pub fn destructor(&mut self, class_name: &str) {
        let prefix = self.length_byte(class_name.len() + 1);
        self.append(prefix);
        self.append(b'~');
        self.append_bytes(class_name.as_bytes());
        self.bump_qualified_count();
    }

    /// `op` is `'*'` for a pointer, anything else for a reference.
    pub fn ptr_operator(&mut self, op: char) {
        if op == '*' {
            self.prepend_bytes(b"P");
        } else {
            self.prepend_bytes(b"R");
        }
    }

    pub fn ptr_to_member(&mut self, scope: &Self, n: usize) {
        if scope.overflowed {
            self.overflowed = true;
        }
        self.prepend_bytes(&scope.buf);
        // A scope that started at `::` already carries its Q header.
        if n >= 2 && !scope.is_qualified() {
            let count = self.length_byte(n);
            self.prepend_bytes(&[b'Q', count]);
        }
        self.prepend_bytes(b"M");
    }

    pub fn cast_operator(&mut self, ty: &Self) {
        if ty.overflowed {
            self.overflowed = true;
        }
        let prefix = self.length_byte(ty.buf.len() + 1);
        self.append(prefix);
        self.append(b'@');
        self.append_bytes(&ty.buf);
        self.bump_qualified_count();
    }

    pub fn array_unsized(&mut self) {
        self.prepend_bytes(b"A_");
    }

    pub fn array(&mut self, size: u64) {
        let text = format!("A{size}_");
        self.prepend_bytes(text.as_bytes());
    }

    /// Wraps the encoded parameter list and return marker around the
    /// type built so far.
    pub fn function(&mut self, args: &Self) {
        if args.overflowed {
            self.overflowed = true;
        }
        self.prepend_bytes(&args.buf);
    }

    pub fn recursion(&mut self, inner: &Self) {
        if inner.overflowed {
            self.overflowed = true;
        }
        self.prepend_bytes(&inner.buf);
    }

    pub fn start_func_args(&mut self) {
        self.append(b'F');
    }

    pub fn end_func_args(&mut self) {
        self.append(b'_');
    }

    pub fn void_type(&mut self) {
        self.append(b'v');
    }

    pub fn ellipsis(&mut self) {
        self.append(b'e');
    }

    pub fn no_return_type(&mut self) {
        self.append(b'?');
    }

    pub fn value_template_param(&mut self) {
        self.append(b'*');
    }

    pub fn builtin(&mut self, code: u8) {
        debug_assert!(matches!(
            code,
            b'b' | b'c' | b'w' | b'i' | b's' | b'l' | b'j' | b'f' | b'd' | b'r' | b'v'
        ));
        self.append(code);
    }

    pub fn sign_prefix(&mut self, code: u8) {
        debug_assert!(matches!(code, b'S' | b'U'));
        self.append(code);
    }
}

impl fmt::Display for EncodingBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bytes(&self.buf, f)
    }
}

/// A frozen, validated-length encoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Encoding {
    bytes: Box<[u8]>,
}

impl Encoding {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { bytes: bytes.into() }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    fn front(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    pub fn is_simple_name(&self) -> bool {
        self.front().is_some_and(|b| b >= 0x80)
    }

    pub fn is_global_scope(&self) -> bool {
        self.front() == Some(0x80) && self.len() == 1
    }

    pub fn is_qualified(&self) -> bool {
        self.front() == Some(b'Q')
    }

    pub fn is_template_id(&self) -> bool {
        self.front() == Some(b'T')
    }

    /// The scope part of a qualified name, `None` otherwise.
    pub fn scope_of(&self) -> Option<Self> {
        if !self.is_qualified() {
            return None;
        }
        let end = self.end_of_scope().ok()?;
        Some(Self::from_bytes(&self.bytes[2..end]))
    }

    /// The name inside the outermost scope of a qualified name, or the
    /// unmodified name.
    pub fn symbol_of(&self) -> Result<Self, EncodingError> {
        if !self.is_qualified() {
            return Ok(self.clone());
        }
        let count = self.byte(1)?.wrapping_sub(0x80) as usize;
        let rest = &self.bytes[self.end_of_scope()?..];
        if count > 2 {
            let mut buf = EncodingBuf::new();
            buf.append_bytes(rest);
            buf.qualified(count - 1);
            buf.get()
        } else {
            Ok(Self::from_bytes(rest))
        }
    }

    /// The length-prefixed name of a template-id.
    pub fn template_name_of(&self) -> Option<Self> {
        if !self.is_template_id() {
            return None;
        }
        let len = (*self.bytes.get(1)? as usize).checked_sub(0x80)?;
        let name = self.bytes.get(1..2 + len)?;
        Some(Self::from_bytes(name))
    }

    /// The encoded argument bytes of a template-id.
    pub fn template_arguments_of(&self) -> Result<Self, EncodingError> {
        if !self.is_template_id() {
            return Err(EncodingError::Malformed);
        }
        let name_len = self.length_at(1)?;
        let args_at = 2 + name_len;
        let args_len = self.length_at(args_at)?;
        let args = self
            .bytes
            .get(args_at + 1..args_at + 1 + args_len)
            .ok_or(EncodingError::Malformed)?;
        Ok(Self::from_bytes(args))
    }

    /// The return type of an encoded function type `F<args>_<ret>`,
    /// skipping any leading modifiers.
    pub fn function_return_type(&self) -> Result<Self, EncodingError> {
        let mut i = 0;
        while matches!(self.byte(i)?, b'P' | b'R' | b'S' | b'U' | b'C' | b'V') {
            i += 1;
        }
        if self.byte(i)? != b'F' {
            return Err(EncodingError::Malformed);
        }
        i += 1;
        while self.byte(i)? != b'_' {
            i = advance(&self.bytes, i)?;
        }
        Ok(Self::from_bytes(&self.bytes[i + 1..]))
    }

    /// Iterates over the components of a (possibly qualified) name.
    pub fn components(&self) -> Components<'_> {
        let cursor = if self.is_qualified() { 2 } else { 0 };
        Components { bytes: &self.bytes, cursor }
    }

    /// A human-readable rendition of an encoded type.
    pub fn unmangled(&self) -> Result<String, EncodingError> {
        if self.is_empty() {
            return Ok(String::new());
        }
        unmangle::unmangle(&self.bytes)
    }

    /// Turns an encoded name back into nested identifier lists,
    /// recognizing operator spellings, destructors and conversion
    /// operators.
    pub fn name_tree(&self) -> Result<Option<NameTree>, EncodingError> {
        name_tree(self)
    }

    fn byte(&self, i: usize) -> Result<u8, EncodingError> {
        self.bytes.get(i).copied().ok_or(EncodingError::Malformed)
    }

    fn length_at(&self, i: usize) -> Result<usize, EncodingError> {
        let b = self.byte(i)?;
        if b < 0x80 {
            return Err(EncodingError::Malformed);
        }
        Ok((b - 0x80) as usize)
    }

    fn end_of_scope(&self) -> Result<usize, EncodingError> {
        debug_assert!(self.is_qualified());
        let i = 2;
        let b = self.byte(i)?;
        if b >= 0x80 {
            return Ok(i + (b - 0x80) as usize + 1);
        }
        if b == b'T' {
            let after_name = i + 1 + self.length_at(i + 1)? + 1;
            return Ok(after_name + self.length_at(after_name)? + 1);
        }
        Err(EncodingError::Malformed)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_bytes(&self.bytes, f)
    }
}

/// Skips one encoded type starting at `i`, returning the index just
/// past it.
pub(crate) fn advance(bytes: &[u8], start: usize) -> Result<usize, EncodingError> {
    let mut i = start;
    loop {
        let c = *bytes.get(i).ok_or(EncodingError::Malformed)?;
        i += 1;
        match c {
            b'P' | b'Q' | b'R' | b'S' | b'U' | b'C' | b'V' => {}
            b'b' | b'c' | b'w' | b'i' | b's' | b'l' | b'j' | b'f' | b'd' | b'r' | b'v' | b'e'
            | b'?' | b'*' => return Ok(i),
            b'A' => {
                while *bytes.get(i).ok_or(EncodingError::Malformed)? != b'_' {
                    i += 1;
                }
                return Ok(i + 1);
            }
            b'T' => {
                i += length_of(bytes, i)? + 1;
                i += length_of(bytes, i)? + 1;
                return Ok(i);
            }
            b'F' => {
                // parameter list, then keep going for the return type
                while *bytes.get(i).ok_or(EncodingError::Malformed)? != b'_' {
                    i = advance(bytes, i)?;
                }
                i += 1;
            }
            c if c >= 0x80 => return Ok(i + (c - 0x80) as usize),
            _ => return Err(EncodingError::Malformed),
        }
    }
}

fn length_of(bytes: &[u8], i: usize) -> Result<usize, EncodingError> {
    let b = *bytes.get(i).ok_or(EncodingError::Malformed)?;
    if b < 0x80 {
        return Err(EncodingError::Malformed);
    }
    Ok((b - 0x80) as usize)
}

pub struct Components<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl Iterator for Components<'_> {
    type Item = Encoding;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.bytes.len() {
            return None;
        }
        let end = end_name(self.bytes, self.cursor)?;
        let component = Encoding::from_bytes(&self.bytes[self.cursor..end]);
        self.cursor = end;
        Some(component)
    }
}

fn end_name(bytes: &[u8], i: usize) -> Option<usize> {
    let b = *bytes.get(i)?;
    if b >= 0x80 {
        return Some(i + (b - 0x80) as usize + 1);
    }
    if b == b'T' {
        let name_len = bytes.get(i + 1)?.checked_sub(0x80)? as usize;
        let args_at = i + 2 + name_len;
        let args_len = bytes.get(args_at)?.checked_sub(0x80)? as usize;
        return Some(args_at + 1 + args_len);
    }
    None
}

/// A decoded name: plain identifiers stay leaves, operator names and
/// qualified names become nested lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTree {
    Leaf(String),
    List(Vec<NameTree>),
}

impl NameTree {
    fn leaf(text: impl Into<String>) -> Self {
        Self::Leaf(text.into())
    }

    fn operator(spelling: impl Into<String>) -> Self {
        Self::List(vec![Self::leaf("operator"), Self::leaf(spelling)])
    }
}

impl fmt::Display for NameTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(text) => f.write_str(text),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn name_tree(encoding: &Encoding) -> Result<Option<NameTree>, EncodingError> {
    if encoding.is_empty() {
        return Ok(None);
    }
    if encoding.is_qualified() {
        let mut items = Vec::new();
        for component in encoding.components() {
            if !items.is_empty() {
                items.push(NameTree::leaf("::"));
            }
            if let Some(item) = name_tree(&component)? {
                items.push(item);
            }
        }
        return Ok(Some(NameTree::List(items)));
    }
    if encoding.is_template_id() {
        return Ok(Some(NameTree::leaf(unmangle::unmangle(encoding.bytes())?)));
    }
    if encoding.is_simple_name() {
        let len = encoding.length_at(0)?;
        let raw = encoding.bytes().get(1..1 + len).ok_or(EncodingError::Malformed)?;
        let text = String::from_utf8(raw.to_vec()).map_err(|_| EncodingError::Malformed)?;
        return Ok(Some(spelled_name(&text, raw)?));
    }
    Err(EncodingError::Malformed)
}

fn spelled_name(text: &str, raw: &[u8]) -> Result<NameTree, EncodingError> {
    match text {
        "" => return Ok(NameTree::leaf("")),
        "new" | "new[]" | "delete" | "delete[]" => return Ok(NameTree::operator(text)),
        _ => {}
    }
    if let Some(class_name) = text.strip_prefix('~') {
        return Ok(NameTree::List(vec![NameTree::leaf("~"), NameTree::leaf(class_name)]));
    }
    if raw.first() == Some(&b'@') {
        let target = unmangle::unmangle(&raw[1..])?;
        return Ok(NameTree::List(vec![NameTree::leaf("operator"), NameTree::leaf(target)]));
    }
    let first = raw[0];
    if first.is_ascii_alphabetic() || first == b'_' || first == b'`' {
        Ok(NameTree::leaf(text))
    } else {
        Ok(NameTree::operator(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(buf: &EncodingBuf) -> String {
        buf.to_string()
    }

    #[test]
    fn builtin_types_and_qualifiers() {
        let mut buf = EncodingBuf::new();
        buf.builtin(b'c');
        buf.cv_qualify(true, false);
        buf.ptr_operator('*');
        assert_eq!(buf.as_bytes(), b"PCc");
        assert_eq!(buf.get().unwrap().unmangled().unwrap(), "const char*");
    }

    #[test]
    fn template_ids() {
        let mut args = EncodingBuf::new();
        args.builtin(b'i');
        args.builtin(b'c');
        let mut buf = EncodingBuf::new();
        buf.template_id("Foo", &args);
        assert_eq!(display(&buf), "T[3]Foo[2]ic");
        let encoding = buf.get().unwrap();
        assert_eq!(encoding.unmangled().unwrap(), "Foo<int,char>");
        assert_eq!(encoding.template_arguments_of().unwrap().bytes(), b"ic");
        assert_eq!(encoding.template_name_of().unwrap().to_string(), "[3]Foo");
    }

    #[test]
    fn qualified_names() {
        let mut buf = EncodingBuf::new();
        buf.simple_name("X");
        buf.simple_name("YY");
        buf.qualified(2);
        assert_eq!(display(&buf), "Q[2][1]X[2]YY");

        let encoding = buf.get().unwrap();
        assert_eq!(encoding.scope_of().unwrap().to_string(), "[1]X");
        assert_eq!(encoding.symbol_of().unwrap().to_string(), "[2]YY");
        let parts: Vec<_> = encoding.components().map(|c| c.to_string()).collect();
        assert_eq!(parts, vec!["[1]X", "[2]YY"]);
    }

    #[test]
    fn global_scope_qualification() {
        let mut buf = EncodingBuf::new();
        buf.global_scope();
        buf.simple_name("YY");
        assert_eq!(display(&buf), "Q[2][0][2]YY");
        assert!(buf.get().unwrap().is_qualified());
    }

    #[test]
    fn arrays_and_functions() {
        let mut buf = EncodingBuf::new();
        buf.builtin(b'c');
        buf.array(16);
        assert_eq!(buf.as_bytes(), b"A16_c");
        assert_eq!(buf.get().unwrap().unmangled().unwrap(), "char[16]");

        // char foo(int) ==> Fi_c
        let mut args = EncodingBuf::new();
        args.start_func_args();
        args.builtin(b'i');
        args.end_func_args();
        let mut ty = EncodingBuf::new();
        ty.builtin(b'c');
        ty.function(&args);
        assert_eq!(ty.as_bytes(), b"Fi_c");
        let encoding = ty.get().unwrap();
        assert_eq!(encoding.function_return_type().unwrap().bytes(), b"c");
    }

    #[test]
    fn pointer_to_member() {
        let mut scope = EncodingBuf::new();
        scope.simple_name("Type");
        let mut buf = EncodingBuf::new();
        buf.builtin(b'i');
        buf.ptr_to_member(&scope, 1);
        buf.ptr_operator('*');
        assert_eq!(display(&buf), "PM[4]Typei");
    }

    #[test]
    fn destructor_and_cast_operator_names() {
        let mut buf = EncodingBuf::new();
        buf.destructor("Foo");
        assert_eq!(display(&buf), "[4]~Foo");
        assert_eq!(
            buf.get().unwrap().name_tree().unwrap().unwrap().to_string(),
            "[~ Foo]"
        );

        let mut target = EncodingBuf::new();
        target.builtin(b'i');
        target.ptr_operator('*');
        let mut name = EncodingBuf::new();
        name.cast_operator(&target);
        assert_eq!(display(&name), "[3]@Pi");
        assert_eq!(
            name.get().unwrap().name_tree().unwrap().unwrap().to_string(),
            "[operator int*]"
        );
    }

    #[test]
    fn operator_name_trees() {
        let mut buf = EncodingBuf::new();
        buf.simple_name("+");
        assert_eq!(
            buf.get().unwrap().name_tree().unwrap().unwrap().to_string(),
            "[operator +]"
        );

        let mut buf = EncodingBuf::new();
        buf.simple_name("new[]");
        assert_eq!(
            buf.get().unwrap().name_tree().unwrap().unwrap().to_string(),
            "[operator new[]]"
        );

        let mut buf = EncodingBuf::new();
        buf.simple_name("plain");
        assert_eq!(buf.get().unwrap().name_tree().unwrap().unwrap().to_string(), "plain");
    }

    #[test]
    fn anonymous_names() {
        let mut buf = EncodingBuf::new();
        buf.anonymous(7);
        assert_eq!(display(&buf), "[5]`0007");
    }

    #[test]
    fn overflow_is_sticky_and_reported() {
        let mut buf = EncodingBuf::new();
        let long_name = "x".repeat(MAX_NAME_LEN + 1);
        buf.simple_name(&long_name);
        assert_eq!(buf.get(), Err(EncodingError::Overflow));

        let mut buf = EncodingBuf::new();
        for _ in 0..=MAX_ENCODING_LEN {
            buf.builtin(b'i');
        }
        assert_eq!(buf.get(), Err(EncodingError::Overflow));
        // later operations stay ignored
        buf.builtin(b'c');
        assert_eq!(buf.get(), Err(EncodingError::Overflow));
    }

    #[test]
    fn unmangling_functions_and_scopes() {
        assert_eq!(Encoding::from_bytes(b"Fi_v").unmangled().unwrap(), "void(*)(int)");
        assert_eq!(
            Encoding::from_bytes(b"Q\x82\x81X\x82YY").unmangled().unwrap(),
            "X::YY"
        );
        assert_eq!(Encoding::from_bytes(b"Ul").unmangled().unwrap(), "unsigned long");
        assert_eq!(Encoding::from_bytes(b"r").unmangled().unwrap(), "long double");
        assert_eq!(Encoding::from_bytes(b"A_c").unmangled().unwrap(), "char[]");
    }

    #[test]
    fn malformed_bytes_are_rejected() {
        assert_eq!(Encoding::from_bytes(b"T\x82ab").unmangled(), Err(EncodingError::Malformed));
        assert_eq!(
            Encoding::from_bytes(b"Q\x82").symbol_of(),
            Err(EncodingError::Malformed)
        );
    }
}
