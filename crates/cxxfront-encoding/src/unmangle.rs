//! Renders encoded types back into C++ source spellings.

use crate::EncodingError;

pub(crate) fn unmangle(bytes: &[u8]) -> Result<String, EncodingError> {
    Unmangler { bytes, cursor: 0 }.unmangle()
}

struct Unmangler<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl Unmangler<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    fn bump(&mut self) -> Result<u8, EncodingError> {
        let b = self.peek().ok_or(EncodingError::Malformed)?;
        self.cursor += 1;
        Ok(b)
    }

    fn at_end(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    /// Decodes one type. Stops in front of a `_` so function
    /// parameter lists can find their end, and yields an empty string
    /// for a bare global-scope marker and for the no-return marker.
    fn unmangle(&mut self) -> Result<String, EncodingError> {
        let mut premod = String::new();
        let mut postmod = String::new();
        let mut name = String::new();
        let mut base = String::new();

        if self.peek() == Some(0x80) {
            return Ok(String::new());
        }
        while !self.at_end() && name.is_empty() && base.is_empty() {
            let c = self.bump()?;
            match c {
                b'P' => postmod.push('*'),
                b'R' => postmod.push('&'),
                b'S' => premod.push_str("signed "),
                b'U' => premod.push_str("unsigned "),
                b'C' => premod.push_str("const "),
                b'V' => premod.push_str("volatile "),
                b'A' => {
                    postmod.push('[');
                    loop {
                        let b = self.bump()?;
                        if b == b'_' {
                            break;
                        }
                        postmod.push(b as char);
                    }
                    postmod.push(']');
                }
                b'*' => base.push('*'),
                b'b' => name.push_str("bool"),
                b'c' => name.push_str("char"),
                b'w' => name.push_str("wchar_t"),
                b'i' => name.push_str("int"),
                b's' => name.push_str("short"),
                b'l' => name.push_str("long"),
                b'j' => name.push_str("long long"),
                b'f' => name.push_str("float"),
                b'd' => name.push_str("double"),
                b'r' => name.push_str("long double"),
                b'v' => name.push_str("void"),
                b'e' => name.push_str("..."),
                b'?' => return Ok(String::new()),
                b'Q' => base = self.unmangle_qname()?,
                b'_' => {
                    self.cursor -= 1;
                    return Ok(String::new());
                }
                b'F' => base = self.unmangle_func(&mut postmod)?,
                b'T' => base = self.unmangle_template()?,
                b'M' => {
                    name = self.unmangle_name()?;
                    name.push_str("::*");
                }
                c if c > 0x80 => {
                    self.cursor -= 1;
                    name = self.unmangle_name()?;
                }
                _ => return Err(EncodingError::Malformed),
            }
        }
        if base.is_empty() && name.is_empty() {
            return Err(EncodingError::Malformed);
        }
        if base.is_empty() {
            base = name;
        }
        Ok(format!("{premod}{base}{postmod}"))
    }

    fn unmangle_name(&mut self) -> Result<String, EncodingError> {
        let len = self.bump()?.checked_sub(0x80).ok_or(EncodingError::Malformed)? as usize;
        let raw =
            self.bytes.get(self.cursor..self.cursor + len).ok_or(EncodingError::Malformed)?;
        self.cursor += len;
        String::from_utf8(raw.to_vec()).map_err(|_| EncodingError::Malformed)
    }

    fn unmangle_qname(&mut self) -> Result<String, EncodingError> {
        let mut qname = String::new();
        let mut scopes = self.bump()?.checked_sub(0x80).ok_or(EncodingError::Malformed)?;
        while scopes > 0 {
            scopes -= 1;
            let name = match self.peek().ok_or(EncodingError::Malformed)? {
                b if b > 0x80 => self.unmangle_name()?,
                0x80 => {
                    self.cursor += 1;
                    String::new()
                }
                b'T' => {
                    self.cursor += 1;
                    let mut name = self.unmangle_name()?;
                    name.push('<');
                    let len =
                        self.bump()?.checked_sub(0x80).ok_or(EncodingError::Malformed)? as usize;
                    let end = self.cursor + len;
                    let mut first = true;
                    while self.cursor < end {
                        let before = self.cursor;
                        let arg = self.unmangle()?;
                        if self.cursor == before {
                            return Err(EncodingError::Malformed);
                        }
                        if !first {
                            name.push(',');
                        }
                        first = false;
                        name.push_str(&arg);
                    }
                    name.push('>');
                    name
                }
                _ => return Err(EncodingError::Malformed),
            };
            if qname.is_empty() {
                qname = name;
            } else {
                qname.push_str("::");
                qname.push_str(&name);
            }
        }
        Ok(qname)
    }

    fn unmangle_func(&mut self, postmod: &mut String) -> Result<String, EncodingError> {
        // A pointer modifier belongs to the function, not its result.
        if postmod.starts_with('*') {
            postmod.remove(0);
        }
        let mut params = Vec::new();
        loop {
            let ty = self.unmangle()?;
            if ty.is_empty() {
                break;
            }
            params.push(ty);
        }
        self.bump()?; // '_'
        let return_type = self.unmangle()?;
        Ok(format!("{return_type}(*)({})", params.join(",")))
    }

    fn unmangle_template(&mut self) -> Result<String, EncodingError> {
        if self.peek() == Some(b'T') {
            self.cursor += 1;
        }
        let mut name = self.unmangle_name()?;
        let len = self.bump()?.checked_sub(0x80).ok_or(EncodingError::Malformed)? as usize;
        let end = self.cursor + len;
        name.push('<');
        let mut first = true;
        while self.cursor < end {
            let before = self.cursor;
            let arg = self.unmangle()?;
            if self.cursor == before {
                return Err(EncodingError::Malformed);
            }
            if !first {
                name.push(',');
            }
            first = false;
            name.push_str(&arg);
        }
        name.push('>');
        Ok(name)
    }
}
