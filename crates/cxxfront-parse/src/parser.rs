use cxxfront_encoding::{Encoding, EncodingBuf};
use cxxfront_errors::{Diagnostic, Reporter};
use cxxfront_ptree::{NodeId, NodeKind, Ptree};
use cxxfront_tokenizer::{Checkpoint, RuleSet, Token, TokenKind, TokenStream};
use text_size::TextRange;

pub(crate) struct Parser<'t, 'r> {
    pub(crate) stream: TokenStream<'t>,
    pub(crate) ptree: Ptree,
    reporter: &'r mut dyn Reporter,
    pub(crate) rules: RuleSet,
    /// Latched once the reporter refuses further errors.
    pub(crate) give_up: bool,
    /// Comments collected at the start of a declaration, waiting for
    /// the node they belong to.
    pub(crate) pending_comments: Option<NodeId>,
    anon_seq: u32,
}

impl<'t, 'r> Parser<'t, 'r> {
    pub(crate) fn new(text: &'t str, rules: RuleSet, reporter: &'r mut dyn Reporter) -> Self {
        Self {
            stream: TokenStream::new(text, rules),
            ptree: Ptree::new(),
            reporter,
            rules,
            give_up: false,
            pending_comments: None,
            anon_seq: 0,
        }
    }

    pub(crate) fn into_ptree(self) -> Ptree {
        self.ptree
    }

    pub(crate) fn peek(&self, n: usize) -> TokenKind {
        self.stream.peek_kind(n)
    }

    pub(crate) fn look(&self, n: usize) -> Token {
        self.stream.peek(n)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek(0) == kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        self.stream.next()
    }

    pub(crate) fn token_text(&self, token: Token) -> &'t str {
        self.stream.token_text(token)
    }

    /// Consumes the current token and allocates a leaf for it.
    pub(crate) fn bump_leaf(&mut self) -> NodeId {
        let token = self.advance();
        self.leaf(token)
    }

    pub(crate) fn leaf(&mut self, token: Token) -> NodeId {
        let kind = match token.kind {
            TokenKind::IDENTIFIER => NodeKind::IDENTIFIER,
            TokenKind::CONSTANT
            | TokenKind::CHAR_CONST
            | TokenKind::WIDE_CHAR_CONST
            | TokenKind::STRING_LITERAL
            | TokenKind::WIDE_STRING_LITERAL => NodeKind::LITERAL,
            kind if kind.is_keyword() => NodeKind::KEYWORD,
            _ => NodeKind::ATOM,
        };
        self.ptree.leaf(kind, token.range)
    }

    /// Consumes the current token if it has the expected kind.
    pub(crate) fn take(&mut self, kind: TokenKind) -> Option<NodeId> {
        if self.at(kind) { Some(self.bump_leaf()) } else { None }
    }

    pub(crate) fn mark(&self) -> Checkpoint {
        self.stream.mark()
    }

    pub(crate) fn reset(&mut self, checkpoint: Checkpoint) {
        self.stream.reset(checkpoint);
    }

    /// Numbers anonymous classes, enums and namespaces.
    pub(crate) fn next_anon(&mut self) -> u32 {
        let seq = self.anon_seq;
        self.anon_seq += 1;
        seq
    }

    /// Reports a syntax error at the current token. Returns false once
    /// the reporter has seen too many errors; callers then give up
    /// instead of recovering.
    pub(crate) fn mark_error(&mut self) -> bool {
        if self.give_up {
            return false;
        }
        let t1 = self.look(0);
        let t2 = self.look(1);
        let end = if t2.kind != TokenKind::EOF {
            t2.range.end()
        } else if t1.kind != TokenKind::EOF {
            t1.range.end()
        } else {
            t1.range.start()
        };
        let range = TextRange::new(t1.range.start(), end.max(t1.range.start()));
        let message = if t1.kind == TokenKind::EOF {
            "parse error at end of input".to_string()
        } else {
            format!("parse error before `{}`", self.stream.text(range))
        };
        let keep_going = self.reporter.error(Diagnostic::error(message, range));
        if !keep_going {
            self.give_up = true;
        }
        keep_going
    }

    /// Error recovery: discard tokens up to (not including) `kind`.
    pub(crate) fn skip_to(&mut self, kind: TokenKind) {
        loop {
            let t = self.peek(0);
            if t == kind || t == TokenKind::EOF {
                break;
            }
            self.advance();
        }
    }

    /// Freezes an encoding buffer, downgrading an overflow to a
    /// warning so the parse itself keeps going.
    pub(crate) fn freeze(&mut self, buf: &EncodingBuf, near: TextRange) -> Option<Encoding> {
        match buf.get() {
            Ok(encoding) => Some(encoding),
            Err(err) => {
                self.reporter.warning(Diagnostic::warning(err.to_string(), near));
                None
            }
        }
    }

    pub(crate) fn set_encoded_type(&mut self, id: NodeId, buf: &EncodingBuf) {
        let near = self.ptree.text_range(id).unwrap_or_else(|| self.look(0).range);
        if let Some(encoding) = self.freeze(buf, near) {
            self.ptree.set_encoded_type(id, encoding);
        }
    }

    pub(crate) fn set_encoded_name(&mut self, id: NodeId, buf: &EncodingBuf) {
        let near = self.ptree.text_range(id).unwrap_or_else(|| self.look(0).range);
        if let Some(encoding) = self.freeze(buf, near) {
            self.ptree.set_encoded_name(id, encoding);
        }
    }

    /// Unclaimed comments before the current token, as a list of
    /// `COMMENT` leaves.
    pub(crate) fn wrap_comments(&mut self) -> Option<NodeId> {
        let comments = self.stream.take_comments().to_vec();
        let mut list = None;
        for comment in comments {
            let leaf = self.ptree.leaf(NodeKind::COMMENT, comment.range);
            list = self.ptree.snoc(list, Some(leaf));
        }
        list
    }

    pub(crate) fn discard_comments(&mut self) {
        self.stream.take_comments();
    }

    /// Prepends C and/or V to `encode` according to the qualifiers
    /// spelled in the given cv lists.
    pub(crate) fn encode_cv(
        &self,
        encode: &mut EncodingBuf,
        cv1: Option<NodeId>,
        cv2: Option<NodeId>,
    ) {
        let mut is_const = false;
        let mut is_volatile = false;
        let text = self.stream.source();
        for list in [cv1, cv2] {
            let mut cur = list;
            while let Some(cell) = cur {
                if self.ptree.is_leaf(cell) {
                    break;
                }
                if let Some(item) = self.ptree.head(cell) {
                    is_const |= self.ptree.leaf_is(item, text, "const");
                    is_volatile |= self.ptree.leaf_is(item, text, "volatile");
                }
                cur = self.ptree.tail(cell);
            }
        }
        encode.cv_qualify(is_const, is_volatile);
    }

    fn leftmost_leaf(&self, node: Option<NodeId>) -> Option<NodeId> {
        let id = node?;
        if self.ptree.is_leaf(id) {
            return Some(id);
        }
        let mut cur = Some(id);
        while let Some(cell) = cur {
            if self.ptree.is_leaf(cell) {
                return Some(cell);
            }
            if let Some(found) = self.leftmost_leaf(self.ptree.head(cell)) {
                return Some(found);
            }
            cur = self.ptree.tail(cell);
        }
        None
    }

    /// Attaches comments to the first leaf under `node`, merging with
    /// anything already there.
    pub(crate) fn set_leaf_comments(&mut self, node: Option<NodeId>, comments: Option<NodeId>) {
        if comments.is_none() {
            return;
        }
        let Some(leaf) = self.leftmost_leaf(node) else { return };
        let existing = self.ptree.comments(leaf);
        let merged = self.ptree.nconc(existing, comments);
        self.ptree.set_comments(leaf, merged);
    }

    /// Attaches trailing comments to every declarator of a
    /// declaration. The declarator list is the declaration's third
    /// element; a function definition carries its sole declarator
    /// there directly.
    pub(crate) fn set_declarator_comments(
        &mut self,
        decl: Option<NodeId>,
        comments: Option<NodeId>,
    ) {
        if comments.is_none() {
            return;
        }
        let Some(declarators) = self.ptree.third(decl) else { return };
        if self.ptree.kind(declarators) == NodeKind::DECLARATOR {
            self.ptree.set_comments(declarators, comments);
            return;
        }
        if self.ptree.is_leaf(declarators) {
            return;
        }
        let mut cur = Some(declarators);
        while let Some(cell) = cur {
            if self.ptree.is_leaf(cell) {
                break;
            }
            if let Some(item) = self.ptree.head(cell) {
                if self.ptree.kind(item) == NodeKind::DECLARATOR {
                    self.ptree.set_comments(item, comments);
                }
            }
            cur = self.ptree.tail(cell);
        }
    }
}
