//! Shared cons-style parse trees.
//!
//! Nodes live in an arena. A [`Leaf`] spans a token in the source
//! text, a [`Composite`] is a cons cell; proper lists chain `LIST`
//! cells through their tails and end in `None`.

mod arena;

pub use arena::{Arena, Key};
use cxxfront_encoding::Encoding;
use text_size::TextRange;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    // leaves
    IDENTIFIER,
    KEYWORD,
    LITERAL,
    ATOM,
    COMMENT,

    // plain cons cell
    LIST,

    BRACE,
    BLOCK,
    CLASS_BODY,
    TYPEDEF,
    TEMPLATE_DECL,
    TEMPLATE_INSTANTIATION,
    EXTERN_TEMPLATE,
    LINKAGE_SPEC,
    NAMESPACE_SPEC,
    NAMESPACE_ALIAS,
    USING,
    DECLARATION,
    FUNCTION_DEFINITION,
    PARAMETER_DECLARATION,
    DECLARATOR,
    NAME,
    FSTYLE_CAST_EXPR,
    CLASS_SPEC,
    ENUM_SPEC,
    ACCESS_SPEC,
    ACCESS_DECL,

    IF_STATEMENT,
    SWITCH_STATEMENT,
    WHILE_STATEMENT,
    DO_STATEMENT,
    FOR_STATEMENT,
    TRY_STATEMENT,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,
    RETURN_STATEMENT,
    GOTO_STATEMENT,
    CASE_STATEMENT,
    DEFAULT_STATEMENT,
    LABEL_STATEMENT,
    EXPR_STATEMENT,

    COMMA_EXPR,
    ASSIGN_EXPR,
    COND_EXPR,
    INFIX_EXPR,
    PM_EXPR,
    CAST_EXPR,
    UNARY_EXPR,
    THROW_EXPR,
    SIZEOF_EXPR,
    TYPEID_EXPR,
    TYPEOF_EXPR,
    NEW_EXPR,
    DELETE_EXPR,
    ARRAY_EXPR,
    FUNCALL_EXPR,
    POSTFIX_EXPR,
    DOT_MEMBER_EXPR,
    ARROW_MEMBER_EXPR,
    PAREN_EXPR,
}

pub type NodeId = Key<Node>;

#[derive(Debug)]
pub struct Leaf {
    pub kind: NodeKind,
    pub range: TextRange,
    /// Comments attached to this token, as a list of `COMMENT` leaves.
    pub comments: Option<NodeId>,
}

#[derive(Debug)]
pub struct Composite {
    pub kind: NodeKind,
    pub head: Option<NodeId>,
    pub tail: Option<NodeId>,
    pub encoded_type: Option<Encoding>,
    pub encoded_name: Option<Encoding>,
    /// Comments attached to the whole construct, as a list of
    /// `COMMENT` leaves.
    pub comments: Option<NodeId>,
}

#[derive(Debug)]
pub enum Node {
    Leaf(Leaf),
    Composite(Composite),
}

/// A parse tree store. All ids handed out by one `Ptree` are only
/// meaningful for that `Ptree`.
#[derive(Debug, Default)]
pub struct Ptree {
    nodes: Arena<Node>,
}

impl Ptree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn leaf(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        self.nodes.alloc(Node::Leaf(Leaf { kind, range, comments: None }))
    }

    pub fn composite(
        &mut self,
        kind: NodeKind,
        head: Option<NodeId>,
        tail: Option<NodeId>,
    ) -> NodeId {
        self.nodes.alloc(Node::Composite(Composite {
            kind,
            head,
            tail,
            encoded_type: None,
            encoded_name: None,
            comments: None,
        }))
    }

    pub fn cons(&mut self, head: Option<NodeId>, tail: Option<NodeId>) -> NodeId {
        self.composite(NodeKind::LIST, head, tail)
    }

    /// A node of the given kind with the same elements as `list`. A
    /// leaf becomes the sole element, `None` an empty node.
    pub fn retag(&mut self, kind: NodeKind, list: Option<NodeId>) -> NodeId {
        match list {
            None => self.composite(kind, None, None),
            Some(id) => match &self.nodes[id] {
                Node::Composite(cell) => {
                    let (head, tail) = (cell.head, cell.tail);
                    self.composite(kind, head, tail)
                }
                Node::Leaf(_) => self.composite(kind, Some(id), None),
            },
        }
    }

    /// Builds a proper list out of the given elements.
    pub fn list(&mut self, items: &[Option<NodeId>]) -> Option<NodeId> {
        let mut result = None;
        for &item in items.iter().rev() {
            result = Some(self.cons(item, result));
        }
        result
    }

    /// Appends one element, returning the (possibly new) list head.
    pub fn snoc(&mut self, list: Option<NodeId>, item: Option<NodeId>) -> Option<NodeId> {
        let cell = Some(self.cons(item, None));
        self.nconc(list, cell)
    }

    /// Destructively concatenates two lists.
    pub fn nconc(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        let Some(head) = a else { return b };
        let last = self.last_cell(head);
        match &mut self.nodes[last] {
            Node::Composite(cell) => cell.tail = b,
            Node::Leaf(_) => {}
        }
        Some(head)
    }

    fn last_cell(&self, mut id: NodeId) -> NodeId {
        while let Node::Composite(cell) = &self.nodes[id] {
            match cell.tail {
                Some(next) => id = next,
                None => break,
            }
        }
        id
    }

    /// The last element of a proper list.
    pub fn last(&self, list: Option<NodeId>) -> Option<NodeId> {
        let id = list?;
        match &self.nodes[self.last_cell(id)] {
            Node::Composite(cell) => cell.head,
            Node::Leaf(_) => Some(id),
        }
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        match &self.nodes[id] {
            Node::Leaf(leaf) => leaf.kind,
            Node::Composite(cell) => cell.kind,
        }
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.nodes[id], Node::Leaf(_))
    }

    pub fn head(&self, id: NodeId) -> Option<NodeId> {
        match &self.nodes[id] {
            Node::Composite(cell) => cell.head,
            Node::Leaf(_) => None,
        }
    }

    pub fn tail(&self, id: NodeId) -> Option<NodeId> {
        match &self.nodes[id] {
            Node::Composite(cell) => cell.tail,
            Node::Leaf(_) => None,
        }
    }

    /// The `n`th element of a list, `None` when the list is too short
    /// or not a list at all.
    pub fn nth(&self, list: Option<NodeId>, n: usize) -> Option<NodeId> {
        let mut cur = list?;
        for _ in 0..n {
            cur = self.tail(cur)?;
        }
        self.head(cur)
    }

    pub fn first(&self, list: Option<NodeId>) -> Option<NodeId> {
        self.nth(list, 0)
    }

    pub fn second(&self, list: Option<NodeId>) -> Option<NodeId> {
        self.nth(list, 1)
    }

    pub fn third(&self, list: Option<NodeId>) -> Option<NodeId> {
        self.nth(list, 2)
    }

    /// The list without its first `n` elements.
    pub fn rest(&self, list: Option<NodeId>, n: usize) -> Option<NodeId> {
        let mut cur = list;
        for _ in 0..n {
            cur = self.tail(cur?);
        }
        cur
    }

    /// Number of elements, `None` for a leaf.
    pub fn length(&self, list: Option<NodeId>) -> Option<usize> {
        let mut len = 0;
        let mut cur = list;
        while let Some(id) = cur {
            if self.is_leaf(id) {
                return None;
            }
            len += 1;
            cur = self.tail(id);
        }
        Some(len)
    }

    pub fn set_encoded_type(&mut self, id: NodeId, encoding: Encoding) {
        if let Node::Composite(cell) = &mut self.nodes[id] {
            cell.encoded_type = Some(encoding);
        }
    }

    pub fn set_encoded_name(&mut self, id: NodeId, encoding: Encoding) {
        if let Node::Composite(cell) = &mut self.nodes[id] {
            cell.encoded_name = Some(encoding);
        }
    }

    pub fn encoded_type(&self, id: NodeId) -> Option<&Encoding> {
        match &self.nodes[id] {
            Node::Composite(cell) => cell.encoded_type.as_ref(),
            Node::Leaf(_) => None,
        }
    }

    pub fn encoded_name(&self, id: NodeId) -> Option<&Encoding> {
        match &self.nodes[id] {
            Node::Composite(cell) => cell.encoded_name.as_ref(),
            Node::Leaf(_) => None,
        }
    }

    pub fn set_comments(&mut self, id: NodeId, comments: Option<NodeId>) {
        match &mut self.nodes[id] {
            Node::Leaf(leaf) => leaf.comments = comments,
            Node::Composite(cell) => cell.comments = comments,
        }
    }

    pub fn comments(&self, id: NodeId) -> Option<NodeId> {
        match &self.nodes[id] {
            Node::Leaf(leaf) => leaf.comments,
            Node::Composite(cell) => cell.comments,
        }
    }

    /// Source span covered by the node, hull of all its leaves.
    pub fn text_range(&self, id: NodeId) -> Option<TextRange> {
        match &self.nodes[id] {
            Node::Leaf(leaf) => Some(leaf.range),
            Node::Composite(cell) => {
                let mut range: Option<TextRange> = None;
                for child in [cell.head, cell.tail].into_iter().flatten() {
                    if let Some(child_range) = self.text_range(child) {
                        range = Some(match range {
                            Some(r) => r.cover(child_range),
                            None => child_range,
                        });
                    }
                }
                range
            }
        }
    }

    /// The exact source text under the node, interior whitespace and
    /// comments included.
    pub fn source_text<'s>(&self, id: NodeId, text: &'s str) -> &'s str {
        match self.text_range(id) {
            Some(range) => &text[std::ops::Range::<usize>::from(range)],
            None => "",
        }
    }

    pub fn leaf_text<'s>(&self, id: NodeId, text: &'s str) -> Option<&'s str> {
        match &self.nodes[id] {
            Node::Leaf(leaf) => Some(&text[std::ops::Range::<usize>::from(leaf.range)]),
            Node::Composite(_) => None,
        }
    }

    /// Whether the node is a leaf spelling exactly `expected`.
    pub fn leaf_is(&self, id: NodeId, text: &str, expected: &str) -> bool {
        self.leaf_text(id, text) == Some(expected)
    }

    /// Structural equality: same shapes and the same leaf spellings.
    pub fn equal(&self, a: Option<NodeId>, b: Option<NodeId>, text: &str) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => match (&self.nodes[a], &self.nodes[b]) {
                (Node::Leaf(x), Node::Leaf(y)) => {
                    self.leaf_text(a, text) == self.leaf_text(b, text) && x.kind == y.kind
                }
                (Node::Composite(x), Node::Composite(y)) => {
                    self.equal(x.head, y.head, text) && self.equal(x.tail, y.tail, text)
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Bracketed dump of a tree, leaves spelled from the source text.
    pub fn display(&self, id: Option<NodeId>, text: &str) -> String {
        let mut out = String::new();
        self.write(id, text, &mut out);
        out
    }

    fn write(&self, id: Option<NodeId>, text: &str, out: &mut String) {
        let Some(id) = id else {
            out.push_str("nil");
            return;
        };
        match &self.nodes[id] {
            Node::Leaf(_) => out.push_str(self.leaf_text(id, text).unwrap_or("")),
            Node::Composite(_) => {
                out.push('[');
                let mut cur = Some(id);
                let mut first = true;
                while let Some(cell) = cur {
                    if self.is_leaf(cell) {
                        // dotted tail
                        out.push_str(" . ");
                        self.write(Some(cell), text, out);
                        break;
                    }
                    if !first {
                        out.push(' ');
                    }
                    first = false;
                    self.write(self.head(cell), text, out);
                    cur = self.tail(cell);
                }
                out.push(']');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use text_size::TextSize;

    use super::*;

    fn leaf_at(ptree: &mut Ptree, start: u32, len: u32) -> NodeId {
        ptree.leaf(NodeKind::ATOM, TextRange::at(TextSize::new(start), TextSize::new(len)))
    }

    #[test]
    fn list_construction_and_access() {
        let text = "a b c";
        let mut ptree = Ptree::new();
        let a = leaf_at(&mut ptree, 0, 1);
        let b = leaf_at(&mut ptree, 2, 1);
        let c = leaf_at(&mut ptree, 4, 1);

        let list = ptree.list(&[Some(a), Some(b), Some(c)]);
        assert_eq!(ptree.length(list), Some(3));
        assert_eq!(ptree.first(list), Some(a));
        assert_eq!(ptree.second(list), Some(b));
        assert_eq!(ptree.third(list), Some(c));
        assert_eq!(ptree.nth(list, 3), None);
        assert_eq!(ptree.last(list), Some(c));
        assert_eq!(ptree.display(list, text), "[a b c]");
    }

    #[test]
    fn snoc_and_nconc() {
        let text = "a b c d";
        let mut ptree = Ptree::new();
        let a = leaf_at(&mut ptree, 0, 1);
        let b = leaf_at(&mut ptree, 2, 1);
        let c = leaf_at(&mut ptree, 4, 1);
        let d = leaf_at(&mut ptree, 6, 1);

        let mut list = ptree.snoc(None, Some(a));
        list = ptree.snoc(list, Some(b));
        assert_eq!(ptree.display(list, text), "[a b]");

        let other = ptree.list(&[Some(c), Some(d)]);
        let joined = ptree.nconc(list, other);
        assert_eq!(ptree.display(joined, text), "[a b c d]");
        assert_eq!(ptree.length(joined), Some(4));

        assert_eq!(ptree.nconc(None, other), other);
    }

    #[test]
    fn nil_elements_are_preserved() {
        let text = "x";
        let mut ptree = Ptree::new();
        let x = leaf_at(&mut ptree, 0, 1);
        let list = ptree.list(&[Some(x), None, Some(x)]);
        assert_eq!(ptree.length(list), Some(3));
        assert_eq!(ptree.second(list), None);
        assert_eq!(ptree.display(list, text), "[x nil x]");
    }

    #[test]
    fn length_of_a_leaf_is_undefined() {
        let mut ptree = Ptree::new();
        let x = leaf_at(&mut ptree, 0, 1);
        assert_eq!(ptree.length(Some(x)), None);
        assert_eq!(ptree.length(None), Some(0));
    }

    #[test]
    fn text_ranges_cover_all_leaves() {
        let text = "int  x ;";
        let mut ptree = Ptree::new();
        let int_kw = ptree.leaf(NodeKind::KEYWORD, TextRange::new(0.into(), 3.into()));
        let x = ptree.leaf(NodeKind::IDENTIFIER, TextRange::new(5.into(), 6.into()));
        let semi = leaf_at(&mut ptree, 7, 1);
        let decl = ptree.list(&[Some(int_kw), Some(x), Some(semi)]);

        let range = ptree.text_range(decl.unwrap()).unwrap();
        assert_eq!(range, TextRange::new(0.into(), 8.into()));
        // interior whitespace comes back verbatim
        assert_eq!(ptree.source_text(decl.unwrap(), text), "int  x ;");
    }

    #[test]
    fn structural_equality_compares_spellings() {
        let text = "x y x";
        let mut ptree = Ptree::new();
        let x1 = ptree.leaf(NodeKind::IDENTIFIER, TextRange::new(0.into(), 1.into()));
        let y = ptree.leaf(NodeKind::IDENTIFIER, TextRange::new(2.into(), 3.into()));
        let x2 = ptree.leaf(NodeKind::IDENTIFIER, TextRange::new(4.into(), 5.into()));

        let first = ptree.list(&[Some(x1), Some(y)]);
        let second = ptree.list(&[Some(x2), Some(y)]);
        let third = ptree.list(&[Some(y), Some(y)]);
        assert!(ptree.equal(first, second, text));
        assert!(!ptree.equal(first, third, text));
        assert!(!ptree.equal(first, None, text));
    }

    #[test]
    fn encodings_attach_to_composites() {
        use cxxfront_encoding::EncodingBuf;

        let mut ptree = Ptree::new();
        let decl = ptree.composite(NodeKind::DECLARATOR, None, None);
        let mut buf = EncodingBuf::new();
        buf.builtin(b'i');
        ptree.set_encoded_type(decl, buf.get().unwrap());
        assert_eq!(ptree.encoded_type(decl).unwrap().bytes(), b"i");
        assert_eq!(ptree.encoded_name(decl), None);
    }
}
