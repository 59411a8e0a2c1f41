//! Syntax tree consumed by the linter
//!
//! Parsers (the bundled markup frontend, or a script parser supplied by the
//! embedding tool) lower their own trees into this shape. Only the node
//! categories that matter for quote linting are distinguished; everything
//! else is an [`NodeKind::Expression`] container.

use std::ops::Range;

/// Half-open byte range `[start, end)` into the full source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this span
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Node category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Document or script root
    Program,
    /// Any node that is not interesting on its own
    Expression,
    /// Quoted string literal; the span includes both delimiters
    StringLiteral,
    /// Regular expression literal such as `/it's/g`
    RegexLiteral,
    /// Template literal; `children` are the embedded expressions in source order
    TemplateLiteral { tagged: bool },
    /// Bare text content of a markup element
    MarkupText,
    /// Markup element (`<p>`, `<Component>`)
    Element { name: String },
    /// Markup attribute; its value is a [`NodeKind::StringLiteral`] child
    Attribute { name: String },
    /// Function call; `callee` is the dotted name when it can be resolved
    Call { callee: Option<String> },
    /// Constructor call (`new Error(...)`)
    New { callee: Option<String> },
    /// Object property; `key` is the identifier or string key when static
    Property { key: Option<String> },
}

impl NodeKind {
    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Expression => "Expression",
            NodeKind::StringLiteral => "Literal",
            NodeKind::RegexLiteral => "RegexLiteral",
            NodeKind::TemplateLiteral { .. } => "TemplateLiteral",
            NodeKind::MarkupText => "Text",
            NodeKind::Element { .. } => "Element",
            NodeKind::Attribute { .. } => "Attribute",
            NodeKind::Call { .. } => "CallExpression",
            NodeKind::New { .. } => "NewExpression",
            NodeKind::Property { .. } => "Property",
        }
    }
}

/// A syntax node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Absolute position in the source, `None` for synthetic nodes
    pub span: Option<Span>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a positioned node without children
    pub fn new(kind: NodeKind, span: impl Into<Span>) -> Self {
        Self {
            kind,
            span: Some(span.into()),
            children: Vec::new(),
        }
    }

    /// Create a node that carries no position information
    pub fn synthetic(kind: NodeKind) -> Self {
        Self {
            kind,
            span: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Source text covered by this node
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.span.and_then(|span| source.get(span.range()))
    }

    /// Depth-first pre-order iterator over this node and its descendants
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
