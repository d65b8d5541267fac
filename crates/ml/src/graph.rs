use crate::recorder::Recorder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EOp {
    Add,
    Sub,
    Mul,
    MatMul,
    AddBroadcast,
    Tanh,
    Pow,
    MulScalar,
    ReduceSum,
    ReduceMean,
}

/// One recorded operation: `out = op(a, b)`. Unary ops store `a` twice;
/// scalar operands (exponent, factor) travel as one-element tensors in `b`.
#[derive(Clone, Debug)]
pub struct Node {
    pub op: EOp,
    pub a: usize,
    pub b: usize,
    pub out: usize,
}

/// Inference-only recorder. Nodes are kept for inspection but are never
/// differentiated.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Recorder for Graph {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }
}
