//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for formula expressions.
//! CONTEXT: After the Lexer tokenizes a formula string, the Parser converts
//! those tokens into this tree structure. The engine's evaluator traverses
//! the tree to compute the final result, and the engine's dependency
//! extractor walks it to collect cell references.
//!
//! SUPPORTED EXPRESSIONS:
//! - Number literals: 42, 3.14, .5
//! - Cell references: A1, AB12
//! - Binary operations: +, -, *, /, ^
//! - Unary operations: + and - (sign)
//! - Parentheses for grouping
//!
//! The `Display` impl re-prints a tree in canonical form: parentheses appear
//! only where removing them would change the parse, and number literals are
//! normalised through f64 formatting. Re-parsing a canonical print yields the
//! same tree.

/// Represents a parsed formula expression.
/// This is the core data structure that the evaluator will traverse.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// A number literal. The parser never produces negative literals;
    /// a leading sign becomes a `UnaryOp`.
    Literal(f64),

    /// A cell reference, stored as its raw uppercase text (e.g. "A1", "AB12").
    /// Decoding to a grid position happens in the engine; references that do
    /// not decode to a valid position still parse and surface a reference
    /// error at evaluation time.
    CellRef(String),

    /// A unary operation: op operand (e.g. -A1, +5).
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// A binary operation: left op right (e.g. 5 + 3, A1 * 2).
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
}

/// Binary operators for expressions.
/// Listed in order of precedence groups (additive is lowest).
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Power,    // ^ (highest precedence, right-associative)
}

/// Unary operators.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,   // +
    Negate, // -
}

impl BinaryOperator {
    /// Binding power of the operator. Matches the grammar chain:
    /// additive (1) < multiplicative (2) < unary (3) < power (4).
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
            BinaryOperator::Power => 4,
        }
    }
}

impl Expression {
    /// Binding power of the expression's top node. Atoms bind tightest.
    fn precedence(&self) -> u8 {
        match self {
            Expression::Literal(_) | Expression::CellRef(_) => 5,
            Expression::UnaryOp { .. } => 3,
            Expression::BinaryOp { op, .. } => op.precedence(),
        }
    }

    fn write_canonical(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(n) => write!(f, "{}", n),

            Expression::CellRef(name) => write!(f, "{}", name),

            Expression::UnaryOp { op, operand } => {
                write!(f, "{}", op)?;
                // The grammar's unary operand is another unary or a power
                // chain; anything weaker-binding needs parentheses.
                operand.write_parenthesized(f, operand.precedence() < 3)
            }

            Expression::BinaryOp { left, op, right } => {
                let prec = op.precedence();
                let (left_parens, right_parens) = match op {
                    // '^' is right-associative and its grammar slot for the
                    // left operand is an atom, so any compound left child
                    // keeps its parentheses (including another '^').
                    BinaryOperator::Power => {
                        (left.precedence() <= prec, right.precedence() < 3)
                    }
                    // Left-associative operators: the left child may share
                    // the precedence level, the right child may not (or the
                    // reprint would re-associate the tree).
                    _ => (left.precedence() < prec, right.precedence() <= prec),
                };

                left.write_parenthesized(f, left_parens)?;
                write!(f, "{}", op)?;
                right.write_parenthesized(f, right_parens)
            }
        }
    }

    fn write_parenthesized(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        parens: bool,
    ) -> std::fmt::Result {
        if parens {
            write!(f, "(")?;
            self.write_canonical(f)?;
            write!(f, ")")
        } else {
            self.write_canonical(f)
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_canonical(f)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
            BinaryOperator::Power => write!(f, "^"),
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}
