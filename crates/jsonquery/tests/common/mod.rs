//! A deliberately tiny path language used to drive the navigator in tests.
//!
//! Supported: `/name`, `//name`, `*`, and one predicate per step of the form
//! `[child <op> literal]` where `<op>` is one of `=`, `!=`, `<`, `<=`, `>`, `>=` and the literal
//! is a number or a quoted string.
#![allow(dead_code)]
use std::{cmp::Ordering, fmt};

use jsonquery::{Cursor, Navigator, NodeType, PathEngine};

#[derive(Debug, PartialEq, Eq)]
pub struct PathError(pub String);

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct MiniPath;

impl PathEngine for MiniPath {
    type Error = PathError;

    fn select<'t>(&self, expr: &str, context: Cursor<'t>) -> Result<Vec<Cursor<'t>>, PathError> {
        let steps = compile(expr)?;
        Ok(evaluate(&steps, context))
    }
}

enum Axis {
    Child,
    Descendant,
}

pub struct Step {
    axis: Axis,
    name: Option<String>,
    predicate: Option<Predicate>,
}

struct Predicate {
    child: String,
    op: Op,
    literal: Literal,
}

#[derive(Clone, Copy)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

enum Literal {
    Number(f64),
    Text(String),
}

const OPERATORS: [(&str, Op); 6] = [
    ("!=", Op::Ne),
    ("<=", Op::Le),
    (">=", Op::Ge),
    ("=", Op::Eq),
    ("<", Op::Lt),
    (">", Op::Gt),
];

pub fn compile(expr: &str) -> Result<Vec<Step>, PathError> {
    let mut rest = expr.trim();
    if rest.is_empty() {
        return Err(PathError("empty expression".into()));
    }
    let mut steps = Vec::new();
    while !rest.is_empty() {
        let axis = if let Some(tail) = rest.strip_prefix("//") {
            rest = tail;
            Axis::Descendant
        } else if let Some(tail) = rest.strip_prefix('/') {
            rest = tail;
            Axis::Child
        } else if steps.is_empty() {
            Axis::Child
        } else {
            return Err(PathError(format!("unexpected input: {rest}")));
        };
        let end = rest.find(|c: char| c == '/' || c == '[').unwrap_or(rest.len());
        let name = rest[..end].trim();
        if name.is_empty() {
            return Err(PathError(format!("missing name test in {expr}")));
        }
        rest = &rest[end..];
        let predicate = if let Some(tail) = rest.strip_prefix('[') {
            let close = tail
                .find(']')
                .ok_or_else(|| PathError(format!("unclosed predicate in {expr}")))?;
            let predicate = compile_predicate(&tail[..close])?;
            rest = &tail[close + 1..];
            Some(predicate)
        } else {
            None
        };
        steps.push(Step {
            axis,
            name: (name != "*").then(|| name.to_string()),
            predicate,
        });
    }
    Ok(steps)
}

fn compile_predicate(text: &str) -> Result<Predicate, PathError> {
    let (position, token, op) = OPERATORS
        .iter()
        .find_map(|(token, op)| text.find(token).map(|position| (position, *token, *op)))
        .ok_or_else(|| PathError(format!("missing operator in [{text}]")))?;
    let child = text[..position].trim().to_string();
    let raw = text[position + token.len()..].trim();
    let literal = if let Some(quoted) = raw
        .strip_prefix('"')
        .and_then(|raw| raw.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|raw| raw.strip_suffix('\'')))
    {
        Literal::Text(quoted.to_string())
    } else {
        Literal::Number(
            raw.parse()
                .map_err(|_| PathError(format!("invalid literal: {raw}")))?,
        )
    };
    Ok(Predicate { child, op, literal })
}

fn children<N: Navigator>(node: &N) -> Vec<N> {
    let mut result = Vec::new();
    let mut cursor = node.clone();
    if cursor.move_to_child() {
        loop {
            result.push(cursor.clone());
            if !cursor.move_to_next() {
                break;
            }
        }
    }
    result
}

fn descendants_or_self<N: Navigator>(node: &N) -> Vec<N> {
    let mut result = Vec::new();
    let mut pending = vec![node.clone()];
    while let Some(current) = pending.pop() {
        let mut below = children(&current);
        below.reverse();
        result.push(current);
        pending.extend(below);
    }
    result
}

impl Step {
    fn matches<N: Navigator>(&self, node: &N) -> bool {
        if node.node_type() == NodeType::Root {
            return false;
        }
        if let Some(name) = &self.name {
            if node.local_name() != name.as_str() {
                return false;
            }
        }
        match &self.predicate {
            Some(predicate) => children(node)
                .iter()
                .filter(|child| child.local_name() == predicate.child)
                .any(|child| predicate.holds(&child.value())),
            None => true,
        }
    }
}

impl Predicate {
    fn holds(&self, value: &str) -> bool {
        let ordering = match &self.literal {
            Literal::Number(expected) => value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|actual| actual.partial_cmp(expected)),
            Literal::Text(expected) => Some(value.cmp(expected.as_str())),
        };
        match (self.op, ordering) {
            (Op::Ne, None) => true,
            (_, None) => false,
            (Op::Eq, Some(ordering)) => ordering == Ordering::Equal,
            (Op::Ne, Some(ordering)) => ordering != Ordering::Equal,
            (Op::Lt, Some(ordering)) => ordering == Ordering::Less,
            (Op::Le, Some(ordering)) => ordering != Ordering::Greater,
            (Op::Gt, Some(ordering)) => ordering == Ordering::Greater,
            (Op::Ge, Some(ordering)) => ordering != Ordering::Less,
        }
    }
}

/// Evaluate compiled steps against any navigator, returning matches in document order.
pub fn evaluate<N: Navigator>(steps: &[Step], context: N) -> Vec<N> {
    let mut current = vec![context];
    for step in steps {
        let mut next: Vec<N> = Vec::new();
        for node in &current {
            let candidates = match step.axis {
                Axis::Child => children(node),
                Axis::Descendant => descendants_or_self(node)
                    .iter()
                    .flat_map(children::<N>)
                    .collect(),
            };
            for candidate in candidates {
                if step.matches(&candidate)
                    && !next.iter().any(|seen| seen.is_same_position(&candidate))
                {
                    next.push(candidate);
                }
            }
        }
        current = next;
    }
    current
}
