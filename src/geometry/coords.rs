//! Coordinate trees
//!
//! GeoJSON nests positions to a depth set by the geometry type. The tree is
//! parsed once into [`Coordinates`], so later passes dispatch on the variant
//! instead of inspecting JSON values level by level.

use serde_json::Value;

use crate::coordinate::Position;
use crate::projection::errors::{ProjError, ProjResult};

/// A node of a coordinate tree
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    /// A single position
    Leaf(Position),
    /// An ordered sequence of child nodes
    Nested(Vec<Coordinates>),
}

impl Coordinates {
    /// Parse a coordinate tree from a JSON value
    ///
    /// A container whose first element is an array is a nested node and every
    /// element must then be an array too. Otherwise the container is a leaf and
    /// must hold at least two numbers. An empty array is an empty nested node.
    pub fn from_value(value: &Value) -> ProjResult<Self> {
        let items = value.as_array().ok_or_else(|| ProjError::MalformedGeometry(
            format!("Expected a coordinate array, found {}", json_kind(value))))?;

        match items.first() {
            None => Ok(Coordinates::Nested(Vec::new())),
            Some(Value::Array(_)) => {
                let children = items.iter()
                    .map(|item| match item {
                        Value::Array(_) => Coordinates::from_value(item),
                        other => Err(ProjError::MalformedGeometry(format!(
                            "Mixed nesting: expected an array, found {}", json_kind(other)))),
                    })
                    .collect::<ProjResult<Vec<_>>>()?;
                Ok(Coordinates::Nested(children))
            },
            Some(_) => {
                let components = items.iter()
                    .map(|item| item.as_f64().ok_or_else(|| ProjError::MalformedGeometry(
                        format!("Coordinate component is not a number: {}", item))))
                    .collect::<ProjResult<Vec<f64>>>()?;

                Position::from_components(&components)
                    .map(Coordinates::Leaf)
                    .ok_or_else(|| ProjError::MalformedGeometry(format!(
                        "A position needs at least 2 components, found {}", components.len())))
            },
        }
    }

    /// Convert the tree back into nested JSON arrays
    pub fn to_value(&self) -> Value {
        match self {
            Coordinates::Leaf(position) => Value::Array(
                position.components().into_iter().map(number_value).collect()),
            Coordinates::Nested(children) => Value::Array(
                children.iter().map(Coordinates::to_value).collect()),
        }
    }

    /// Build a new tree with every position replaced by `f(position)`
    ///
    /// Order and element counts are preserved at every level.
    pub fn try_map<F>(&self, f: &mut F) -> ProjResult<Coordinates>
    where
        F: FnMut(&Position) -> ProjResult<Position>,
    {
        match self {
            Coordinates::Leaf(position) => f(position).map(Coordinates::Leaf),
            Coordinates::Nested(children) => children.iter()
                .map(|child| child.try_map(f))
                .collect::<ProjResult<Vec<_>>>()
                .map(Coordinates::Nested),
        }
    }

    /// Visit every position in order
    pub fn positions(&self) -> Vec<&Position> {
        let mut out = Vec::new();
        self.collect_positions(&mut out);
        out
    }

    fn collect_positions<'a>(&'a self, out: &mut Vec<&'a Position>) {
        match self {
            Coordinates::Leaf(position) => out.push(position),
            Coordinates::Nested(children) => {
                for child in children {
                    child.collect_positions(out);
                }
            },
        }
    }

    /// Nesting depth: 0 for a bare position, 1 for a list of positions, ...
    pub fn depth(&self) -> usize {
        match self {
            Coordinates::Leaf(_) => 0,
            Coordinates::Nested(children) => 1 + children.first().map_or(0, Coordinates::depth),
        }
    }

    /// Shape of the tree, comparable across trees holding different numbers
    pub fn shape(&self) -> Shape {
        match self {
            Coordinates::Leaf(_) => Shape::Leaf,
            Coordinates::Nested(children) => Shape::Nested(children.iter().map(Coordinates::shape).collect()),
        }
    }
}

/// Structural outline of a coordinate tree, ignoring the numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Nested(Vec<Shape>),
}

fn number_value(n: f64) -> Value {
    serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_depths() {
        let point = Coordinates::from_value(&json!([1.0, 2.0])).unwrap();
        assert_eq!(point, Coordinates::Leaf(Position::new(1.0, 2.0)));
        assert_eq!(point.depth(), 0);

        let line = Coordinates::from_value(&json!([[1.0, 2.0], [3.0, 4.0]])).unwrap();
        assert_eq!(line.depth(), 1);

        let polygon = Coordinates::from_value(&json!([[[0, 0], [1, 0], [1, 1], [0, 0]]])).unwrap();
        assert_eq!(polygon.depth(), 2);
        assert_eq!(polygon.positions().len(), 4);

        let multi_polygon = Coordinates::from_value(&json!([[[[0, 0], [1, 0], [0, 0]]], [[[5, 5], [6, 5], [5, 5]]]])).unwrap();
        assert_eq!(multi_polygon.depth(), 3);
    }

    #[test]
    fn test_integers_and_extra_components() {
        let leaf = Coordinates::from_value(&json!([10, 20, 999])).unwrap();
        assert_eq!(leaf, Coordinates::Leaf(Position::new_3d(10.0, 20.0, 999.0)));
    }

    #[test]
    fn test_empty_container() {
        assert_eq!(Coordinates::from_value(&json!([])).unwrap(), Coordinates::Nested(vec![]));
    }

    #[test]
    fn test_malformed_inputs() {
        let bad = [
            json!([[1.0]]),
            json!([1.0]),
            json!("1,2"),
            json!(null),
            json!([[1.0, 2.0], 3.0]),
            json!([1.0, "2"]),
            json!([1.0, [2.0, 3.0]]),
        ];

        for value in bad {
            match Coordinates::from_value(&value) {
                Err(ProjError::MalformedGeometry(_)) => {},
                other => panic!("Expected MalformedGeometry for {}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_to_value_round_trip() {
        let value = json!([[[0.5, 0.25], [1.0, 0.0, 7.0]]]);
        let coords = Coordinates::from_value(&value).unwrap();
        assert_eq!(coords.to_value(), value);
    }

    #[test]
    fn test_try_map_preserves_shape() {
        let coords = Coordinates::from_value(&json!([[[0, 0], [1, 0]], [[2, 2]]])).unwrap();
        let mapped = coords.try_map(&mut |p: &Position| Ok(Position::new(p.x + 1.0, p.y))).unwrap();

        assert_eq!(mapped.shape(), coords.shape());
        assert_eq!(mapped.positions()[2], &Position::new(3.0, 2.0));
    }
}
