//! Position structure for representing a single leaf coordinate

/// A position in a coordinate system
///
/// Always stored in x-then-y order (longitude/easting first), whatever the
/// axis order the owning CRS declares.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// X coordinate (longitude in geographic systems, easting in projected ones)
    pub x: f64,
    /// Y coordinate (latitude in geographic systems, northing in projected ones)
    pub y: f64,
    /// Components beyond the first two (elevation, measure), in input order
    pub extra: Vec<f64>,
}

impl Position {
    /// Create a new 2D position
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y, extra: Vec::new() }
    }

    /// Create a new 3D position
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, extra: vec![z] }
    }

    /// Build a position from a slice of components
    ///
    /// Returns `None` when fewer than two components are given.
    pub fn from_components(components: &[f64]) -> Option<Self> {
        match components {
            [x, y, rest @ ..] => Some(Position { x: *x, y: *y, extra: rest.to_vec() }),
            _ => None,
        }
    }

    /// Check if this position has a Z coordinate
    pub fn has_z(&self) -> bool {
        !self.extra.is_empty()
    }

    /// Get the Z coordinate, if present
    pub fn z(&self) -> Option<f64> {
        self.extra.first().copied()
    }

    /// Number of components in this position
    pub fn dimension(&self) -> usize {
        2 + self.extra.len()
    }

    /// All components in order
    pub fn components(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.dimension());
        out.push(self.x);
        out.push(self.y);
        out.extend_from_slice(&self.extra);
        out
    }

    /// Drop every component beyond x and y
    pub fn to_2d(&self) -> Self {
        Position::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_components() {
        assert_eq!(Position::from_components(&[1.0, 2.0]), Some(Position::new(1.0, 2.0)));
        assert_eq!(Position::from_components(&[1.0, 2.0, 3.0]), Some(Position::new_3d(1.0, 2.0, 3.0)));
        assert_eq!(Position::from_components(&[1.0]), None);
        assert_eq!(Position::from_components(&[]), None);
    }

    #[test]
    fn test_components_keep_order() {
        let p = Position::from_components(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(p.dimension(), 4);
        assert_eq!(p.z(), Some(3.0));
        assert_eq!(p.components(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(!p.to_2d().has_z());
    }
}
