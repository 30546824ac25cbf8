//! Static catalogue of buildable shapes and their required parameters.

use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The primitive shapes the builder knows how to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
}

impl ShapeKind {
    /// All kinds, in catalogue order.
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Cube,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Cone,
    ];

    /// Identifier used on the command line and in the catalogue.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cone => "cone",
        }
    }

    /// Required parameter names, in the order they are checked.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            ShapeKind::Cube | ShapeKind::Sphere => &["size"],
            ShapeKind::Cylinder | ShapeKind::Cone => &["radius", "height"],
        }
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| Error::UnknownShape(s.to_string()))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One catalogue entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShapeSpec {
    pub name: String,
    pub parameters: Vec<String>,
}

impl From<ShapeKind> for ShapeSpec {
    fn from(kind: ShapeKind) -> Self {
        Self {
            name: kind.name().to_string(),
            parameters: kind.parameters().iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Every supported shape with its parameter names.
pub fn list_shapes() -> Vec<ShapeSpec> {
    ShapeKind::ALL.into_iter().map(ShapeSpec::from).collect()
}

/// Numeric inputs for the builder. Unused fields are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parameters {
    pub size: Option<f64>,
    pub radius: Option<f64>,
    pub height: Option<f64>,
}

impl Parameters {
    /// Look a value up by its catalogue name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "size" => self.size,
            "radius" => self.radius,
            "height" => self.height,
            _ => None,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_order_and_parameters() {
        let shapes = list_shapes();
        let names: Vec<&str> = shapes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["cube", "sphere", "cylinder", "cone"]);
        assert_eq!(shapes[0].parameters, ["size"]);
        assert_eq!(shapes[3].parameters, ["radius", "height"]);
    }

    #[test]
    fn listing_is_deterministic() {
        assert_eq!(list_shapes(), list_shapes());
    }

    #[test]
    fn parse_kind() {
        assert_eq!("cylinder".parse::<ShapeKind>().unwrap(), ShapeKind::Cylinder);
        match "pyramid".parse::<ShapeKind>() {
            Err(Error::UnknownShape(id)) => assert_eq!(id, "pyramid"),
            other => panic!("expected UnknownShape, got {other:?}"),
        }
    }

    #[test]
    fn parameter_lookup() {
        let params = Parameters::default().with_radius(2.0).with_height(4.0);
        assert_eq!(params.get("radius"), Some(2.0));
        assert_eq!(params.get("height"), Some(4.0));
        assert_eq!(params.get("size"), None);
        assert_eq!(params.get("depth"), None);
    }
}
