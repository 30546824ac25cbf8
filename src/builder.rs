//! Shape builder: turns a shape identifier plus parameters into a validated solid.
//!
//! # Example
//!
//! ```rust,no_run
//! use shapegen::builder::build;
//! use shapegen::catalogue::Parameters;
//!
//! let params = Parameters::default().with_radius(5.0).with_height(10.0);
//! let model = build("cylinder", &params).unwrap();
//! assert_eq!(model.face_count(), 4);
//! ```

use crate::catalogue::{Parameters, ShapeKind};
use crate::error::{Error, KernelError, Result};
use crate::math::Point2;
use crate::primitive::{make_box, make_cone, make_cylinder_between, make_revolved, make_sphere};
use crate::topo::{validate_solid, SolidId, TopoStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A fully parameterized primitive, ready for the kernel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// Axis-aligned cube centered at the origin.
    Cube { size: f64 },
    /// Sphere centered at the origin; `size` is the diameter.
    Sphere { size: f64 },
    /// Cylinder along Z, centered on the origin.
    Cylinder { radius: f64, height: f64 },
    /// Cone along +Z with its base on z = 0 and the apex at z = `height`.
    Cone { radius: f64, height: f64 },
}

impl Primitive {
    /// Validate that every parameter `kind` needs is present.
    ///
    /// The first missing one, in catalogue order, is reported.
    pub fn from_parameters(kind: ShapeKind, params: &Parameters) -> Result<Self> {
        let shape = kind.name();
        let need = |parameter: &'static str| {
            params
                .get(parameter)
                .ok_or(Error::MissingParameter { shape, parameter })
        };
        Ok(match kind {
            ShapeKind::Cube => Primitive::Cube { size: need("size")? },
            ShapeKind::Sphere => Primitive::Sphere { size: need("size")? },
            ShapeKind::Cylinder => Primitive::Cylinder {
                radius: need("radius")?,
                height: need("height")?,
            },
            ShapeKind::Cone => Primitive::Cone {
                radius: need("radius")?,
                height: need("height")?,
            },
        })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Primitive::Cube { .. } => ShapeKind::Cube,
            Primitive::Sphere { .. } => ShapeKind::Sphere,
            Primitive::Cylinder { .. } => ShapeKind::Cylinder,
            Primitive::Cone { .. } => ShapeKind::Cone,
        }
    }
}

/// How cones are handed to the kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConeStrategy {
    /// Native cone constructor with a zero top radius.
    #[default]
    Primitive,
    /// Revolve the right-triangle profile about the Z axis.
    Revolve,
}

impl FromStr for ConeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "primitive" => Ok(ConeStrategy::Primitive),
            "revolve" => Ok(ConeStrategy::Revolve),
            other => Err(format!("unknown cone strategy '{other}'")),
        }
    }
}

impl fmt::Display for ConeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConeStrategy::Primitive => "primitive",
            ConeStrategy::Revolve => "revolve",
        })
    }
}

/// Knobs that change how a shape is constructed, not what it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub cone_strategy: ConeStrategy,
}

/// A built solid together with the arena that owns its topology.
#[derive(Clone, Debug)]
pub struct Model {
    store: TopoStore,
    solid: SolidId,
    kind: ShapeKind,
}

impl Model {
    pub fn store(&self) -> &TopoStore {
        &self.store
    }

    pub fn solid(&self) -> SolidId {
        self.solid
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn vertex_count(&self) -> usize {
        self.store.solid_vertices(self.solid).len()
    }

    pub fn edge_count(&self) -> usize {
        self.store.solid_edges(self.solid).len()
    }

    pub fn face_count(&self) -> usize {
        self.store.solid_face_count(self.solid)
    }
}

/// Build a shape with default options.
pub fn build(identifier: &str, params: &Parameters) -> Result<Model> {
    build_with(identifier, params, &BuildOptions::default())
}

/// Build a shape, choosing construction details from `options`.
pub fn build_with(identifier: &str, params: &Parameters, options: &BuildOptions) -> Result<Model> {
    let kind: ShapeKind = identifier.parse().inspect_err(|_| {
        warn!(shape = identifier, "unknown shape requested");
    })?;
    let primitive = Primitive::from_parameters(kind, params)?;
    build_primitive(primitive, options)
}

/// Hand a validated primitive to the kernel and check the resulting topology.
pub fn build_primitive(primitive: Primitive, options: &BuildOptions) -> Result<Model> {
    debug!(?primitive, ?options, "building primitive");
    let mut store = TopoStore::new();
    let solid = match primitive {
        Primitive::Cube { size } => {
            let h = size / 2.0;
            make_box(&mut store, h, h, h)?
        }
        Primitive::Sphere { size } => make_sphere(&mut store, size / 2.0)?,
        Primitive::Cylinder { radius, height } => {
            make_cylinder_between(&mut store, radius, -height / 2.0, height / 2.0)?
        }
        Primitive::Cone { radius, height } => match options.cone_strategy {
            ConeStrategy::Primitive => make_cone(&mut store, radius, 0.0, height)?,
            ConeStrategy::Revolve => {
                let profile = [
                    Point2::new(0.0, 0.0),
                    Point2::new(0.0, height),
                    Point2::new(radius, 0.0),
                ];
                make_revolved(&mut store, &profile)?
            }
        },
    };

    let check = validate_solid(&store, solid);
    if !check.valid {
        warn!(errors = ?check.errors, "constructed solid failed validation");
        return Err(KernelError::InvalidTopology(check.errors).into());
    }

    let model = Model {
        store,
        solid,
        kind: primitive.kind(),
    };
    info!(
        shape = model.kind.name(),
        vertices = model.vertex_count(),
        edges = model.edge_count(),
        faces = model.face_count(),
        "solid built"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_in_catalogue_order() {
        let err = build("cone", &Parameters::default()).unwrap_err();
        match err {
            Error::MissingParameter { shape, parameter } => {
                assert_eq!(shape, "cone");
                assert_eq!(parameter, "radius");
            }
            other => panic!("expected MissingParameter, got {other:?}"),
        }

        let params = Parameters::default().with_radius(1.0);
        let err = build("cylinder", &params).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParameter {
                parameter: "height",
                ..
            }
        ));
    }

    #[test]
    fn unused_parameters_are_ignored() {
        let params = Parameters::default().with_size(2.0).with_height(100.0);
        let model = build("cube", &params).unwrap();
        assert_eq!(model.kind(), ShapeKind::Cube);
        assert_eq!(model.face_count(), 6);
    }

    #[test]
    fn degenerate_dimension_is_a_kernel_error() {
        let params = Parameters::default().with_size(0.0);
        let err = build("sphere", &params).unwrap_err();
        assert!(matches!(err, Error::Kernel(KernelError::InvalidDimension { .. })));

        let params = Parameters::default().with_radius(f64::NAN).with_height(1.0);
        assert!(matches!(build("cylinder", &params), Err(Error::Kernel(_))));
    }

    #[test]
    fn revolved_cone_rejects_bad_dimensions() {
        let options = BuildOptions {
            cone_strategy: ConeStrategy::Revolve,
        };
        let params = Parameters::default().with_radius(-1.0).with_height(2.0);
        assert!(matches!(
            build_with("cone", &params, &options),
            Err(Error::Kernel(_))
        ));
    }

    #[test]
    fn cone_strategy_parsing() {
        assert_eq!("revolve".parse::<ConeStrategy>().unwrap(), ConeStrategy::Revolve);
        assert!("lathe".parse::<ConeStrategy>().is_err());
        assert_eq!(ConeStrategy::default().to_string(), "primitive");
    }
}
