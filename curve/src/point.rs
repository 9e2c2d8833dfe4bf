//! Curve points in affine or Jacobian coordinates.
//!
//! A point carries its curve, its coordinates, the numeric domain those
//! coordinates are stored in and an explicit infinity flag. The coordinates
//! of the point at infinity are placeholders and never read.

use core::fmt;
use std::sync::Arc;

use ecfp_digits::Digit;
use serde::{Deserialize, Serialize};

use crate::{CurveDescriptor, CurveError};

/// Coordinate representation of a point.
///
/// A Jacobian triple `(X, Y, Z)` with `Z != 0` denotes the affine point
/// `(X / Z^2, Y / Z^3)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coordinates {
    Affine {
        x: Vec<Digit>,
        y: Vec<Digit>,
    },
    Jacobian {
        x: Vec<Digit>,
        y: Vec<Digit>,
        z: Vec<Digit>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSystem {
    Affine,
    Jacobian,
}

/// Numeric domain of the coordinates: plain residues or Montgomery form `aR mod p`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Standard,
    Montgomery,
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Affine => f.write_str("affine"),
            CoordinateSystem::Jacobian => f.write_str("Jacobian"),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Standard => f.write_str("standard"),
            Domain::Montgomery => f.write_str("Montgomery"),
        }
    }
}

impl Coordinates {
    pub(crate) fn zeroed(system: CoordinateSystem, width: usize) -> Self {
        match system {
            CoordinateSystem::Affine => Coordinates::Affine {
                x: vec![0; width],
                y: vec![0; width],
            },
            CoordinateSystem::Jacobian => Coordinates::Jacobian {
                x: vec![0; width],
                y: vec![0; width],
                z: vec![0; width],
            },
        }
    }

    pub fn system(&self) -> CoordinateSystem {
        match self {
            Coordinates::Affine { .. } => CoordinateSystem::Affine,
            Coordinates::Jacobian { .. } => CoordinateSystem::Jacobian,
        }
    }

    fn digits(&self) -> impl Iterator<Item = &Vec<Digit>> {
        let (x, y, z) = match self {
            Coordinates::Affine { x, y } => (x, y, None),
            Coordinates::Jacobian { x, y, z } => (x, y, Some(z)),
        };
        [x, y].into_iter().chain(z)
    }
}

/// A point on a [`CurveDescriptor`].
#[derive(Clone)]
pub struct CurvePoint {
    pub(crate) curve: Arc<CurveDescriptor>,
    pub(crate) coordinates: Coordinates,
    pub(crate) domain: Domain,
    pub(crate) infinity: bool,
}

impl CurvePoint {
    /// Builds a finite affine point in standard form. Does not check that
    /// the point satisfies the curve equation.
    pub fn new_affine(
        curve: &Arc<CurveDescriptor>,
        x: Vec<Digit>,
        y: Vec<Digit>,
    ) -> Result<Self, CurveError> {
        Self::from_parts(curve, Coordinates::Affine { x, y }, Domain::Standard, false)
    }

    /// Assembles a point from raw parts, checking that every coordinate has
    /// the width of the field.
    pub fn from_parts(
        curve: &Arc<CurveDescriptor>,
        coordinates: Coordinates,
        domain: Domain,
        infinity: bool,
    ) -> Result<Self, CurveError> {
        let expected = curve.width();
        for (parameter, digits) in ["x", "y", "z"].into_iter().zip(coordinates.digits()) {
            if digits.len() != expected {
                return Err(CurveError::ParameterWidth {
                    parameter,
                    expected,
                    actual: digits.len(),
                });
            }
        }
        Ok(Self {
            curve: Arc::clone(curve),
            coordinates,
            domain,
            infinity,
        })
    }

    pub(crate) fn zeroed(
        curve: &Arc<CurveDescriptor>,
        system: CoordinateSystem,
        domain: Domain,
        infinity: bool,
    ) -> Self {
        Self {
            curve: Arc::clone(curve),
            coordinates: Coordinates::zeroed(system, curve.width()),
            domain,
            infinity,
        }
    }

    pub fn curve(&self) -> &Arc<CurveDescriptor> {
        &self.curve
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinates.system()
    }

    pub fn is_affine(&self) -> bool {
        self.coordinate_system() == CoordinateSystem::Affine
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_infinity(&self) -> bool {
        self.infinity
    }

    pub fn x(&self) -> &[Digit] {
        match &self.coordinates {
            Coordinates::Affine { x, .. } | Coordinates::Jacobian { x, .. } => x,
        }
    }

    pub fn y(&self) -> &[Digit] {
        match &self.coordinates {
            Coordinates::Affine { y, .. } | Coordinates::Jacobian { y, .. } => y,
        }
    }

    /// The `Z` coordinate, or `None` for affine points.
    pub fn z(&self) -> Option<&[Digit]> {
        match &self.coordinates {
            Coordinates::Affine { .. } => None,
            Coordinates::Jacobian { z, .. } => Some(z),
        }
    }

    pub(crate) fn y_mut(&mut self) -> &mut [Digit] {
        match &mut self.coordinates {
            Coordinates::Affine { y, .. } | Coordinates::Jacobian { y, .. } => y,
        }
    }

    /// Overwrites `destination` with a copy of this point.
    ///
    /// Existing buffers in `destination` are reused where their shapes match.
    pub fn copy_into(&self, destination: &mut CurvePoint) -> Result<(), CurveError> {
        if !Arc::ptr_eq(&self.curve, &destination.curve) {
            destination.curve = Arc::clone(&self.curve);
        }
        destination.coordinates.clone_from(&self.coordinates);
        destination.domain = self.domain;
        destination.infinity = self.infinity;

        if destination != self {
            return Err(CurveError::Internal("copied point differs from its source"));
        }
        Ok(())
    }

    /// SEC1 uncompressed encoding of an affine, standard-form point.
    pub fn encode(&self) -> Result<Vec<u8>, CurveError> {
        crate::encoding::encode_point(self)
    }
}

/// Any two points at infinity are equal, whatever their representation.
/// Finite points are equal when they agree on representation, domain and
/// every coordinate. The curve is not compared.
impl PartialEq for CurvePoint {
    fn eq(&self, other: &Self) -> bool {
        if self.infinity || other.infinity {
            return self.infinity == other.infinity;
        }
        self.domain == other.domain && self.coordinates == other.coordinates
    }
}

impl Eq for CurvePoint {}

impl fmt::Debug for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurvePoint")
            .field("curve", &self.curve.name().unwrap_or("<custom>"))
            .field("coordinates", &self.coordinates)
            .field("domain", &self.domain)
            .field("infinity", &self.infinity)
            .finish()
    }
}
