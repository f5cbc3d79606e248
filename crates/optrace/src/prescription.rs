//! JSON prescription format.
//!
//! A [`Prescription`] is the serializable form of an [`OpticalSystem`]:
//! materials are stored by name and resolved against a
//! [`MaterialLibrary`] on load, and derived data (transforms, index steps,
//! first-order data) is rebuilt by the next model update.

use std::path::Path;

use optrace_assembly::{Decenter, Gap, InteractionMode, OpticalAssembly, Solve, Surface};
use optrace_geom::{Aperture, SurfaceProfile};
use optrace_material::{Material, MaterialLibrary};
use optrace_math::{is_infinite_distance, INFINITE_DISTANCE};
use optrace_spec::OpticalSpec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::system::OpticalSystem;

/// Current format version written by [`Prescription::from_system`].
pub const FORMAT_VERSION: &str = "0.1";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// One surface as stored on disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceRecord {
    /// Free-form label.
    pub label: String,
    /// Surface shape.
    pub profile: SurfaceProfile,
    /// Aperture applied while tracing.
    pub clear_aperture: Aperture,
    /// Mechanical edge.
    pub edge_aperture: Aperture,
    /// Transmit or reflect.
    pub interact_mode: InteractionMode,
    /// Optional offset and tilt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decenter: Option<Decenter>,
}

/// One gap as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRecord {
    /// Axial thickness. An infinite object distance is stored as
    /// [`INFINITE_DISTANCE`].
    pub thickness: f64,
    /// Material name understood by [`MaterialLibrary::find`].
    #[serde(default = "air_name")]
    pub material: String,
    /// Optional thickness solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solve: Option<Solve>,
}

fn air_name() -> String {
    "AIR".to_string()
}

/// A lens prescription with its optical specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Short title.
    #[serde(default)]
    pub title: String,
    /// Free-form note.
    #[serde(default)]
    pub note: String,
    /// Index of the aperture stop surface.
    pub stop: usize,
    /// Surfaces, object first and image last.
    pub surfaces: Vec<SurfaceRecord>,
    /// Gaps; `gaps[k]` follows `surfaces[k]`.
    pub gaps: Vec<GapRecord>,
    /// Pupil, fields and wavelengths.
    #[serde(default)]
    pub spec: OpticalSpec,
}

/// Name that resolves back to `material` through the library.
///
/// Constant indices with a display name (`"crown"`) are written as the
/// bare index so they reload as the same constant.
fn material_name(material: &Material) -> String {
    match material {
        Material::Constant { name, index } => {
            if name.eq_ignore_ascii_case("VACUUM") || name.trim().parse::<f64>().is_ok() {
                name.clone()
            } else {
                index.to_string()
            }
        }
        other => other.name(),
    }
}

impl Prescription {
    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot of `system`'s prescription.
    pub fn from_system(system: &OpticalSystem) -> Self {
        let assembly = system.assembly();
        let surfaces = assembly
            .surfaces()
            .iter()
            .map(|s| SurfaceRecord {
                label: s.label.clone(),
                profile: s.profile.clone(),
                clear_aperture: s.clear_aperture,
                edge_aperture: s.edge_aperture,
                interact_mode: s.interact_mode,
                decenter: s.decenter,
            })
            .collect();
        let gaps = assembly
            .gaps()
            .iter()
            .map(|g| GapRecord {
                thickness: if is_infinite_distance(g.thickness) {
                    INFINITE_DISTANCE.copysign(g.thickness)
                } else {
                    g.thickness
                },
                material: material_name(&g.material),
                solve: g.solve,
            })
            .collect();
        Self {
            version: FORMAT_VERSION.to_string(),
            title: system.title.clone(),
            note: system.note.clone(),
            stop: assembly.stop_index(),
            surfaces,
            gaps,
            spec: system.spec().clone(),
        }
    }

    /// Resolve materials through `library` and build a system. The model
    /// is not updated.
    pub fn into_system(self, library: MaterialLibrary) -> Result<OpticalSystem> {
        let surfaces = self
            .surfaces
            .into_iter()
            .map(|rec| {
                let mut surface = Surface::new(rec.label).with_profile(rec.profile);
                surface.clear_aperture = rec.clear_aperture;
                surface.edge_aperture = rec.edge_aperture;
                surface.interact_mode = rec.interact_mode;
                surface.decenter = rec.decenter;
                surface
            })
            .collect();
        let gaps = self
            .gaps
            .into_iter()
            .map(|rec| {
                let material = library.find(&rec.material)?;
                let mut gap = Gap::new(rec.thickness, material);
                gap.solve = rec.solve;
                Ok(gap)
            })
            .collect::<Result<Vec<_>>>()?;
        let assembly = OpticalAssembly::from_parts(surfaces, gaps, self.stop)?;
        debug!(title = %self.title, surfaces = assembly.surface_count(), "prescription loaded");

        let mut system = OpticalSystem::from_parts(self.title, assembly, self.spec, library);
        system.note = self.note;
        Ok(system)
    }
}

impl OpticalSystem {
    /// Read a JSON prescription file.
    pub fn load(path: &Path, library: MaterialLibrary) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Prescription::from_json(&json)?.into_system(library)
    }

    /// Write this system's prescription as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = Prescription::from_system(self).to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
