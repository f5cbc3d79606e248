//! One optical interface.

use optrace_geom::{Aperture, SurfaceProfile};
use optrace_math::Transform;
use serde::{Deserialize, Serialize};

/// How light leaves a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Refract into the following medium.
    #[default]
    Transmit,
    /// Mirror back into the incident medium.
    Reflect,
}

/// How a decenter affects the surfaces that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecenterKind {
    /// The new axis carries on to every following surface.
    #[default]
    Local,
    /// The axis is restored after this surface.
    DecenterAndReturn,
}

/// Offset and tilt of a surface relative to the incoming axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Decenter {
    /// Effect on following surfaces.
    #[serde(default)]
    pub kind: DecenterKind,
    /// Offset along x.
    #[serde(default)]
    pub x: f64,
    /// Offset along y.
    #[serde(default)]
    pub y: f64,
    /// Tilt about x, degrees.
    #[serde(default)]
    pub alpha: f64,
    /// Tilt about y, degrees.
    #[serde(default)]
    pub beta: f64,
    /// Roll about z, degrees.
    #[serde(default)]
    pub gamma: f64,
}

impl Decenter {
    /// Transform from the decentered frame into the incoming frame:
    /// offset first, then tilt about the offset vertex.
    pub fn transform(&self) -> Transform {
        Transform::translation(self.x, self.y, 0.0)
            .then(&Transform::tilt_degrees(self.alpha, self.beta, self.gamma))
    }
}

/// An optical interface in the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Free-form label ("Obj", "Stop", "L1 front" ...).
    pub label: String,
    /// Shape of the interface.
    pub profile: SurfaceProfile,
    /// Aperture that blocks rays during tracing.
    pub clear_aperture: Aperture,
    /// Mechanical edge; informational.
    pub edge_aperture: Aperture,
    /// Transmit or reflect.
    pub interact_mode: InteractionMode,
    /// Optional offset and tilt.
    pub decenter: Option<Decenter>,
    /// Semi-diameter filled from reference rays by the model update.
    pub semi_diameter: f64,
    delta_n: f64,
    local_transform: Transform,
    global_transform: Transform,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new("")
    }
}

impl Surface {
    /// Flat, unlimited, transmitting surface.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            profile: SurfaceProfile::Plane,
            clear_aperture: Aperture::None,
            edge_aperture: Aperture::None,
            interact_mode: InteractionMode::Transmit,
            decenter: None,
            semi_diameter: 0.0,
            delta_n: 0.0,
            local_transform: Transform::identity(),
            global_transform: Transform::identity(),
        }
    }

    /// Replace the profile.
    pub fn with_profile(mut self, profile: SurfaceProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replace the clear aperture.
    pub fn with_clear_aperture(mut self, aperture: Aperture) -> Self {
        self.clear_aperture = aperture;
        self
    }

    /// Attach a decenter.
    pub fn with_decenter(mut self, decenter: Decenter) -> Self {
        self.decenter = Some(decenter);
        self
    }

    /// Make this surface a mirror.
    pub fn reflecting(mut self) -> Self {
        self.interact_mode = InteractionMode::Reflect;
        self
    }

    /// Vertex curvature.
    pub fn cv(&self) -> f64 {
        self.profile.cv()
    }

    /// Index step `n' − n` across the surface at the reference wavelength,
    /// as of the last model update.
    pub fn delta_n(&self) -> f64 {
        self.delta_n
    }

    /// Transform from this surface's frame into the previous surface's.
    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    /// Transform from this surface's frame into the global frame at the
    /// first optical surface.
    pub fn global_transform(&self) -> &Transform {
        &self.global_transform
    }

    /// Largest usable radius: the clear aperture if set, else the
    /// semi-diameter.
    pub fn max_aperture(&self) -> f64 {
        self.clear_aperture
            .max_dimension()
            .unwrap_or(self.semi_diameter)
    }

    pub(crate) fn set_delta_n(&mut self, delta_n: f64) {
        self.delta_n = delta_n;
    }

    pub(crate) fn set_transforms(&mut self, local: Transform, global: Transform) {
        self.local_transform = local;
        self.global_transform = global;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use optrace_math::Point3;

    #[test]
    fn test_default_surface() {
        let s = Surface::new("S1");
        assert_eq!(s.profile, SurfaceProfile::Plane);
        assert_eq!(s.clear_aperture, Aperture::None);
        assert_eq!(s.interact_mode, InteractionMode::Transmit);
    }

    #[test]
    fn test_max_aperture_prefers_clear_aperture() {
        let mut s = Surface::new("S1");
        s.semi_diameter = 7.0;
        assert_eq!(s.max_aperture(), 7.0);
        let s = s.with_clear_aperture(Aperture::circular(5.0));
        assert_eq!(s.max_aperture(), 5.0);
    }

    #[test]
    fn test_decenter_offsets_vertex() {
        let dec = Decenter {
            x: 1.0,
            y: -2.0,
            alpha: 5.0,
            ..Default::default()
        };
        let vertex = dec.transform().apply_point(&Point3::origin());
        assert_relative_eq!(vertex, Point3::new(1.0, -2.0, 0.0), epsilon = 1e-12);
    }
}
