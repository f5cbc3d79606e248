//! A complete optical system: prescription, specification and cached
//! model data.

use optrace_assembly::OpticalAssembly;
use optrace_material::{Environment, MaterialLibrary};
use optrace_math::Vec2;
use optrace_paraxial::{compute_first_order, FirstOrderData, ParaxialRay};
use optrace_solve::{apply_solves, SolveContext};
use optrace_spec::OpticalSpec;
use optrace_trace::{aim_chief_rays, compute_vignetting, Ray, SequentialTracer, TraceOptions};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{OptraceError, Result};

/// Lens prescription plus everything derived from it.
///
/// The assembly and spec are edited through [`OpticalSystem::assembly_mut`]
/// and [`OpticalSystem::spec_mut`], which drop first-order data and aim
/// points. Call [`OpticalSystem::update_model`] afterwards so solves,
/// first-order data and aim points catch up. Tracing a model that has not
/// been updated since the last edit is an error.
#[derive(Debug, Clone)]
pub struct OpticalSystem {
    /// Short title.
    pub title: String,
    /// Free-form note.
    pub note: String,
    assembly: OpticalAssembly,
    spec: OpticalSpec,
    library: MaterialLibrary,
    options: TraceOptions,
    first_order: Option<FirstOrderData>,
}

impl OpticalSystem {
    /// Object, stop and image in air, with a default specification.
    pub fn new(library: MaterialLibrary) -> Self {
        let assembly = OpticalAssembly::minimal(library.air());
        Self::from_parts("", assembly, OpticalSpec::default(), library)
    }

    /// Empty system with the ambient conditions and trace options of
    /// `config`.
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut system = Self::new(MaterialLibrary::new(config.environment));
        system.options = config.trace;
        system
    }

    /// System from existing parts. The model is not updated.
    pub fn from_parts(
        title: impl Into<String>,
        assembly: OpticalAssembly,
        spec: OpticalSpec,
        library: MaterialLibrary,
    ) -> Self {
        Self {
            title: title.into(),
            note: String::new(),
            assembly,
            spec,
            library,
            options: TraceOptions::default(),
            first_order: None,
        }
    }

    /// Surfaces and gaps.
    pub fn assembly(&self) -> &OpticalAssembly {
        &self.assembly
    }

    /// Edit the surfaces and gaps. The model is stale until the next
    /// [`OpticalSystem::update_model`].
    pub fn assembly_mut(&mut self) -> &mut OpticalAssembly {
        self.invalidate();
        &mut self.assembly
    }

    /// Pupil, fields and wavelengths.
    pub fn spec(&self) -> &OpticalSpec {
        &self.spec
    }

    /// Edit the specification. The model is stale until the next
    /// [`OpticalSystem::update_model`].
    pub fn spec_mut(&mut self) -> &mut OpticalSpec {
        self.invalidate();
        &mut self.spec
    }

    /// Whether first-order data and aim points match the current
    /// prescription.
    pub fn is_up_to_date(&self) -> bool {
        self.first_order.is_some()
    }

    fn invalidate(&mut self) {
        if self.first_order.take().is_some() {
            debug!(title = %self.title, "model invalidated");
        }
        self.spec.field_spec.clear_aim_points();
    }

    /// Material library used to resolve names.
    pub fn library(&self) -> &MaterialLibrary {
        &self.library
    }

    /// Ambient conditions.
    pub fn environment(&self) -> Environment {
        self.library.environment()
    }

    /// Trace options.
    pub fn options(&self) -> TraceOptions {
        self.options
    }

    /// Change the trace options. The model is stale until the next update.
    pub fn set_options(&mut self, options: TraceOptions) {
        self.invalidate();
        self.options = options;
    }

    /// First-order data from the last model update.
    pub fn first_order(&self) -> Option<&FirstOrderData> {
        self.first_order.as_ref()
    }

    /// Bring derived data up to date after an edit.
    ///
    /// Order: transforms, solves (one pass in gap order), index steps and
    /// first-order data, chief-ray aim points, vignetting factors, surface
    /// semi-diameters.
    ///
    /// Vignetting factors are reset, then recomputed if any field carried
    /// some.
    pub fn update_model(&mut self) -> Result<()> {
        self.first_order = None;
        self.spec.field_spec.clear_aim_points();
        let had_vignetting = self
            .spec
            .field_spec
            .fields()
            .iter()
            .any(|f| f.vignetting_factors() != [0.0; 4]);
        self.spec.field_spec.clear_vignetting();
        self.assembly.update_transforms();

        let has_solves = self.assembly.gaps().iter().any(|g| g.solve.is_some());
        if has_solves {
            let fod = compute_first_order(&self.assembly, &self.spec)?;
            let applied = apply_solves(&mut self.assembly, &SolveContext::from_first_order(&fod))?;
            debug!(applied, "solves applied");
        }

        let wvl = self.spec.wvl_spec.reference_wvl();
        self.assembly.update_delta_n(wvl);
        let fod = compute_first_order(&self.assembly, &self.spec)?;

        aim_chief_rays(&self.assembly, &mut self.spec, &fod, self.options)?;
        if had_vignetting {
            compute_vignetting(&self.assembly, &mut self.spec, &fod, self.options)?;
            debug!("vignetting factors recomputed");
        }
        self.update_semi_diameters(&fod)?;

        info!(title = %self.title, efl = fod.efl, fno = fod.fno, "model updated");
        self.first_order = Some(fod);
        Ok(())
    }

    /// Set each surface's semi-diameter to the largest reference-ray
    /// height over all fields at the reference wavelength.
    fn update_semi_diameters(&mut self, fod: &FirstOrderData) -> Result<()> {
        let mut heights = vec![0.0_f64; self.assembly.surface_count()];
        {
            let tracer = SequentialTracer::new(&self.assembly, &self.spec, fod, self.options);
            let wvl_index = self.spec.wvl_spec.reference_index();
            for fi in 0..self.spec.field_spec.len() {
                for ray in tracer.reference_rays(fi, wvl_index)? {
                    for (height, seg) in heights.iter_mut().zip(&ray.segments) {
                        let r = seg.point.x.hypot(seg.point.y);
                        if r.is_finite() {
                            *height = height.max(r);
                        }
                    }
                }
            }
        }
        for (k, height) in heights.into_iter().enumerate() {
            self.assembly.surface_mut(k)?.semi_diameter = height;
        }
        Ok(())
    }

    /// Compute and store vignetting factors for every field.
    pub fn compute_vignetting(&mut self) -> Result<()> {
        let fod = self.first_order.ok_or(OptraceError::ModelNotUpdated)?;
        compute_vignetting(&self.assembly, &mut self.spec, &fod, self.options)?;
        Ok(())
    }

    /// Real-ray tracer over the current model.
    pub fn tracer(&self) -> Result<SequentialTracer<'_>> {
        let fod = self.first_order.as_ref().ok_or(OptraceError::ModelNotUpdated)?;
        Ok(SequentialTracer::new(&self.assembly, &self.spec, fod, self.options))
    }

    /// Trace one pupil ray.
    pub fn trace_pupil_ray(&self, field_index: usize, wvl_index: usize, pupil: Vec2) -> Result<Ray> {
        Ok(self.tracer()?.trace_pupil_ray(field_index, wvl_index, pupil)?)
    }

    /// Chief and four marginal reference rays.
    pub fn reference_rays(&self, field_index: usize, wvl_index: usize) -> Result<Vec<Ray>> {
        Ok(self.tracer()?.reference_rays(field_index, wvl_index)?)
    }

    /// Ray fan across the pupil at `azimuth_deg`.
    pub fn trace_fan(&self, field_index: usize, wvl_index: usize, azimuth_deg: f64, samples: usize) -> Result<Vec<Ray>> {
        Ok(self.tracer()?.trace_fan(field_index, wvl_index, azimuth_deg, samples)?)
    }

    /// Spot-diagram grid.
    pub fn trace_grid(&self, field_index: usize, wvl_index: usize, n: usize) -> Result<Vec<Ray>> {
        Ok(self.tracer()?.trace_grid(field_index, wvl_index, n)?)
    }

    /// Paraxial marginal and chief rays at wavelength `wvl_index`.
    pub fn paraxial_rays(&self, wvl_index: usize) -> Result<(ParaxialRay, ParaxialRay)> {
        let fod = self.first_order.as_ref().ok_or(OptraceError::ModelNotUpdated)?;
        let wvl = self.spec.wvl_spec.value(wvl_index)?;
        Ok(fod.reference_rays(&self.assembly, wvl))
    }
}

impl Default for OpticalSystem {
    fn default() -> Self {
        Self::new(MaterialLibrary::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use optrace_assembly::{Gap, Solve, Surface};
    use optrace_geom::{Aperture, SurfaceProfile};
    use optrace_material::Material;
    use optrace_spec::{Field, FieldSpec, FieldType, PupilSpec, PupilType, WvlSpec};

    fn singlet() -> OpticalSystem {
        let lib = MaterialLibrary::default();
        let air = lib.air();
        let bk7 = lib.find("N-BK7").unwrap();
        let assembly = OpticalAssembly::from_parts(
            vec![
                Surface::new("Obj"),
                Surface::new("S1")
                    .with_profile(SurfaceProfile::from_radius(60.0))
                    .with_clear_aperture(Aperture::circular(12.5)),
                Surface::new("S2").with_profile(SurfaceProfile::from_radius(-60.0)),
                Surface::new("Img"),
            ],
            vec![
                Gap::new(f64::INFINITY, air.clone()),
                Gap::new(6.0, bk7),
                Gap::new(50.0, air).with_solve(Solve::ParaxialImageDistance),
            ],
            1,
        )
        .unwrap();
        let spec = OpticalSpec::new(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 20.0),
            FieldSpec::new(FieldType::ObjectAngle, vec![Field::new(0.0, 0.0), Field::new(0.0, 5.0)]),
            WvlSpec::visible(),
        );
        OpticalSystem::from_parts("singlet", assembly, spec, lib)
    }

    #[test]
    fn test_model_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpticalSystem>();
        assert_send_sync::<optrace_material::Material>();
    }

    #[test]
    fn test_trace_requires_update() {
        let system = singlet();
        assert!(matches!(system.tracer(), Err(OptraceError::ModelNotUpdated)));
        assert!(system.first_order().is_none());
    }

    #[test]
    fn test_update_model() {
        let mut system = singlet();
        system.update_model().unwrap();
        let fod = *system.first_order().unwrap();

        // image gap moved to the paraxial focus
        let img_gap = system.assembly().gap(2).unwrap().thickness;
        assert_relative_eq!(img_gap, fod.bfl, epsilon = 1e-9);
        assert_relative_eq!(fod.paraxial_image_distance, img_gap, epsilon = 1e-9);

        // aim points cached, semi-diameters filled
        assert!(system.spec().field_spec.fields().iter().all(|f| f.aim_point().is_some()));
        let sd1 = system.assembly().surface(1).unwrap().semi_diameter;
        assert!(sd1 >= 10.0 - 1e-9);

        let ray = system.trace_pupil_ray(0, 1, Vec2::new(0.0, 1.0)).unwrap();
        assert!(ray.status.is_pass_through());
        let (marginal, _) = system.paraxial_rays(1).unwrap();
        assert_relative_eq!(marginal.y(1), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vignetting_needs_model() {
        let mut system = singlet();
        assert!(matches!(system.compute_vignetting(), Err(OptraceError::ModelNotUpdated)));
        system.update_model().unwrap();
        system.compute_vignetting().unwrap();
        // the 12.5 mm stop aperture sets the pupil, nothing else clips
        for field in system.spec().field_spec.fields() {
            assert_eq!(field.vignetting_factors(), [0.0; 4]);
        }
    }

    #[test]
    fn test_edits_invalidate_model() {
        let mut system = singlet();
        system.update_model().unwrap();
        let bfl = system.first_order().unwrap().bfl;
        assert!(system.is_up_to_date());

        system.assembly_mut().gap_mut(1).unwrap().thickness = 12.0;
        assert!(!system.is_up_to_date());
        assert!(system.spec().field_spec.fields().iter().all(|f| f.aim_point().is_none()));
        assert!(matches!(
            system.trace_pupil_ray(0, 1, Vec2::new(0.0, 1.0)),
            Err(OptraceError::ModelNotUpdated)
        ));

        system.update_model().unwrap();
        let fod = *system.first_order().unwrap();
        // a thicker lens focuses closer to its rear vertex
        assert!(fod.bfl < bfl - 1.0);
        assert_relative_eq!(system.assembly().gap(2).unwrap().thickness, fod.bfl, epsilon = 1e-9);
        assert!(system.trace_pupil_ray(0, 1, Vec2::new(0.0, 1.0)).unwrap().status.is_pass_through());

        system.spec_mut().pupil.value = 10.0;
        assert!(matches!(system.paraxial_rays(1), Err(OptraceError::ModelNotUpdated)));
    }

    /// A 10 mm beam through a bare stop, then a window 50 mm on.
    fn window_system(window_radius: f64) -> OpticalSystem {
        let lib = MaterialLibrary::default();
        let air = lib.air();
        let assembly = OpticalAssembly::from_parts(
            vec![
                Surface::new("Obj"),
                Surface::new("Stop"),
                Surface::new("Window").with_clear_aperture(Aperture::circular(window_radius)),
                Surface::new("Img"),
            ],
            vec![
                Gap::new(f64::INFINITY, air.clone()),
                Gap::new(50.0, air.clone()),
                Gap::new(10.0, air),
            ],
            1,
        )
        .unwrap();
        let spec = OpticalSpec::new(
            PupilSpec::new(PupilType::EntrancePupilDiameter, 10.0),
            FieldSpec::new(FieldType::ObjectAngle, vec![Field::new(0.0, 0.0), Field::new(0.0, 5.0)]),
            WvlSpec::default(),
        );
        OpticalSystem::from_parts("window", assembly, spec, lib)
    }

    #[test]
    fn test_update_model_recomputes_vignetting() {
        let shift = 50.0 * 5f64.to_radians().tan();
        let mut system = window_system(6.0);
        system.update_model().unwrap();
        system.compute_vignetting().unwrap();
        let vuy = system.spec().field_spec.fields()[1].vignetting_factors()[0];
        assert_relative_eq!(vuy, 1.0 - (6.0 - shift) / 5.0, epsilon = 1e-4);

        // a wider window lets more of the upper rim through
        system.assembly_mut().surface_mut(2).unwrap().clear_aperture = Aperture::circular(7.0);
        system.update_model().unwrap();
        let vuy = system.spec().field_spec.fields()[1].vignetting_factors()[0];
        assert_relative_eq!(vuy, 1.0 - (7.0 - shift) / 5.0, epsilon = 1e-4);
        assert_eq!(system.spec().field_spec.fields()[0].vignetting_factors(), [0.0; 4]);

        system.assembly_mut().surface_mut(2).unwrap().clear_aperture = Aperture::None;
        system.update_model().unwrap();
        for field in system.spec().field_spec.fields() {
            assert_eq!(field.vignetting_factors(), [0.0; 4]);
        }
    }

    #[test]
    fn test_config_environment_reaches_air() {
        let config = EngineConfig {
            environment: Environment::new(15.0, optrace_material::STANDARD_PRESSURE),
            ..EngineConfig::default()
        };
        let system = OpticalSystem::with_config(&config);
        assert_eq!(system.environment().temperature, 15.0);
        let gap = system.assembly().gap(0).unwrap();
        assert_eq!(gap.rindex(587.5618), 1.0);
        match &*gap.material {
            Material::Air(air) => assert_relative_eq!(air.rindex(587.5618), 1.000277, epsilon = 2e-6),
            other => panic!("expected air, got {other:?}"),
        }
    }
}
