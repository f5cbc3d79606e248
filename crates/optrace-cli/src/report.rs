//! Plain-text reports.

use anyhow::Result;
use optrace::{OpticalSystem, Ray, RayStatus};

fn status_text(status: &RayStatus) -> String {
    match status {
        RayStatus::PassThrough => "ok".to_string(),
        RayStatus::Blocked { surface } => format!("blocked at S{surface}"),
        RayStatus::TotalInternalReflection { surface } => format!("TIR at S{surface}"),
        RayStatus::Missed { surface } => format!("missed S{surface}"),
        RayStatus::RayAimingFailed => "aiming failed".to_string(),
    }
}

pub fn print_info(system: &OpticalSystem) -> Result<()> {
    let assembly = system.assembly();
    println!("{}", if system.title.is_empty() { "(untitled)" } else { system.title.as_str() });
    if !system.note.is_empty() {
        println!("  {}", system.note);
    }

    println!("\n{:>4}  {:<10} {:>12} {:>12}  {:<12} {:>10}", "#", "label", "radius", "thickness", "material", "semi-diam");
    for (k, surface) in assembly.surfaces().iter().enumerate() {
        let stop = if k == assembly.stop_index() { "*" } else { " " };
        let (thickness, material) = match assembly.gaps().get(k) {
            Some(gap) => (format!("{:12.4}", gap.thickness), gap.material.name()),
            None => (String::new(), String::new()),
        };
        println!(
            "{:>3}{}  {:<10} {:>12.4} {:>12}  {:<12} {:>10.4}",
            k,
            stop,
            surface.label,
            surface.profile.radius(),
            thickness,
            material,
            surface.semi_diameter
        );
    }

    let fod = system.first_order().ok_or_else(|| anyhow::anyhow!("model not updated"))?;
    println!("\nFirst-order data ({:.4} nm):", fod.reference_wvl);
    println!("  efl          {:>14.6}", fod.efl);
    println!("  ffl          {:>14.6}", fod.ffl);
    println!("  bfl          {:>14.6}", fod.bfl);
    println!("  pp1          {:>14.6}", fod.pp1);
    println!("  ppk          {:>14.6}", fod.ppk);
    println!("  f/#          {:>14.6}", fod.fno);
    println!("  m            {:>14.6}", fod.red);
    println!("  img dist     {:>14.6}", fod.img_dist);
    println!("  img height   {:>14.6}", fod.img_ht);
    println!("  obj angle    {:>14.6}", fod.obj_ang);
    println!("  enp dist     {:>14.6}", fod.enp_dist);
    println!("  enp radius   {:>14.6}", fod.enp_radius);
    println!("  exp dist     {:>14.6}", fod.exp_dist);
    println!("  exp radius   {:>14.6}", fod.exp_radius);
    println!("  obj NA       {:>14.6}", fod.obj_na);
    println!("  img NA       {:>14.6}", fod.img_na);
    println!("  opt inv      {:>14.6}", fod.opt_inv);
    Ok(())
}

pub fn print_paraxial(system: &OpticalSystem, wvl: usize) -> Result<()> {
    let (marginal, chief) = system.paraxial_rays(wvl)?;
    println!("Paraxial rays at {:.4} nm", marginal.wvl());
    println!("{:>4} {:>14} {:>14} {:>14} {:>14}", "#", "marginal y", "marginal u'", "chief y", "chief u'");
    for (k, (m, c)) in marginal.records().iter().zip(chief.records()).enumerate() {
        println!("{:>4} {:>14.6} {:>14.6} {:>14.6} {:>14.6}", k, m.y, m.u_prime, c.y, c.u_prime);
    }
    Ok(())
}

pub fn print_ray(system: &OpticalSystem, ray: &Ray) {
    println!(
        "Ray at pupil ({:.3}, {:.3}), {:.4} nm: {}",
        ray.pupil.x,
        ray.pupil.y,
        ray.wvl,
        status_text(&ray.status)
    );
    println!("{:>4}  {:<10} {:>12} {:>12} {:>12} {:>12}", "#", "label", "x", "y", "z", "opl");
    for (k, seg) in ray.segments.iter().enumerate() {
        let label = system.assembly().surface(k).map(|s| s.label.as_str()).unwrap_or("");
        println!(
            "{:>4}  {:<10} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            k, label, seg.point.x, seg.point.y, seg.point.z, seg.opl
        );
    }
}

pub fn print_fan(rays: &[Ray], chief: &Ray) {
    let reference = chief.image_point();
    println!("{:>10} {:>10} {:>14} {:>14}  status", "px", "py", "dx", "dy");
    for ray in rays {
        let error = match (ray.image_point(), reference) {
            (Some(p), Some(r)) if ray.status.is_pass_through() => Some(p - r),
            _ => None,
        };
        match error {
            Some(d) => println!("{:>10.4} {:>10.4} {:>14.8} {:>14.8}  ok", ray.pupil.x, ray.pupil.y, d.x, d.y),
            None => println!(
                "{:>10.4} {:>10.4} {:>14} {:>14}  {}",
                ray.pupil.x,
                ray.pupil.y,
                "-",
                "-",
                status_text(&ray.status)
            ),
        }
    }
}

pub fn print_vignetting(system: &OpticalSystem) {
    println!("{:>4} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8}", "#", "x", "y", "vuy", "vly", "vux", "vlx");
    for (k, field) in system.spec().field_spec.fields().iter().enumerate() {
        let [vuy, vly, vux, vlx] = field.vignetting_factors();
        println!(
            "{:>4} {:>10.4} {:>10.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
            k, field.x, field.y, vuy, vly, vux, vlx
        );
    }
}
