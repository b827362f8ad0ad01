use crate::Vector3D;
use super::{CubicCell, ParticleSystem};

pub fn test_system(name: &str) -> ParticleSystem {
    match name {
        "NaCl" => get_nacl(),
        "CsCl" => get_cscl(),
        "single charge" => get_single_charge(),
        "ion pair" => get_ion_pair(),
        "random" => get_random(),
        _ => panic!("unknown test system {}", name)
    }
}

/// NaCl structure, using the conventional cubic unit cell with 8 ions
fn get_nacl() -> ParticleSystem {
    let mut system = ParticleSystem::new(CubicCell::new(1.0).unwrap());
    system.add_particle(1.0, Vector3D::new(0.0, 0.0, 0.0));
    system.add_particle(1.0, Vector3D::new(0.5, 0.5, 0.0));
    system.add_particle(1.0, Vector3D::new(0.5, 0.0, 0.5));
    system.add_particle(1.0, Vector3D::new(0.0, 0.5, 0.5));
    system.add_particle(-1.0, Vector3D::new(0.5, 0.0, 0.0));
    system.add_particle(-1.0, Vector3D::new(0.0, 0.5, 0.0));
    system.add_particle(-1.0, Vector3D::new(0.0, 0.0, 0.5));
    system.add_particle(-1.0, Vector3D::new(0.5, 0.5, 0.5));
    return system;
}

/// CsCl structure, the primitive unit cell is the cubic cell
fn get_cscl() -> ParticleSystem {
    let mut system = ParticleSystem::new(CubicCell::new(1.0).unwrap());
    system.add_particle(1.0, Vector3D::new(0.0, 0.0, 0.0));
    system.add_particle(-1.0, Vector3D::new(0.5, 0.5, 0.5));
    return system;
}

/// A single unit charge in a cubic cell, with a neutralizing background
fn get_single_charge() -> ParticleSystem {
    let mut system = ParticleSystem::new(CubicCell::new(1.0).unwrap());
    system.add_particle(1.0, Vector3D::new(0.0, 0.0, 0.0));
    return system;
}

/// Two well separated opposite charges in a large cell
fn get_ion_pair() -> ParticleSystem {
    let mut system = ParticleSystem::new(CubicCell::new(10.0).unwrap());
    system.add_particle(1.0, Vector3D::new(4.0, 5.0, 5.0));
    system.add_particle(-1.0, Vector3D::new(6.0, 5.0, 5.0));
    return system;
}

/// Neutral but irregular arrangement of charges, with some of the particles
/// outside of the cell
fn get_random() -> ParticleSystem {
    let mut system = ParticleSystem::new(CubicCell::new(3.0).unwrap());
    system.add_particle(1.5, Vector3D::new(0.134, 1.282, 1.701));
    system.add_particle(-0.5, Vector3D::new(-0.273, 1.026, -1.471));
    system.add_particle(-2.0, Vector3D::new(1.922, -0.124, 1.900));
    system.add_particle(0.75, Vector3D::new(1.400, -0.464, 0.480));
    system.add_particle(0.25, Vector3D::new(0.149, 1.865, 0.635));
    system.add_particle(1.0, Vector3D::new(2.512, 2.870, 2.993));
    system.add_particle(-1.0, Vector3D::new(4.105, 0.652, 2.214));
    return system;
}
