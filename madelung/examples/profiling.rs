use madelung::{Calculator, EnergyResult, ParticleSystem, Vector3D};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let repeat = std::env::args().nth(1)
        .map(|value| value.parse::<usize>())
        .transpose()?
        .unwrap_or(4);

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    // run the calculation
    let energy = compute_energy(repeat)?;
    println!("{}", energy);

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Compute the Ewald energy of a NaCl supercell made of `repeat` cells along
/// each axis
fn compute_energy(repeat: usize) -> Result<EnergyResult, Box<dyn std::error::Error>> {
    let basis = [
        (1.0, [0.0, 0.0, 0.0]), (1.0, [0.5, 0.5, 0.0]),
        (1.0, [0.5, 0.0, 0.5]), (1.0, [0.0, 0.5, 0.5]),
        (-1.0, [0.5, 0.0, 0.0]), (-1.0, [0.0, 0.5, 0.0]),
        (-1.0, [0.0, 0.0, 0.5]), (-1.0, [0.5, 0.5, 0.5]),
    ];

    let mut positions = Vec::new();
    let mut charges = Vec::new();
    for i in 0..repeat {
        for j in 0..repeat {
            for k in 0..repeat {
                let origin = Vector3D::new(i as f64, j as f64, k as f64);
                for &(charge, position) in &basis {
                    positions.push(origin + Vector3D::from(position));
                    charges.push(charge);
                }
            }
        }
    }
    let system = ParticleSystem::from_parts(positions, charges, repeat as f64)?;

    let parameters = r#"{
        "alpha": 5.0,
        "n_kvecs": 10,
        "epsilon": {"Finite": 80.0}
    }"#;

    let energy = time_graph::spanned!("Full calculation", {
        let calculator = Calculator::new("ewald", parameters.to_owned())?;
        calculator.compute(&system)?
    });

    Ok(energy)
}
