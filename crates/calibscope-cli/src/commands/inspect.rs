use calibscope_core::EntityId;

pub fn run(input: &str) {
    let (snapshot, params) = super::load_snapshot(input);

    let mut qubits = 0usize;
    let mut couplings = 0usize;
    let mut unparsed = Vec::new();
    for id in snapshot.entity_ids() {
        match EntityId::parse(id) {
            Some(EntityId::Qubit(_)) => qubits += 1,
            Some(EntityId::Coupling(..)) => couplings += 1,
            None => unparsed.push(id),
        }
    }

    println!("Snapshot {input}");
    println!(
        "  {} entities: {qubits} qubits, {couplings} couplings, {} other",
        snapshot.entities.len(),
        unparsed.len()
    );
    if !unparsed.is_empty() {
        println!("  unrecognized ids: {}", unparsed.join(", "));
    }

    println!("\n{:<28} {:>8} {:>8}", "Parameter", "Entries", "Present");
    println!("{}", "-".repeat(46));
    for key in params.keys() {
        if let Some(sample) = params.get(key) {
            println!(
                "{:<28} {:>8} {:>8}",
                key,
                sample.len(),
                sample.present_count()
            );
        }
    }
}
