use mazecarve::generator::Carver;

/// Headless repeated generation, for profiling large grids.
fn main() {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let size: u16 = args.next().and_then(|s| s.parse().ok()).unwrap_or(200);
    let iterations: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    for run in 0..iterations {
        let started = std::time::Instant::now();
        let mut carver =
            Carver::new(size, size, None, None).expect("bench dimensions are non-zero");
        carver.generate_full();
        println!("run {run}: {size}x{size} in {:?}", started.elapsed());
        println!("{}", carver.stats());
    }
}
