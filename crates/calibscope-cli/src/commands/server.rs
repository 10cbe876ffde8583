use calibscope_core::DashboardConfig;

pub fn run(config: DashboardConfig, host: &str, port: u16) {
    let base = format!("http://{host}:{port}");
    let topo = &config.topology;

    println!("calibscope server v{}", calibscope_core::VERSION);
    println!("   {base}");
    println!(
        "   topology: {}x{} grid, mux {:?}, region {}",
        topo.grid_size, topo.grid_size, topo.mux_size, topo.region_size
    );
    println!("   {} configured thresholds", config.thresholds.len());
    println!();
    println!("   Endpoints:");
    println!("     GET  /                    API index (try: curl {base})");
    println!("     GET  /health              Health check");
    println!("     POST /api/v1/stats        Descriptive stats + yield");
    println!("     POST /api/v1/correlation  Pairwise Pearson correlation");
    println!("     POST /api/v1/cdf          Empirical CDF");
    println!("     POST /api/v1/histogram    Histogram bins");
    println!("     POST /api/v1/layout       Grid placement");
    println!("     POST /api/v1/color        Heatmap color");
    println!();
    println!("   Example:");
    println!(
        "     curl -X POST {base}/api/v1/cdf -H 'content-type: application/json' -d '{{\"values\": [1,2,3]}}'"
    );
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(calibscope_server::run_server(config, host, port)) {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    }
}
