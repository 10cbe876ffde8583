use calibscope_core::DashboardConfig;

pub fn run(config: &DashboardConfig, value: f64, min: f64, max: f64) {
    let color = config.palette.color_for(value, min, max);
    println!("{color}");
}
