use std::process;

use capillary_adi::{initialization, logging};

fn main() {
    logging::init_logging(None);
    let param_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "inputs/adiparam.json".to_string());
    if let Err(e) = run(&param_path) {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run(param_path: &str) -> Result<(), capillary_adi::error::AdiError> {
    let params = initialization::initialize_params_by_file(param_path)?;
    let mut simulation = initialization::initialize_simulation(&params)?;
    simulation.run()
}
