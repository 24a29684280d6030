use grid_sir::runner::run_with_args;

fn main() {
    let simulation = match run_with_args(|_, _, _| Ok(())) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("grid_sir: {e}");
            std::process::exit(1);
        }
    };
    let counts = simulation.counts();
    println!(
        "tick={} susceptible={} infected={} immune={}",
        simulation.current_tick(),
        counts.susceptible,
        counts.infected,
        counts.immune
    );
}
