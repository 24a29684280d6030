use clap::Args;
use grid_sir::prelude::*;
use grid_sir::runner::run_with_custom_args;

#[derive(Args, Debug)]
struct Extra {
    /// Number of agents to report on
    #[arg(short = 'n', long)]
    show: usize,
}

fn main() {
    run_with_custom_args(|simulation, _args, extra: Option<Extra>| {
        simulation.set_activation_order(ActivationOrder::Sequential);
        if let Some(extra) = extra {
            for snapshot in simulation.snapshot().iter().take(extra.show) {
                let line = grid_sir::serde_json::to_string(snapshot).map_err(SimError::from)?;
                println!("{line}");
            }
        }
        Ok(())
    })
    .unwrap();
}
