use std::path::PathBuf;

use clap::{Args, Command, FromArgMatches as _};
use log::info;

use crate::error::SimError;
use crate::log::{set_log_level, LevelFilter};
use crate::parameters::Parameters;
use crate::simulation::{ActivationOrder, Simulation};

/// Default cli arguments for the grid-sir runner
#[derive(Args, Debug, Clone)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path to a JSON file of simulation parameters
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value = "100")]
    pub ticks: usize,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(short, long, default_value = "off")]
    pub log_level: LevelFilter,

    /// Activate agents in id order instead of shuffling every tick
    #[arg(long)]
    pub sequential: bool,
}

impl Default for BaseArgs {
    fn default() -> Self {
        BaseArgs {
            random_seed: 0,
            config: None,
            ticks: 100,
            log_level: LevelFilter::Off,
            sequential: false,
        }
    }
}

#[derive(Args)]
pub struct PlaceholderCustom {}

fn create_grid_sir_cli() -> Command {
    let cli = Command::new("grid-sir");
    BaseArgs::augment_args(cli)
}

/// Runs a simulation with custom cli arguments.
///
/// `setup_fn` receives the freshly built simulation, the base arguments and the custom
/// arguments, and runs before the first tick.
///
/// # Errors
/// Returns an error if argument parsing, configuration or the setup function fails
pub fn run_with_custom_args<A, F>(setup_fn: F) -> Result<Simulation, Box<dyn std::error::Error>>
where
    A: Args,
    F: Fn(&mut Simulation, &BaseArgs, Option<A>) -> Result<(), SimError>,
{
    let mut cli = create_grid_sir_cli();
    cli = A::augment_args(cli);
    let matches = cli.get_matches();

    let base_args_matches = BaseArgs::from_arg_matches(&matches)?;
    let custom_matches = A::from_arg_matches(&matches)?;
    run_with_args_internal(base_args_matches, Some(custom_matches), setup_fn)
}

/// Runs a simulation with the default cli arguments.
///
/// # Errors
/// Returns an error if argument parsing, configuration or the setup function fails
pub fn run_with_args<F>(setup_fn: F) -> Result<Simulation, Box<dyn std::error::Error>>
where
    F: Fn(&mut Simulation, &BaseArgs, Option<PlaceholderCustom>) -> Result<(), SimError>,
{
    let cli = create_grid_sir_cli();
    let matches = cli.get_matches();

    let base_args_matches = BaseArgs::from_arg_matches(&matches)?;
    run_with_args_internal(base_args_matches, None, setup_fn)
}

/// Builds and runs a simulation from already parsed arguments.
///
/// # Errors
/// Returns an error if the configuration file or the setup function fails
pub fn run_with_base_args(args: BaseArgs) -> Result<Simulation, Box<dyn std::error::Error>> {
    run_with_args_internal(args, None, |_, _, _: Option<PlaceholderCustom>| Ok(()))
}

fn run_with_args_internal<A, F>(
    args: BaseArgs,
    custom_args: Option<A>,
    setup_fn: F,
) -> Result<Simulation, Box<dyn std::error::Error>>
where
    F: Fn(&mut Simulation, &BaseArgs, Option<A>) -> Result<(), SimError>,
{
    if args.log_level != LevelFilter::Off {
        set_log_level(args.log_level);
    }

    let parameters = match &args.config {
        Some(path) => {
            info!("Loading parameters from: {}", path.display());
            Parameters::from_json_file(path)?
        }
        None => Parameters::default(),
    };

    let mut simulation = Simulation::new(parameters, args.random_seed)?;
    if args.sequential {
        simulation.set_activation_order(ActivationOrder::Sequential);
    }

    setup_fn(&mut simulation, &args, custom_args)?;

    simulation.run(args.ticks);
    Ok(simulation)
}
