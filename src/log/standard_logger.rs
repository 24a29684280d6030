use log4rs::append::console::ConsoleAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::{LogConfiguration, ModuleLogConfiguration};

// ISO 8601 timestamp, color coded level tag, target module
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
const CONSOLE: &str = "console";

impl From<&ModuleLogConfiguration> for Logger {
    fn from(module_config: &ModuleLogConfiguration) -> Self {
        Logger::builder().build(module_config.module.clone(), module_config.level)
    }
}

impl LogConfiguration {
    fn build_config(&self) -> Result<Config, ConfigErrors> {
        let console = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        Config::builder()
            .appender(Appender::builder().build(CONSOLE, Box::new(console)))
            .loggers(self.module_configurations.values().map(Logger::from))
            .build(Root::builder().appender(CONSOLE).build(self.global_log_level))
    }

    /// Installs the global `log4rs` logger on first use and reconfigures it afterwards. Failures
    /// go to stderr: the simulation runs the same with or without a logger.
    pub(in crate::log) fn set_config(&mut self) {
        let config = match self.build_config() {
            Ok(config) => config,
            Err(errors) => {
                eprintln!("grid_sir: invalid logger configuration: {errors}");
                return;
            }
        };
        match &self.root_handle {
            Some(handle) => handle.set_config(config),
            None => match log4rs::init_config(config) {
                Ok(handle) => self.root_handle = Some(handle),
                Err(error) => eprintln!("grid_sir: logger not installed: {error}"),
            },
        }
    }
}
