use super::args::*;

pub mod catalog;
pub mod classify;
pub mod dashboard;
pub mod import;

use crate::exit_codes::EXIT_SUCCESS;
use microscope_core::classify::KeywordClassifier;
use microscope_core::config::Config;
use microscope_core::shaper::{label_options, scraped_options};
use microscope_core::storage::SqliteManager;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let config = cli.global.to_config()?;
    // unsupported backends fail before any command runs
    config.backend()?;

    match cli.cmd {
        Command::Dashboard(args) => dashboard::run(args, &config),
        Command::Branches => catalog::branches(&config),
        Command::Experiments(args) => catalog::experiments(args, &config),
        Command::Summary(args) => catalog::summary(args, &config),
        Command::Classify(args) => classify::run(args, &config),
        Command::Import(args) => import::run(args, &config),
        Command::Options => {
            println!("label:   {}", label_options().join(" | "));
            println!("scraped: {}", scraped_options().join(" | "));
            Ok(EXIT_SUCCESS)
        }
    }
}

pub(crate) fn open_manager(config: &Config) -> anyhow::Result<SqliteManager> {
    SqliteManager::from_config(config, KeywordClassifier::loader())
}
