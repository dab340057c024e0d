use super::super::args::{ExperimentsArgs, SummaryArgs};
use crate::exit_codes::EXIT_SUCCESS;
use microscope_core::catalog::{DirectoryCatalog, ExperimentBrowser};
use microscope_core::config::Config;

fn browser(config: &Config) -> ExperimentBrowser<DirectoryCatalog> {
    ExperimentBrowser::from_root(config.experiments_root())
}

pub fn branches(config: &Config) -> anyhow::Result<i32> {
    let branches = browser(config).list_branches()?;
    if branches.is_empty() {
        eprintln!(
            "no branches under {}",
            config.experiments_root().display()
        );
    }
    for b in branches {
        println!("{b}");
    }
    Ok(EXIT_SUCCESS)
}

pub fn experiments(args: ExperimentsArgs, config: &Config) -> anyhow::Result<i32> {
    for e in browser(config).list_experiments(&args.branch)? {
        println!("{e}");
    }
    Ok(EXIT_SUCCESS)
}

pub fn summary(args: SummaryArgs, config: &Config) -> anyhow::Result<i32> {
    match browser(config).get_summary(&args.branch, &args.experiment)? {
        Some(text) => println!("{}", text.trim_end()),
        None => println!("(no summary)"),
    }
    Ok(EXIT_SUCCESS)
}
