use super::super::args::ClassifyArgs;
use crate::exit_codes::{self, EXIT_SUCCESS};
use microscope_core::classify::classify;
use microscope_core::config::Config;

pub fn run(args: ClassifyArgs, config: &Config) -> anyhow::Result<i32> {
    let manager = super::open_manager(config)?;
    let limit = args.signed_limit();

    eprintln!("Running classification process, this may take a while...");
    match classify(&manager, &args.branch, &args.experiment, limit) {
        Ok(report) => {
            println!(
                "classified {} of {} pending records with {}/{}",
                report.labelled, report.considered, report.branch, report.experiment
            );
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            let bound = if limit >= 0 {
                format!(" and up to {limit}")
            } else {
                String::new()
            };
            eprintln!(
                "Unable to classify using model {}/{}{}. Error: {e:#}",
                args.branch, args.experiment, bound
            );
            Ok(exit_codes::for_error(&e))
        }
    }
}
