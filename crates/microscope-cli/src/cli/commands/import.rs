use super::super::args::ImportArgs;
use crate::exit_codes::EXIT_SUCCESS;
use microscope_core::config::Config;
use microscope_core::storage::import::read_jsonl;

pub fn run(args: ImportArgs, config: &Config) -> anyhow::Result<i32> {
    let records = read_jsonl(&args.file)?;
    let manager = super::open_manager(config)?;
    let n = manager.store().upsert_records(&records)?;
    let total = manager.store().count()?;
    tracing::info!(file = %args.file.display(), records = n, total, "imported records");
    eprintln!(
        "imported {} records into {} ({} stored)",
        n,
        config.db_path().display(),
        total
    );
    Ok(EXIT_SUCCESS)
}
