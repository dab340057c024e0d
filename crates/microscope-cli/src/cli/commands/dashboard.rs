use super::super::args::{DashboardArgs, OutputFormat};
use super::super::render;
use crate::exit_codes::EXIT_SUCCESS;
use microscope_core::config::Config;
use microscope_core::DashboardQuery;

pub fn run(args: DashboardArgs, config: &Config) -> anyhow::Result<i32> {
    // validate filters before the database is opened
    let query = DashboardQuery::new(
        &args.label,
        &args.scraped,
        args.signed_max_rows(),
        args.max_content_len,
    )?;
    let manager = super::open_manager(config)?;
    let rows = query.run(&manager)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => render::write_table(&mut out, &rows)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &rows)?;
            std::io::Write::write_all(&mut out, b"\n")?;
        }
    }
    eprintln!(
        "rows: {} (label={} scraped={} max_rows={})",
        rows.len(),
        query.label.as_str(),
        query.scraped.as_str(),
        query.max_rows
    );
    Ok(EXIT_SUCCESS)
}
