// SPDX-License-Identifier: MIT

use log::info;
use std::io::{self, Write};
use sumbench::bench;
use sumbench::{BenchConfig, Dataset};

fn main() -> sumbench::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let config = BenchConfig::from_env()?;
    info!("running with {:?}", config);

    let dataset = Dataset::generate(
        config.array_length,
        config.min_value,
        config.max_value,
        config.seed,
    )?;

    let report = bench::run(&config, &dataset)?;

    let stdout = io::stdout();
    let mut output = stdout.lock();
    write!(output, "{}", report)?;

    let print_all =
        bench::prompt_print_all(&mut io::stdin().lock(), &mut output)?;
    bench::write_summary(
        &mut output,
        dataset.as_slice(),
        print_all,
        report.average(),
    )?;
    output.flush()?;
    Ok(())
}
