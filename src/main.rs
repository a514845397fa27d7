use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use rowmill::{FileConfig, FileDataset, Partition};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let recipe_path = match args.next() {
        Some(path) => path,
        None => bail!("usage: rowmill <recipe.json> [--normalize]"),
    };
    let normalize = match args.next().as_deref() {
        Some("--normalize") => true,
        Some(other) => bail!("unknown argument: {other}"),
        None => false,
    };

    let text = fs::read_to_string(&recipe_path)
        .with_context(|| format!("reading recipe {recipe_path}"))?;
    let config: FileConfig = serde_json::from_str(&text).context("parsing recipe JSON")?;

    let mut file_dataset = FileDataset::new(config);
    file_dataset.load().context("loading dataset")?;
    if normalize {
        file_dataset
            .dataset_mut()
            .normalize()
            .context("normalizing dataset")?;
    }

    for partition in [Partition::Training, Partition::Testing] {
        print_partition(&file_dataset, partition);
    }
    Ok(())
}

fn print_partition(file_dataset: &FileDataset, partition: Partition) {
    let rows = match file_dataset.dataset().rows(partition) {
        Ok(rows) => rows,
        Err(_) => {
            println!("{}: (not configured)", partition.name());
            return;
        }
    };

    println!("{}: {} rows", partition.name(), rows.row_count());
    if rows.row_count() == 0 {
        return;
    }
    if let Ok(output) = rows.output_row(0) {
        println!("  first output vector: {output:?}");
    }
    if let Ok(input) = rows.input_row(0) {
        println!("  first input vector:  {input:?}");
    }
}
