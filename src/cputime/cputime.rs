use std::error::Error;

use sort_timings::{
    bench::{self, BenchOptions, Dataset, DEFAULT_SIZES},
    cli,
};

/*
Sorts every lottery_<size>.txt dataset with std sort, bubble sort, selection sort and heap sort,
and writes one line per dataset (size and the four times in ms) to time_sorts.txt for `plot`.
*/

fn main() -> Result<(), Box<dyn Error>> {
    sort_timings::init_logging();
    let arguments = cli::bench_cli();

    if arguments.flamegraph {
        flame::start("main");
    }

    let datasets: Vec<Dataset> = match &arguments.sizes {
        Some(sizes) => sizes
            .iter()
            .map(|&size| Dataset::new(&arguments.datadir, size))
            .collect(),
        None => {
            let found = bench::discover(&arguments.datadir)?;
            if found.is_empty() {
                DEFAULT_SIZES
                    .iter()
                    .map(|&size| Dataset::new(&arguments.datadir, size))
                    .collect()
            } else {
                found
            }
        }
    };

    if arguments.generate {
        std::fs::create_dir_all(&arguments.datadir)?;
        let generated = bench::generate_missing(&datasets, arguments.seed)?;
        println!("Generated {} datasets", generated);
    }

    let options = BenchOptions {
        sorted_dir: arguments.write_sorted.then(|| arguments.datadir.clone()),
    };
    let table = bench::run(&datasets, &options)?;
    table.write(&arguments.outputpath)?;
    println!("Results written to {}", arguments.outputpath.display());

    if arguments.flamegraph {
        flame::end("main");
        sort_timings::dump_flamegraph()?;
    }

    Ok(())
}
