use std::error::Error;

use sort_timings::{
    chart::{self, ChartConfig},
    cli,
    parse::{self, ParseError},
};

fn main() -> Result<(), Box<dyn Error>> {
    sort_timings::init_logging();
    let arguments = cli::cli();

    if arguments.flamegraph {
        flame::start("main");
    }

    let table = match parse::load(&arguments.inputpath) {
        Ok(table) => table,
        Err(ParseError::NotFound(path)) => {
            println!(
                "Error: file '{}' not found. Make sure it is in the same folder as the program.",
                path.display()
            );
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if arguments.print {
        println!("{}", table);
    }

    let config = ChartConfig::with_dpi(arguments.dpi);
    let image = if arguments.save {
        arguments.outputpath.clone()
    } else {
        chart::preview_path()?
    };

    if arguments.save || arguments.show {
        chart::render_png(&table, &config, &image)?;
    } else {
        chart::render_to_buffer(&table, &config)?;
        tracing::info!("chart rendered, nothing to save or show");
    }

    if arguments.show {
        chart::show(&image)?;
    }

    if arguments.flamegraph {
        flame::end("main");
        sort_timings::dump_flamegraph()?;
    }

    Ok(())
}
