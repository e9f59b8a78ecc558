use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::chart::DEFAULT_OUTPUT;

pub const DEFAULT_INPUT: &str = "time_sorts.txt";

#[derive(Debug)]
pub struct CliArgs {
    pub inputpath: PathBuf,
    pub outputpath: PathBuf,
    pub print: bool,
    pub save: bool,
    pub show: bool,
    pub dpi: u32,
    pub flamegraph: bool,
}

#[derive(Debug)]
pub struct BenchArgs {
    pub datadir: PathBuf,
    pub outputpath: PathBuf,
    pub sizes: Option<Vec<usize>>,
    pub generate: bool,
    pub seed: u64,
    pub write_sorted: bool,
    pub flamegraph: bool,
}

fn flamegraph_arg() -> Arg {
    Arg::new("flamegraph")
        .help("Write a flamegraph of the run to flamegraph.html")
        .long("flamegraph")
        .short('f')
        .action(ArgAction::SetTrue)
}

pub fn plot_command() -> Command {
    command!("plot")
        .about("Draws the sorting benchmark timings as a log-scale line chart.")
        .arg(
            Arg::new("input")
                .help("Measurements file: input size and four timings per line")
                .default_value(DEFAULT_INPUT)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Where to save the chart")
                .default_value(DEFAULT_OUTPUT)
                .value_parser(value_parser!(PathBuf))
                .index(2),
        )
        .arg(
            Arg::new("print")
                .help("Print the loaded table")
                .long("print")
                .short('p')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_save")
                .help("Do not write the chart to disk")
                .long("no-save")
                .short('n')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show")
                .help("Open the chart in the image viewer (not opened by default)")
                .long("show")
                .short('s')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dpi")
                .help("Output resolution in dots per inch")
                .long("dpi")
                .default_value("300")
                .value_parser(value_parser!(u32).range(10..=1200)),
        )
        .arg(flamegraph_arg())
}

pub fn bench_command() -> Command {
    command!("cputime")
        .about("Times std sort, bubble, selection and heap sort on lottery ticket datasets.")
        .arg(
            Arg::new("data_dir")
                .help("Directory holding lottery_<size>.txt datasets")
                .long("data-dir")
                .short('d')
                .default_value(".")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .help("Measurements file to write")
                .long("output")
                .short('o')
                .default_value(DEFAULT_INPUT)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("sizes")
                .help("Comma separated dataset sizes, e.g. 100,500,1000")
                .long("sizes")
                .value_delimiter(',')
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("generate")
                .help("Generate missing datasets with random tickets")
                .long("generate")
                .short('g')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("seed")
                .help("Seed for dataset generation")
                .long("seed")
                .default_value("42")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("write_sorted")
                .help("Write every sorted dataset to sorted_<algorithm>_<size>.csv")
                .long("write-sorted")
                .short('w')
                .action(ArgAction::SetTrue),
        )
        .arg(flamegraph_arg())
}

pub fn cli() -> CliArgs {
    plot_args(plot_command().get_matches())
}

pub fn bench_cli() -> BenchArgs {
    bench_args(bench_command().get_matches())
}

fn plot_args(arguments: ArgMatches) -> CliArgs {
    // Both have default values, so clap always provides them.
    let inputpath = arguments
        .get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let outputpath = arguments
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    CliArgs {
        inputpath,
        outputpath,
        print: arguments.get_flag("print"),
        save: !arguments.get_flag("no_save"),
        show: arguments.get_flag("show"),
        dpi: arguments.get_one::<u32>("dpi").copied().unwrap_or(300),
        flamegraph: arguments.get_flag("flamegraph"),
    }
}

fn bench_args(arguments: ArgMatches) -> BenchArgs {
    BenchArgs {
        datadir: arguments
            .get_one::<PathBuf>("data_dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        outputpath: arguments
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
        sizes: arguments
            .get_many::<usize>("sizes")
            .map(|sizes| sizes.copied().collect()),
        generate: arguments.get_flag("generate"),
        seed: arguments.get_one::<u64>("seed").copied().unwrap_or(42),
        write_sorted: arguments.get_flag("write_sorted"),
        flamegraph: arguments.get_flag("flamegraph"),
    }
}

#[test]
fn plot_defaults() {
    let args = plot_args(plot_command().get_matches_from(["plot"]));
    assert_eq!(args.inputpath, PathBuf::from("time_sorts.txt"));
    assert_eq!(args.outputpath, PathBuf::from("time_graphics.png"));
    assert!(args.save);
    assert!(!args.show && !args.print && !args.flamegraph);
    assert_eq!(args.dpi, 300);
}

#[test]
fn plot_display_only_variant() {
    let args = plot_args(plot_command().get_matches_from(["plot", "times.txt", "-p", "-n", "-s"]));
    assert_eq!(args.inputpath, PathBuf::from("times.txt"));
    assert!(args.print && !args.save && args.show);
}

#[test]
fn show_help_mentions_default() {
    let help = plot_command().render_help().to_string();
    assert!(help.contains("not opened by default"));
}

#[test]
fn plot_rejects_silly_dpi() {
    assert!(plot_command()
        .try_get_matches_from(["plot", "--dpi", "0"])
        .is_err());
}

#[test]
fn bench_sizes_are_comma_separated() {
    let args = bench_args(bench_command().get_matches_from([
        "cputime", "--sizes", "100,500,1000", "-g", "--seed", "7",
    ]));
    assert_eq!(args.sizes, Some(vec![100, 500, 1000]));
    assert!(args.generate);
    assert_eq!(args.seed, 7);
    assert_eq!(args.outputpath, PathBuf::from("time_sorts.txt"));
}

#[test]
fn bench_without_sizes() {
    let args = bench_args(bench_command().get_matches_from(["cputime", "-d", "data"]));
    assert_eq!(args.sizes, None);
    assert_eq!(args.datadir, PathBuf::from("data"));
    assert!(!args.write_sorted);
}
