use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use ecg_lib::{
    config::{AnalysisConfig, PlotConfig},
    detectors::ecg::run_analysis,
    error::{ConfigError, InputError},
    io::{
        csv as csv_io,
        manual::{EntryStatus, ManualEntry, SENTINEL},
    },
    plot::{figure_from_samples, PlotBackend, TextBackend},
    report::{render_report, write_report},
    signal::SampleSeries,
};
use log::{info, warn};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

mod plotting;

use plotting::PngBackend;

const EXIT_FAILURE: u8 = 1;
const EXIT_INPUT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(
    name = "ecg",
    version,
    about = "Estimate heart rate, variability and rhythm from a single-lead ECG recording"
)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "manual"])))]
struct Cli {
    /// CSV file with `time` (s) and `voltage` (mV) columns
    #[arg(long)]
    file: Option<PathBuf>,
    /// Type `time voltage` pairs on stdin, finishing with `done`
    #[arg(long)]
    manual: bool,
    /// TOML file with detector, report and plot settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Minimum R-peak voltage (mV)
    #[arg(long)]
    height: Option<f64>,
    /// Minimum distance between R-peaks (samples)
    #[arg(long)]
    min_distance: Option<usize>,
    /// Where to write the text report
    #[arg(long, conflicts_with = "no_report")]
    report: Option<PathBuf>,
    #[arg(long)]
    no_report: bool,
    /// Where to write the PNG plot
    #[arg(long, conflicts_with = "no_plot")]
    plot: Option<PathBuf>,
    #[arg(long)]
    no_plot: bool,
    /// Print the full analysis as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<InputError>().is_some() || err.downcast_ref::<ConfigError>().is_some()
    {
        EXIT_INPUT_ERROR
    } else {
        EXIT_FAILURE
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = load_config(cli)?;
    let series = load_series(cli)?;
    info!(
        "analyzing {} sample(s) spanning {:.3} s",
        series.len(),
        series.duration()
    );

    let analysis = run_analysis(&series, &cfg.detector).context("analysis failed")?;
    if cli.json {
        println!("{}", serde_json::to_string(&analysis)?);
    } else {
        print!("{}", render_report(&analysis.metrics));
    }

    if !cli.no_report {
        match write_report(&cfg.report.path, &analysis.metrics) {
            Ok(()) => eprintln!("Report saved to {}", cfg.report.path.display()),
            Err(err) => {
                warn!("report not written: {:#}", err);
                eprintln!("warning: {:#}", err);
            }
        }
    }
    if !cli.no_plot {
        // stdout must stay valid JSON under --json.
        if cli.json {
            render_plot(&series, &cfg.plot, io::stderr().lock());
        } else {
            render_plot(&series, &cfg.plot, io::stdout().lock());
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut cfg = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(height) = cli.height {
        cfg.detector.height = height;
    }
    if let Some(min_distance) = cli.min_distance {
        cfg.detector.min_distance = min_distance;
    }
    if let Some(path) = &cli.report {
        cfg.report.path = path.clone();
    }
    if let Some(path) = &cli.plot {
        cfg.plot.path = path.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load_series(cli: &Cli) -> Result<SampleSeries> {
    match &cli.file {
        Some(path) => csv_io::read_ecg_csv(path)
            .with_context(|| format!("error loading {}", path.display())),
        None => read_manual_entry(io::stdin().lock(), io::stderr()),
    }
}

/// Prompt for samples until the sentinel or end of input, re-prompting after bad lines.
fn read_manual_entry<R: BufRead, W: Write>(input: R, mut prompt: W) -> Result<SampleSeries> {
    let mut entry = ManualEntry::new();
    writeln!(
        prompt,
        "Enter samples as 'time voltage' (seconds, millivolts). Type '{}' to finish.",
        SENTINEL
    )?;
    let mut lines = input.lines();
    loop {
        write!(prompt, "> ")?;
        prompt.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("reading manual entry")?;
        match entry.push_line(&line) {
            Ok(EntryStatus::Finished) => break,
            Ok(_) => {}
            Err(err) => writeln!(prompt, "Invalid entry: {}. Please try again.", err)?,
        }
    }
    info!("collected {} sample(s) by hand", entry.len());
    Ok(entry.finish()?)
}

/// Write the PNG plot, or print the raw samples to `fallback` when rendering fails.
fn render_plot<W: Write>(series: &SampleSeries, cfg: &PlotConfig, fallback: W) {
    let fig = figure_from_samples(series, cfg.max_points);
    let mut png = PngBackend::new(&cfg.path, (cfg.width, cfg.height));
    match png.draw(&fig) {
        Ok(()) => eprintln!("Plot saved to {}", cfg.path.display()),
        Err(err) => {
            warn!("plot rendering failed: {:#}", err);
            eprintln!("warning: cannot render plot ({:#}); printing samples instead", err);
            let raw = figure_from_samples(series, series.len());
            let mut text = TextBackend::new(fallback);
            if let Err(err) = text.draw(&raw) {
                eprintln!("warning: {:#}", err);
            }
        }
    }
}
