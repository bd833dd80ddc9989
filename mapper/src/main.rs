use std::path::PathBuf;
use std::time::Instant;

use log::{error, info};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger,
    TermLogger, TerminalMode, WriteLogger,
};
use structopt::StructOpt;

use base::defs::{Error, ErrorKind::*, Result};
use base::util::fs;
use mapper::config::load_camera_mappings;
use mapper::observer::LogObserver;
use mapper::pipeline::{CameraOutcome, TextureMapper};

#[derive(StructOpt)]
#[structopt(about = "Texture a scanned mesh from several camera views")]
struct Opts {
    #[structopt(help = "Input .ply mesh")]
    input_mesh_path: PathBuf,

    #[structopt(help = "Camera configuration .json file")]
    config_path: PathBuf,

    #[structopt(help = "Output .glb file")]
    output_path: PathBuf,

    #[structopt(help = "Also write log into this file", long = "log")]
    log_path: Option<PathBuf>,

    #[structopt(help = "Log debug messages", long, short = "v")]
    verbose: bool,
}

fn init_logging(opts: &Opts) -> Result<()> {
    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &opts.log_path {
        let file = fs::create_file(path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }

    CombinedLogger::init(loggers).map_err(|e| {
        let desc = format!("failed to set up logging: {}", e);
        Error::new(IoError, desc)
    })
}

fn run(opts: &Opts) -> Result<()> {
    let cameras = load_camera_mappings(&opts.config_path)?;
    info!(
        "loaded {} camera(s) from '{}'",
        cameras.len(),
        opts.config_path.display()
    );

    let mapper =
        TextureMapper::new(&opts.input_mesh_path, cameras, &opts.output_path);
    let report = mapper.process(&mut LogObserver)?;

    let textured = report
        .cameras
        .iter()
        .filter(|c| matches!(c, CameraOutcome::Textured { .. }))
        .count();
    info!(
        "{} of {} camera(s) textured their region",
        textured,
        report.cameras.len()
    );

    Ok(())
}

fn run_timed(opts: &Opts) -> i32 {
    let started = Instant::now();
    let res = run(opts);
    let elapsed = started.elapsed();

    match res {
        Ok(()) => {
            info!("succeeded in {:.2?}", elapsed);
            0
        }
        Err(err) => {
            error!("{}", err);
            error!("failed in {:.2?}", elapsed);
            1
        }
    }
}

fn main() {
    let opts = Opts::from_args();

    if let Err(err) = init_logging(&opts) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }

    let code = run_timed(&opts);
    if code != 0 {
        std::process::exit(code);
    }
}
