//! CLI driver: extract telemetry from each input file in recording
//! order, build its GPS track, stitch the tracks onto one timeline,
//! and write `<output>.gpx` / `<output>.kml`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use time::OffsetDateTime;

use gopro2gpx::{gpx, kml, FFmpeg, Gpmf, GpmfError, GpsPoint, LogSink, Stitcher, TrackBuilder};

#[derive(Debug, Parser)]
#[command(name = "gopro2gpx", version, about = "Convert GPS telemetry in GoPro recordings to GPX/KML tracks")]
struct Args {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Inputs are raw GPMF metadata dumps, not videos
    #[arg(short, long)]
    binary: bool,
    /// Discard points recorded without GPS lock (GPSF=0)
    #[arg(short, long)]
    skip: bool,
    /// Write the extracted raw metadata to <FILE>.meta.bin
    #[arg(short, long)]
    dump: bool,
    /// Output base name; writes <OUTPUT>.gpx and <OUTPUT>.kml
    #[arg(short, long)]
    output: PathBuf,
    /// Video file(s) or raw metadata dump(s), in recording order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), GpmfError> {
    let ffmpeg = FFmpeg::default();
    let mut stitcher = Stitcher::new();

    for file in &args.files {
        // Per-file failures abort that file only, the batch continues.
        match process_file(&ffmpeg, file, args) {
            Ok(Some((points, start, end))) => stitcher.append(points, start, end),
            Ok(None) => log::warn!("No GPS info in {}", file.display()),
            Err(err) => log::warn!("Skipping {}: {err}", file.display()),
        }
    }

    if stitcher.is_empty() {
        return Err(GpmfError::NoPoints);
    }

    let name = args.output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gopro".to_owned());
    let total = stitcher.total_duration();
    let points = stitcher.into_points();

    let gpx_doc = gpx::generate_gpx(&points, &format!("gopro-track-{name}"))?;
    std::fs::write(args.output.with_extension("gpx"), gpx_doc)?;

    let kml_doc = kml::generate_kml(&points, &format!("gopro-track-{name}"));
    std::fs::write(args.output.with_extension("kml"), kml_doc)?;

    log::info!("Total duration: {total}");

    Ok(())
}

/// Decodes one input file into its point sequence and time range.
/// Returns `None` when the file decodes cleanly but contributes
/// no points.
fn process_file(
    ffmpeg: &FFmpeg,
    file: &Path,
    args: &Args,
) -> Result<Option<(Vec<GpsPoint>, OffsetDateTime, OffsetDateTime)>, GpmfError> {
    let gpmf = match args.binary {
        true => {
            log::debug!("Reading metadata binary file {}", file.display());
            Gpmf::from_path(file)?
        }
        false => {
            let raw = ffmpeg.extract_meta(file)?;
            if args.dump {
                let dump_file = format!("{}.meta.bin", file.display());
                log::info!("Creating output file for binary metadata: {dump_file}");
                std::fs::write(dump_file, &raw)?;
            }
            Gpmf::from_slice(&raw)?
        }
    };

    let mut sink = LogSink;
    let track = TrackBuilder::new(args.skip, &mut sink).build(&gpmf)?;
    if track.is_empty() {
        return Ok(None);
    }

    let (start, end) = match args.binary {
        // Dumps carry no container clock, the points themselves
        // bound the range.
        true => match track.time_range() {
            Some(range) => range,
            None => return Ok(None),
        },
        false => ffmpeg.time_range(file)?,
    };

    Ok(Some((track.points, start, end)))
}
