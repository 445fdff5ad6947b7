use clap::{Parser, Subcommand};
use photos_sorter::config::{self, ProcessingConfig};
use photos_sorter::events::EventSink;
use photos_sorter::{output, process};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photos-sorter")]
#[command(about = "Copy or move photos, renamed to their capture time and resized")]
#[command(long_about = "\
Copy or move photos, renamed to their capture time and resized

Every entry of each SOURCE directory is handled on its own:

  directories                  skipped and reported
  images, --rename             named after EXIF DateTimeOriginal
                               (2021_05_01_10_00_00.jpg, then _2, _3, ...)
  images, --resize             longer side fitted to --bigger-length,
                               panoramas (2.4:1 or wider) left at full size
  everything else              copied or moved unchanged

Nothing is ever overwritten in the destination. Problems with single files
are reported and the batch carries on.

Run 'photos-sorter gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one or more source directories into a destination
    Run(RunArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Source directories, processed in the order given
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Destination directory
    #[arg(long)]
    dest: PathBuf,

    /// Config file (TOML); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Move files instead of copying them
    #[arg(long = "move", overrides_with = "copy")]
    move_files: bool,

    /// Copy files, even if the config file says to move
    #[arg(long, overrides_with = "move_files")]
    copy: bool,

    /// Rename images to their EXIF capture time
    #[arg(long, overrides_with = "no_rename")]
    rename: bool,

    /// Keep original names, even if the config file says to rename
    #[arg(long, overrides_with = "rename")]
    no_rename: bool,

    /// Resize images
    #[arg(long, overrides_with = "no_resize")]
    resize: bool,

    /// Keep original sizes, even if the config file says to resize
    #[arg(long, overrides_with = "resize")]
    no_resize: bool,

    /// Target length of the longer side when resizing
    #[arg(long)]
    bigger_length: Option<u32>,

    /// JPEG quality when resizing (1-95)
    #[arg(long)]
    quality: Option<u32>,

    /// Allow the destination to be one of the sources
    #[arg(long)]
    allow_same_dir: bool,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Show progress and debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl RunArgs {
    /// Config file (or defaults) with command-line flags applied on top.
    fn processing_config(&self) -> Result<ProcessingConfig, config::ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => ProcessingConfig::default(),
        };
        if let Some(move_files) = switch(self.move_files, self.copy) {
            config.move_files = move_files;
        }
        if let Some(rename) = switch(self.rename, self.no_rename) {
            config.rename_to_creation_date = rename;
        }
        if let Some(resize) = switch(self.resize, self.no_resize) {
            config.resize_images = resize;
        }
        if let Some(length) = self.bigger_length {
            config.resize_bigger_length = length;
        }
        if let Some(quality) = self.quality {
            config.resize_jpeg_quality = quality;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Value of an on/off flag pair, `None` when neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.processing_config()?;
    config::validate_directories(&args.sources, &args.dest, args.allow_same_dir)?;
    log::debug!("{config:?}");

    // The worker owns the batch; this thread only drains and prints events.
    let (sink, rx) = EventSink::channel();
    let sources = args.sources.clone();
    let dest = args.dest.clone();
    let worker =
        std::thread::spawn(move || process::process_dirs(&sources, &dest, &config, &sink));

    for event in rx {
        output::print_event(&event, args.json, args.verbose);
    }

    let summary = worker
        .join()
        .map_err(|_| "processing thread panicked")??;
    if !args.json {
        output::print_summary(&summary);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            init_logging(args.verbose);
            run(args)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
