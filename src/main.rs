use clap::{Parser, Subcommand};
use exif_gallery::config::{self, ErrorPolicy};
use exif_gallery::{gallery, output, scan};
use std::path::PathBuf;
use std::sync::mpsc;

/// Flags for the build command.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Leave photos that fail out of the manifests instead of aborting
    #[arg(long)]
    keep_going: bool,
}

#[derive(Parser)]
#[command(name = "exif-gallery")]
#[command(about = "Web-ready photo gallery with EXIF-derived captions")]
#[command(long_about = "\
Web-ready photo gallery with EXIF-derived captions

Every *.jpg under the source directory (except files whose name contains
\"thumbnail\") becomes a gallery photo. For each photo a thumbnail is written
next to it, and a caption is built from its EXIF block:

  Shot with Supercam x on Jun 15 2021 (1/256 sec; f/4.0 50 mm; ISO 400)

Outputs:

  resources/vacation/img1.jpg            # source (untouched)
  resources/vacation/img1_thumbnail.jpg  # fits 600x800
  scripts/photo_list.js                  # photos = [{src, w, h, title}, ...]
  scripts/thumbnail_list.js              # thumbnails = [...]

Settings live in <source>/config.toml.
Run 'exif-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source photo directory
    #[arg(long, default_value = "resources", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write thumbnails and both manifests
    Build(BuildArgs),
    /// Validate every photo's metadata and print captions, writing nothing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(build_args) => {
            let config = config::load_config(&cli.source)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let sources = scan::scan(&cli.source)?;
            output::print_scan_output(&sources, &cli.source);

            println!("==> Stage 2: Building gallery");
            init_thread_pool(&config.processing);
            let mut options = gallery::BuildOptions::from_config(&config);
            if build_args.keep_going {
                options.on_error = ErrorPolicy::Skip;
            }
            let (tx, rx) = mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_gallery_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = gallery::generate(&sources, &options, &config.output, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let result = result?;

            println!("==> Stage 3: Manifests");
            output::print_manifest_output(&result, &config.output);

            println!("==> Build complete: {} photos", result.manifest.len());
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let sources = scan::scan(&cli.source)?;
            init_thread_pool(&config.processing);
            let options = gallery::BuildOptions {
                on_error: ErrorPolicy::Skip,
                write_thumbnails: false,
                ..gallery::BuildOptions::from_config(&config)
            };
            let result = gallery::build(&sources, &options, None)?;
            output::print_check_output(&result);
            if !result.skipped.is_empty() {
                return Err(format!("{} photo(s) have invalid metadata", result.skipped.len()).into());
            }
            println!("==> All {} photos are valid", result.records.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
