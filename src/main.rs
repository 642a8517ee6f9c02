use clap::{Parser, Subcommand};
use crop_review::{config, output, policy, server};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flag for commands that read the config file.
#[derive(clap::Args, Clone)]
struct ConfigArgs {
    /// Config file (default: ./crop-review.toml if present)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "crop-review")]
#[command(about = "Image crop service with a human review queue")]
#[command(long_about = "\
Image crop service with a human review queue

Uploaded images are resized to a named preset (or a custom box) and held
as pending crops. A reviewer approves or rejects each one; approved crops
stay available under /cropped until deleted.

  POST   /upload              multipart: image, cropType, customWidth, customHeight
  GET    /api/pending         crops awaiting review
  GET    /api/approved        approved crops
  GET    /api/presets         preset table
  POST   /api/approve/{id}    pending → approved (source upload removed)
  POST   /api/reject/{id}     pending → gone (both files removed)
  DELETE /api/delete/{id}     approved → gone (crop removed)

Jobs live in memory; restarting the server forgets them.

Run 'crop-review gen-config' to generate a documented crop-review.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        config: ConfigArgs,
        /// Override the listen address from the config file
        #[arg(long)]
        bind: Option<String>,
    },
    /// List crop presets
    Presets,
    /// Print a stock crop-review.toml with all options documented
    GenConfig,
    /// Load and validate the config without starting the server
    Check(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, bind } => {
            init_tracing();
            let mut service_config = config::load_config(config.config.as_deref())?;
            if let Some(bind) = bind {
                service_config.server.bind = bind;
                service_config.validate()?;
            }
            server::serve(&service_config).await?;
        }
        Command::Presets => {
            output::print_presets(&policy::presets());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Check(args) => {
            let service_config = config::load_config(args.config.as_deref())?;
            let source = config_source(args.config.as_deref());
            output::print_config_summary(&service_config, source.as_deref());
        }
    }

    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The file `load_config` actually read, if any.
fn config_source(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Path::new(config::DEFAULT_CONFIG_FILE);
            default.exists().then(|| default.to_path_buf())
        }
    }
}
