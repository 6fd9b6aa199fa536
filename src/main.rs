use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use motmerge::reconcile::{self, ReconcilerConfig, DEFAULT_DELETION_ID_THRESHOLD};
use motmerge::{labelbox, rename};

#[derive(Parser)]
#[command(name = "motmerge")]
#[command(about = "Maintain and reconcile MOT-format object tracking annotations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge independently edited copies back into one annotation file
    Integrate {
        /// Original MOT file
        original: PathBuf,

        /// Folder of edited copies; files whose name contains the original's
        /// base name are used
        edits_dir: PathBuf,

        /// Output MOT file
        output: PathBuf,

        /// Dominant ids at or below this value count as deletion markers in a
        /// two-way split
        #[arg(long, default_value_t = DEFAULT_DELETION_ID_THRESHOLD)]
        deletion_threshold: i32,
    },

    /// Rewrite a set of object ids to one new id, saving an auto-numbered copy
    Rename {
        /// MOT file to edit
        input: PathBuf,

        /// Ids to replace, comma-separated
        #[arg(value_delimiter = ',', num_args = 1)]
        old_ids: Vec<i32>,

        /// Replacement id
        new_id: i32,

        /// Directory receiving the `{name}_valNN.txt` copy
        #[arg(long, default_value = "changed_mot")]
        output_dir: PathBuf,
    },

    /// Merge a Labelbox NDJSON export into a MOT file
    Import {
        /// NDJSON export from Labelbox
        ndjson: PathBuf,

        /// MOT file to update
        mot: PathBuf,

        /// Output MOT file
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("motmerge=info")
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> motmerge::Result<()> {
    match cli.command {
        Commands::Integrate {
            original,
            edits_dir,
            output,
            deletion_threshold,
        } => {
            let config = ReconcilerConfig {
                deletion_id_threshold: deletion_threshold,
            };
            let summary = reconcile::run(&original, &edits_dir, &output, config)?;
            info!(
                "reconciled {} records against {} edit sources; {} written to {}",
                summary.input_records,
                summary.edit_sources,
                summary.output_records,
                output.display()
            );
        }
        Commands::Rename {
            input,
            old_ids,
            new_id,
            output_dir,
        } => match rename::run(&input, &output_dir, &old_ids, new_id)? {
            Some(path) => info!(
                "ids {:?} renamed to {} and saved to {}",
                old_ids,
                new_id,
                path.display()
            ),
            None => info!("no record matched ids {:?}; nothing written", old_ids),
        },
        Commands::Import { ndjson, mot, output } => {
            labelbox::run(&ndjson, &mot, &output)?;
            info!("merged {} into {}", ndjson.display(), output.display());
        }
    }
    Ok(())
}
