use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quiz_block::protocol::DEFAULT_PORT;
use quiz_block::{ViewMode, client, logging, server};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Author a quiz task (teacher view)
    Edit(BlockArgs),
    /// Show a quiz task read-only (student view)
    View(BlockArgs),
    /// Host the assignment-task service
    Serve {
        /// JSON file holding the task records
        #[arg(short, long)]
        tasks: PathBuf,
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Bearer token clients must present
        #[arg(long, env = "QUIZ_BLOCK_TOKEN")]
        token: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BlockArgs {
    /// Task to open
    #[arg(long)]
    task: String,
    /// Assignment the task belongs to
    #[arg(long)]
    assignment: String,
    /// Task service host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Task service port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Access token sent with every request
    #[arg(long, env = "QUIZ_BLOCK_TOKEN")]
    token: Option<String>,
    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl BlockArgs {
    fn into_config(self, view: ViewMode) -> client::ClientConfig {
        client::ClientConfig {
            host: self.host,
            port: self.port,
            view,
            task_uuid: self.task,
            assignment_uuid: self.assignment,
            token: self.token,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Edit(args) => run_block(args, ViewMode::Teacher).await,
        Command::View(args) => run_block(args, ViewMode::Student).await,
        Command::Serve {
            tasks,
            port,
            token,
        } => {
            logging::init_stderr();
            server::run(port, tasks, token).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_block(args: BlockArgs, view: ViewMode) -> Result<(), Box<dyn std::error::Error>> {
    // The terminal UI owns stdout and stderr, so logs only go to a file.
    if let Some(path) = &args.log_file {
        logging::init_file(path)?;
    }
    client::run(args.into_config(view)).await
}
