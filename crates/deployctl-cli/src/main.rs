//! deployctl - command line client for the deployment server.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use deployctl_cli::config::Config;
use deployctl_cli::input::task_ids_from_args_and_stdin;
use deployctl_cli::wait::{
    ProgressRenderer, TaskWaiter, WaitRequest, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT,
};
use deployctl_client::HttpClient;

/// deployctl - Deployment server client
#[derive(Parser)]
#[command(name = "deployctl")]
#[command(about = "CLI for the deployment server", long_about = None)]
struct Cli {
    /// Server URL (defaults to $DEPLOYCTL_HOST)
    #[arg(long, global = true)]
    server: Option<String>,

    /// API key (defaults to $DEPLOYCTL_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Space to work in (defaults to $DEPLOYCTL_SPACE)
    #[arg(long, global = true)]
    space: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with server tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Wait for task(s) to finish
    Wait(WaitArgs),
}

#[derive(Args)]
struct WaitArgs {
    /// Task IDs to wait for; more can be piped on stdin, one per line
    task_ids: Vec<String>,

    /// Duration to wait (in seconds) before stopping execution
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Seconds between status checks
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    poll_interval: u64,

    /// Cancel tasks still running when the timeout is reached
    #[arg(long)]
    cancel_on_timeout: bool,

    /// Show detailed progress of the task (single task only)
    #[arg(long)]
    progress: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Task {
            command: TaskCommands::Wait(args),
        } => {
            let config = Config::resolve(cli.server, cli.api_key, cli.space)?;
            wait(config, args).await
        }
    }
}

async fn wait(config: Config, args: WaitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let task_ids = task_ids_from_args_and_stdin(&args.task_ids)?;
    let request = WaitRequest::new(task_ids)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_poll_interval(Duration::from_secs(args.poll_interval))
        .with_cancel_on_timeout(args.cancel_on_timeout)
        .with_progress(args.progress);

    debug!(
        server = %config.server_url,
        space = config.space.as_deref().unwrap_or("default"),
        tasks = request.task_ids().len(),
        "Starting task wait"
    );

    let client = HttpClient::new(&config.server_url, config.api_key, config.space)?;
    let renderer = ProgressRenderer::stdout();
    colored::control::set_override(renderer.color_enabled());

    let waiter = TaskWaiter::new(Arc::new(client), renderer);
    waiter.wait(&request).await?;
    Ok(())
}
