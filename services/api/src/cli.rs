use crate::commands::{run_match, run_progress, run_slug, MatchArgs, ProgressArgs, SlugArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use skillbridge::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "skillbridge",
    about = "Course progress and job matching engine for the SkillBridge marketplace",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a course progress percentage from raw counts
    Progress(ProgressArgs),
    /// Rank a CSV candidate pool against a job's required skills
    Match(MatchArgs),
    /// Derive a collision-free catalog slug
    Slug(SlugArgs),
    /// Walk through enrollment, quizzes, completion and matching
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Progress(args) => run_progress(args),
        Command::Match(args) => run_match(args),
        Command::Slug(args) => run_slug(args),
        Command::Demo(args) => run_demo(args),
    }
}
