use crate::demo::{
    run_demo, run_quality_analysis, run_usage_activity, run_usage_meter, run_usage_monthly,
    run_usage_summary, AnalyzeArgs, DemoArgs, UsageActivityArgs, UsageMeterArgs, UsageMonthlyArgs,
    UsageSummaryArgs,
};
use crate::server;
use aquaaid::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AquaAid Water Metrics Service",
    about = "Run the AquaAid water metrics engine and its HTTP service from the command line",
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
    /// Classify water samples against community safety thresholds
    Quality {
        #[command(subcommand)]
        command: QualityCommand,
    },
    /// One-shot consumption calculations and ledger summaries
    Usage {
        #[command(subcommand)]
        command: UsageCommand,
    },
    /// Run an end-to-end CLI demo covering the quality, usage, report, and advisor workflows
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum QualityCommand {
    /// Analyze one sample of sensor readings and print the verdict
    Analyze(AnalyzeArgs),
}

#[derive(Subcommand, Debug)]
enum UsageCommand {
    /// Convert a household activity and duration into liters
    Activity(UsageActivityArgs),
    /// Convert a pair of meter readings into liters and a bill
    Meter(UsageMeterArgs),
    /// Project an average daily volume over a billing month
    Monthly(UsageMonthlyArgs),
    /// Summarize a usage ledger CSV export by activity
    Summary(UsageSummaryArgs),
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
        Command::Quality {
            command: QualityCommand::Analyze(args),
        } => run_quality_analysis(args),
        Command::Usage { command } => match command {
            UsageCommand::Activity(args) => run_usage_activity(args),
            UsageCommand::Meter(args) => run_usage_meter(args),
            UsageCommand::Monthly(args) => run_usage_monthly(args),
            UsageCommand::Summary(args) => run_usage_summary(args),
        },
        Command::Demo(args) => run_demo(args).await,
    }
}
