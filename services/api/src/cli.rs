use crate::infra::{load_lead, InMemoryLeadStore};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_intake::config::AppConfig;
use lead_intake::error::AppError;
use lead_intake::workflows::leads::{GateConfig, LeadIntakeService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Intake",
    about = "Score solar leads and run the lead intake webhook service",
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
    /// Score a single lead payload and print the assessment as JSON
    Score(ScoreArgs),
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

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding the lead object, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub(crate) input: PathBuf,
    /// Reject leads outside California regardless of GATE_CA_ONLY
    #[arg(long)]
    pub(crate) ca_only: bool,
    /// Reject leads outside Kern County regardless of GATE_KERN_ONLY
    #[arg(long)]
    pub(crate) kern_only: bool,
}

impl ScoreArgs {
    fn gates(&self, configured: GateConfig) -> GateConfig {
        GateConfig {
            require_california: self.ca_only.then_some(true).or(configured.require_california),
            require_kern_county: self.kern_only.then_some(true).or(configured.require_kern_county),
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
    }
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let gates = args.gates(config.gates);
    let lead = load_lead(&args.input)?;

    let service = LeadIntakeService::new(Arc::new(InMemoryLeadStore::default()), gates);
    let assessment = service.assess(&lead);

    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_serve() {
        let cli = Cli::try_parse_from(["lead-intake-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_flags_force_gates_on() {
        let cli = Cli::try_parse_from([
            "lead-intake-api",
            "score",
            "--input",
            "lead.json",
            "--kern-only",
        ])
        .expect("parses");
        let Some(Command::Score(args)) = cli.command else {
            panic!("expected score command");
        };

        let gates = args.gates(GateConfig {
            require_california: Some(false),
            require_kern_county: Some(false),
        });

        assert_eq!(args.input, PathBuf::from("lead.json"));
        assert_eq!(gates.require_california, Some(false));
        assert_eq!(gates.require_kern_county, Some(true));
    }
}
