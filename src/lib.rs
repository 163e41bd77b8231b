//! coco-regroup: consolidate fine-grained COCO categories into coarser ones.
//!
//! A curator picks a named grouping policy; every source category whose
//! name the policy lists is folded into one of the policy's targets,
//! annotations are rewritten accordingly, and whatever the policy does not
//! cover (annotations of unlisted categories, images left without
//! annotations) is dropped. The result is a self-consistent dataset whose
//! categories are exactly the policy's targets.
//!
//! # Modules
//!
//! - [`ir`]: Dataset types and the COCO JSON reader/writer
//! - [`policy`]: Grouping policies and the registry that names them
//! - [`regroup`]: The resolve / filter / assemble pipeline and its report
//! - [`error`]: Error types for coco-regroup operations

pub mod error;
pub mod ir;
pub mod policy;
pub mod regroup;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};

pub use error::RegroupError;

use policy::{PolicyRegistry, DEFAULT_POLICY};

/// The coco-regroup CLI application.
#[derive(Parser)]
#[command(name = "coco-regroup")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Regroup the categories of a dataset according to a policy.
    Regroup(RegroupArgs),
    /// List the registered policies and their targets.
    Policies(PoliciesArgs),
}

/// Arguments for the regroup subcommand.
#[derive(clap::Args)]
struct RegroupArgs {
    /// Folder containing the source dataset; the output is written there too.
    #[arg(long)]
    folder: PathBuf,

    /// Name of the grouping policy to apply.
    #[arg(
        long,
        visible_alias = "config",
        env = "COCO_REGROUP_POLICY",
        default_value = DEFAULT_POLICY
    )]
    policy: String,

    /// File name of the source dataset inside the folder.
    #[arg(long, default_value = "gyn1.json")]
    input_name: String,

    /// File name of the regrouped dataset inside the folder.
    #[arg(long, default_value = "dataset.json")]
    output_name: String,

    /// YAML or JSON file with extra policies, registered on top of the builtin ones.
    #[arg(long, env = "COCO_REGROUP_POLICY_FILE")]
    policy_file: Option<PathBuf>,

    /// Run the pipeline and print the report without writing the output.
    #[arg(long)]
    dry: bool,

    /// Format of the run report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Arguments for the policies subcommand.
#[derive(clap::Args)]
struct PoliciesArgs {
    /// YAML or JSON file with extra policies, registered on top of the builtin ones.
    #[arg(long, env = "COCO_REGROUP_POLICY_FILE")]
    policy_file: Option<PathBuf>,
}

/// Output format for the run report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Run the coco-regroup CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RegroupError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Regroup(args)) => run_regroup(args),
        Some(Commands::Policies(args)) => run_policies(args),
        None => {
            println!("coco-regroup {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Consolidate COCO categories with named grouping policies.");
            println!();
            println!("Run 'coco-regroup --help' for usage information.");
            Ok(())
        }
    }
}

fn load_registry(policy_file: Option<&Path>) -> Result<PolicyRegistry, RegroupError> {
    let registry = PolicyRegistry::builtin();
    match policy_file {
        Some(path) => registry.extend_from_file(path),
        None => Ok(registry),
    }
}

/// Execute the regroup subcommand.
fn run_regroup(args: RegroupArgs) -> Result<(), RegroupError> {
    let registry = load_registry(args.policy_file.as_deref())?;

    // Resolve before touching the dataset: an unknown policy must fail
    // without any dataset I/O.
    let policy = registry.resolve(&args.policy)?;

    let source = args.folder.join(&args.input_name);
    let destination = args.folder.join(&args.output_name);

    debug!("reading {}", source.display());
    let dataset = ir::io_coco_json::read_dataset(&source)?;

    let outcome = regroup::regroup_dataset(dataset, policy)?;

    if args.dry || args.report == ReportFormat::Json {
        print_report(&outcome.report, args.report)?;
    }

    if args.dry {
        info!("dry run, not writing {}", destination.display());
        return Ok(());
    }

    ir::io_coco_json::write_dataset(&destination, &outcome.dataset)?;
    if args.report == ReportFormat::Text {
        println!("Wrote {}", destination.display());
    }
    Ok(())
}

fn print_report(
    report: &regroup::RegroupReport,
    format: ReportFormat,
) -> Result<(), RegroupError> {
    match format {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).map_err(RegroupError::ReportSerialize)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Execute the policies subcommand.
fn run_policies(args: PoliciesArgs) -> Result<(), RegroupError> {
    let registry = load_registry(args.policy_file.as_deref())?;

    for policy in registry.iter() {
        match &policy.description {
            Some(description) => println!("{} - {}", policy.name, description),
            None => println!("{}", policy.name),
        }
        for target in &policy.targets {
            println!(
                "  {} {} ({}): {}",
                target.id,
                target.display_name,
                target.color,
                target.source_category_names.join(", ")
            );
        }
    }
    Ok(())
}
