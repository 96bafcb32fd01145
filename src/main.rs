//! penlab CLI entrypoint
//! Parses command-line arguments and dispatches to the application use cases.
#![deny(unsafe_code)]
mod ui;

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use penlab::application::{
    ApplicationError, ImportTemplateUseCase, InitProjectUseCase, InitRequest,
    ListTemplatesUseCase, ShowTemplateUseCase, discover_projects, read_metadata,
};
use penlab::core::{GlobalConfig, PenlabPaths};
use penlab::infrastructure::templates::FileSystemTemplateRepository;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use console::Term;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const FALLBACK_TEMPLATE: &str = "default";

#[derive(Parser)]
#[command(name = "penlab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Create a new project from a template
    Init {
        /// Project name, created as a directory under the current directory
        project_name: String,
        /// Template to use (defaults to `default_template` from the config)
        #[arg(short, long)]
        template: Option<String>,
        /// Target IP or domain
        #[arg(long)]
        target: Option<String>,
        /// Attacker IP
        #[arg(long)]
        your_ip: Option<String>,
        /// Extra template variable, may be repeated
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
        /// Overwrite an existing project directory
        #[arg(long)]
        force: bool,
        /// Show what would be created without touching the filesystem
        #[arg(long)]
        dry_run: bool,
        /// Do not ask before overwriting
        #[arg(short, long)]
        yes: bool,
    },
    /// Manage installed templates
    Templates {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Show or change the global configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// List penlab projects in the current directory
    #[command(name = "list-projects")]
    ListProjects,
    /// Show the metadata of a project
    Info {
        /// Project directory
        project: PathBuf,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum TemplateCommands {
    /// List installed templates
    List,
    /// Show details of one template
    Show {
        /// Template name, without extension
        name: String,
    },
    /// Validate a template file and install it
    Import {
        /// Path to the YAML template
        file: PathBuf,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print every configuration key
    Show,
    /// Set one configuration key
    Set { key: String, value: String },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout is reserved for command output
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths = PenlabPaths::from_env().context("Failed to resolve the penlab home directory")?;
    debug!(home = %paths.home.display(), "Using penlab home");

    match cli.command {
        Commands::Init {
            project_name,
            template,
            target,
            your_ip,
            vars,
            force,
            dry_run,
            yes,
        } => {
            let request = InitRequest {
                project_name,
                template: template.unwrap_or_default(),
                target,
                your_ip,
                overrides: vars.into_iter().collect::<BTreeMap<_, _>>(),
                force,
                dry_run,
                assume_yes: yes,
            };
            run_init(&paths, request)
        }
        Commands::Templates { action } => run_templates(&paths, action),
        Commands::Config { action } => run_config(&paths, action),
        Commands::ListProjects => run_list_projects(),
        Commands::Info { project } => run_info(&project),
    }
}

/// Parse a `KEY=VALUE` pair
fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{raw}\""))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in \"{raw}\""));
    }
    Ok((key.to_string(), value.to_string()))
}

fn current_dir() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("Failed to read the current directory")
}

/// Print template validation errors, or hand any other error back
fn report_template_error(heading: &str, error: ApplicationError) -> anyhow::Result<ExitCode> {
    if error.validation_errors().is_empty() {
        return Err(error.into());
    }
    eprintln!("{}", ui::validation_errors(heading, error.validation_errors()));
    Ok(ExitCode::FAILURE)
}

fn run_init(paths: &PenlabPaths, mut request: InitRequest) -> anyhow::Result<ExitCode> {
    let config = GlobalConfig::load(paths).context("Failed to load configuration")?;
    if request.template.is_empty() {
        request.template = config
            .get("default_template")
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_TEMPLATE.to_string());
    }
    info!(project = %request.project_name, template = %request.template, "Initializing project");

    let cwd = current_dir()?;
    let use_case =
        InitProjectUseCase::new(FileSystemTemplateRepository::new(&paths.templates_dir), config);

    if request.dry_run {
        println!("{}", ui::warning("Dry run: no files will be created"));
    }

    let report = match use_case.execute(&request, &cwd, confirm_overwrite) {
        Ok(report) => report,
        Err(ApplicationError::Cancelled) => {
            println!("{}", ui::warning("Operation cancelled"));
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            let heading = format!("Template \"{}\" is invalid:", request.template);
            return report_template_error(&heading, e);
        }
    };

    println!(
        "Project: {}\nTemplate: {}\n",
        request.project_name, request.template
    );
    if !report.outcomes.is_empty() {
        println!(
            "{}",
            ui::outcome_tree(&report.project_path, &report.outcomes)
        );
        println!();
    }
    println!("{}", ui::init_summary(&report));

    if report.summary().failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Ask on the terminal before an existing project is removed; anything but
/// an explicit yes declines.
fn confirm_overwrite(path: &Path) -> bool {
    let term = Term::stderr();
    let prompt = format!(
        "{}\n  {}\nContinue? [y/N] ",
        ui::warning("This will delete the existing directory:"),
        path.display()
    );
    if term.write_str(&prompt).is_err() {
        return false;
    }
    match term.read_line() {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn run_templates(paths: &PenlabPaths, action: TemplateCommands) -> anyhow::Result<ExitCode> {
    paths
        .ensure_structure()
        .context("Failed to prepare the penlab home directory")?;
    let repository = FileSystemTemplateRepository::new(&paths.templates_dir);

    match action {
        TemplateCommands::List => {
            let output = ListTemplatesUseCase::new(repository)
                .execute()
                .context("Failed to list templates")?;
            print!("{output}");
        }
        TemplateCommands::Show { name } => {
            match ShowTemplateUseCase::new(repository).execute(&name) {
                Ok(output) => print!("{output}"),
                Err(e) => {
                    let heading = format!("Template \"{name}\" is invalid:");
                    return report_template_error(&heading, e);
                }
            }
        }
        TemplateCommands::Import { file } => {
            match ImportTemplateUseCase::new(repository).execute(&file) {
                Ok((_, message)) => println!("{}", ui::success(message.trim_end())),
                Err(e) => {
                    let heading = format!("Template \"{}\" is invalid:", file.display());
                    return report_template_error(&heading, e);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_config(paths: &PenlabPaths, action: ConfigCommands) -> anyhow::Result<ExitCode> {
    let mut config = GlobalConfig::load(paths).context("Failed to load configuration")?;

    match action {
        ConfigCommands::Show => {
            println!("Configuration ({})", paths.config_file.display());
            for (key, value) in config.entries() {
                println!("  {key}: {value}");
            }
        }
        ConfigCommands::Set { key, value } => {
            config.set(key.as_str(), value.as_str());
            config
                .save(&paths.config_file)
                .context("Failed to save configuration")?;
            println!("{}", ui::success(&format!("{key} = {value}")));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_list_projects() -> anyhow::Result<ExitCode> {
    let cwd = current_dir()?;
    let projects = discover_projects(&cwd).context("Failed to scan for projects")?;

    if projects.is_empty() {
        println!("{}", ui::warning("No penlab projects found in this directory"));
    } else {
        println!("{}", ui::project_table(&projects));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_info(project: &Path) -> anyhow::Result<ExitCode> {
    let project_dir = current_dir()?.join(project);

    match read_metadata(&project_dir) {
        Ok(metadata) => {
            println!("{}", ui::project_panel(&metadata));
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ ApplicationError::MetadataNotFound(_)) => {
            eprintln!("{}", ui::failure(&e.to_string()));
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("Failed to read project metadata"),
    }
}
