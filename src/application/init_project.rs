//! Project initialization use case

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::application::{ApplicationError, write_metadata};
use crate::core::GlobalConfig;
use crate::generation::containment::is_strictly_within;
use crate::generation::sanitizers::{DIR_REPLACEMENT, sanitize_name};
use crate::generation::{
    Materializer, Mode, Outcome, OutcomeSummary, OutputService, VariableInputs, VariableSet,
};
use crate::infrastructure::output::FileSystemOutputService;
use crate::infrastructure::templates::TemplateRepository;

/// Parameters of one `init` invocation
#[derive(Debug, Clone, Default)]
pub struct InitRequest {
    pub project_name: String,
    pub template: String,
    pub target: Option<String>,
    pub your_ip: Option<String>,
    /// `--var key=value` pairs
    pub overrides: BTreeMap<String, String>,
    pub force: bool,
    pub dry_run: bool,
    /// Skip the overwrite confirmation
    pub assume_yes: bool,
}

impl InitRequest {
    pub fn new(project_name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            template: template.into(),
            ..Default::default()
        }
    }

    /// Reject names that are empty, absolute or path-like.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let name = self.project_name.as_str();
        if name.trim().is_empty()
            || Path::new(name).is_absolute()
            || ["..", "/", "\\"].iter().any(|p| name.contains(p))
        {
            return Err(ApplicationError::InvalidProjectName(name.to_string()));
        }
        Ok(())
    }
}

/// What an `init` invocation did, or would do in a dry run
#[derive(Debug)]
pub struct InitReport {
    pub project_path: PathBuf,
    pub mode: Mode,
    /// The project directory existed before this run
    pub existed: bool,
    pub variables: VariableSet,
    pub outcomes: Vec<Outcome>,
    pub metadata_path: Option<PathBuf>,
    pub metadata_error: Option<String>,
}

impl InitReport {
    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary::from_outcomes(&self.outcomes)
    }
}

/// Use case creating a project directory from a template
pub struct InitProjectUseCase<R: TemplateRepository, O: OutputService = FileSystemOutputService> {
    repository: R,
    config: GlobalConfig,
    output: O,
}

impl<R: TemplateRepository> InitProjectUseCase<R> {
    pub fn new(repository: R, config: GlobalConfig) -> Self {
        Self::with_output(repository, config, FileSystemOutputService::new())
    }
}

impl<R: TemplateRepository, O: OutputService> InitProjectUseCase<R, O> {
    pub fn with_output(repository: R, config: GlobalConfig, output: O) -> Self {
        Self {
            repository,
            config,
            output,
        }
    }

    /// Run `request` inside `cwd`.
    ///
    /// `confirm` is asked before an existing project directory is removed,
    /// unless the request already carries `assume_yes`. Nothing on disk is
    /// touched before the template has been loaded and validated.
    pub fn execute(
        &self,
        request: &InitRequest,
        cwd: &Path,
        confirm: impl FnOnce(&Path) -> bool,
    ) -> Result<InitReport, ApplicationError> {
        request.validate()?;

        let template = self.repository.load(&request.template)?;
        debug!(template = %request.template, "Loaded template");

        let inputs = VariableInputs {
            target: request.target.clone(),
            your_ip: request.your_ip.clone(),
            overrides: request.overrides.clone(),
            ..VariableInputs::new(request.project_name.clone())
        };
        let variables = VariableSet::build(&inputs, &template.variables, &self.config);

        let project_path = cwd.join(sanitize_name(&request.project_name, DIR_REPLACEMENT));
        if !is_strictly_within(cwd, &project_path) {
            return Err(ApplicationError::InvalidProjectName(
                request.project_name.clone(),
            ));
        }

        let mode = Mode::from_dry_run(request.dry_run);
        let existed = project_path.exists() || project_path.is_symlink();
        if existed && !mode.is_dry_run() {
            if !request.force {
                return Err(ApplicationError::ProjectExists(project_path));
            }
            if !request.assume_yes && !confirm(&project_path) {
                return Err(ApplicationError::Cancelled);
            }
            remove_existing(&project_path)?;
            info!(path = %project_path.display(), "Removed existing project directory");
        }

        if !mode.is_dry_run() {
            self.output.ensure_directory(&project_path)?;
        }

        let materializer = Materializer::new(&self.output, &variables, mode);
        let mut outcomes = materializer.structure(&project_path, &template.structure);
        outcomes.extend(materializer.files(&project_path, &template.global_files));

        let mut report = InitReport {
            project_path,
            mode,
            existed,
            variables,
            outcomes,
            metadata_path: None,
            metadata_error: None,
        };

        if !mode.is_dry_run() {
            match write_metadata(&report.project_path, &report.variables, &request.template) {
                Ok(path) => report.metadata_path = Some(path),
                Err(e) => {
                    warn!(path = %report.project_path.display(), error = %e, "Failed to save project metadata");
                    report.metadata_error = Some(e.to_string());
                }
            }
        }

        Ok(report)
    }
}

fn remove_existing(path: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
