//! External SCIP solver.
//!
//! The model is written to `<base>.lp`, SCIP is run as
//!
//! ```text
//! scip [-q] -l <base>.log -c "read \"<base>.lp\"" -c "optimize" -c "display solution" -c "quit"
//! ```
//!
//! and the solution listing is scraped from `<base>.log`. By default both files live
//! in a fresh temporary directory that is removed afterwards, including when SCIP
//! fails; [`ScipConfig::keep_lp`] / [`ScipConfig::keep_log`] opt out.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info, warn};
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::model::Model;
use crate::solver::{Assignment, Outcome, Solver};

/// Environment variable naming the SCIP executable, read by [`ScipConfig::from_env`].
pub const SCIP_BIN_ENV: &str = "SCIP_BIN";

const STATUS_OPTIMAL: &str = "optimal solution found";
const STATUS_INFEASIBLE: &str = "infeasible";

#[derive(Debug, Clone)]
pub struct ScipConfig {
    /// SCIP executable (default: `scip`, looked up in `PATH`).
    pub program: PathBuf,
    /// Stream SCIP's progress output instead of passing `-q`.
    pub verbose: bool,
    /// Keep the `.lp` file after solving.
    pub keep_lp: bool,
    /// Keep the `.log` file after solving, e.g. to inspect an infeasible run.
    pub keep_log: bool,
    /// Base path of the artifacts, without extension.
    /// Default: `circuit` inside a fresh temporary directory.
    pub basename: Option<PathBuf>,
    /// Time limit in seconds.
    pub time_limit: Option<f64>,
}

impl Default for ScipConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("scip"),
            verbose: false,
            keep_lp: false,
            keep_log: false,
            basename: None,
            time_limit: None,
        }
    }
}

impl ScipConfig {
    /// Default configuration, with the executable taken from `$SCIP_BIN` if set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(program) = std::env::var_os(SCIP_BIN_ENV) {
            config.program = PathBuf::from(program);
        }
        config
    }
}

#[derive(Debug, Default)]
pub struct Scip {
    config: ScipConfig,
}

impl Scip {
    pub fn new(config: ScipConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScipConfig {
        &self.config
    }

    fn command(&self, artifacts: &Artifacts) -> Command {
        let mut cmd = Command::new(&self.config.program);
        if !self.config.verbose {
            cmd.arg("-q");
            cmd.stdout(Stdio::null());
        }
        cmd.arg("-l").arg(&artifacts.log);
        if let Some(seconds) = self.config.time_limit {
            cmd.arg("-c").arg(format!("set limits time {}", seconds));
        }
        // SCIP's shell splits words on spaces unless they are quoted.
        cmd.arg("-c").arg(format!("read \"{}\"", artifacts.lp.display()));
        cmd.arg("-c").arg("optimize");
        cmd.arg("-c").arg("display solution");
        cmd.arg("-c").arg("quit");
        cmd
    }
}

impl Solver for Scip {
    fn solve(&mut self, model: &Model) -> Result<Outcome> {
        let artifacts = Artifacts::new(&self.config)?;
        artifacts.remove_stale_log()?;

        std::fs::write(&artifacts.lp, model.to_lp()?)?;
        debug!("wrote model to {}", artifacts.lp.display());

        let mut cmd = self.command(&artifacts);
        info!("running {:?}", cmd);
        let status = cmd.status().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => Error::SolverNotFound(self.config.program.clone()),
            _ => Error::Io(e),
        })?;
        if !status.success() {
            return Err(Error::SolverFailed(status));
        }

        let text = match std::fs::read_to_string(&artifacts.log) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::MissingLog(artifacts.log.clone())),
            Err(e) => return Err(Error::Io(e)),
        };
        parse_scip_log(&text)
    }
}

/// Reads the outcome of a SCIP run from its log.
///
/// ```text
/// SCIP Status        : problem is solved [optimal solution found]
/// ...
/// objective value:                                    7
/// u.3.1                                               1   (obj:1)
/// v.1.2                                               1   (obj:1)
/// ```
///
/// Only the statuses `[optimal solution found]` and `[infeasible]` are conclusive;
/// any other status (time or node limit, interrupt) or a log without a status is
/// [`Error::SolverIncomplete`]. SCIP lists only nonzero variables. Listing lines that
/// carry an `(obj:c)` annotation but cannot be read are skipped with a warning.
pub fn parse_scip_log(text: &str) -> Result<Outcome> {
    let mut status: Option<&str> = None;
    let mut objective: Option<f64> = None;
    let mut values = BTreeMap::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("SCIP Status") {
            status = rest
                .rsplit_once('[')
                .and_then(|(_, tail)| tail.split_once(']'))
                .map(|(status, _)| status.trim());
            if status.is_none() {
                warn!("unreadable status line: {:?}", line);
            }
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("objective value:") {
            match rest.trim().parse::<f64>() {
                Ok(value) => objective = Some(value),
                Err(_) => warn!("unreadable objective line: {:?}", line),
            }
            continue;
        }
        if objective.is_none() {
            continue;
        }
        if let Some((name, value)) = solution_entry(line) {
            values.insert(name.to_string(), value);
        }
    }

    match (status, objective) {
        (Some(STATUS_INFEASIBLE), _) => Ok(Outcome::Infeasible),
        (Some(STATUS_OPTIMAL), Some(objective)) => Ok(Outcome::Optimal(Assignment::new(values, objective.round() as i64))),
        (Some(STATUS_OPTIMAL), None) => Err(Error::SolverIncomplete(
            "optimal status without a solution listing".to_string(),
        )),
        (Some(other), _) => Err(Error::SolverIncomplete(other.to_string())),
        (None, _) => Err(Error::SolverIncomplete("no SCIP status in log".to_string())),
    }
}

fn is_annotation(token: &str) -> bool {
    token.starts_with("(obj:") && token.ends_with(')')
}

/// One `name value (obj:c)` line of a solution listing.
fn solution_entry(line: &str) -> Option<(&str, bool)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        &[name, value, annotation] if is_annotation(annotation) => match value.parse::<f64>() {
            Ok(value) => Some((name, value.round() == 1.0)),
            Err(_) => {
                warn!("skipping solution line with bad value: {:?}", line);
                None
            }
        },
        tokens if tokens.last().is_some_and(|token| is_annotation(token)) => {
            warn!("skipping malformed solution line: {:?}", line);
            None
        }
        _ => None,
    }
}

/// Model and log files of one solver run, removed on drop unless kept.
struct Artifacts {
    /// Owns the files unless the caller chose a base name.
    dir: Option<TempDir>,
    lp: PathBuf,
    log: PathBuf,
    keep_lp: bool,
    keep_log: bool,
}

impl Artifacts {
    fn new(config: &ScipConfig) -> std::io::Result<Self> {
        let (dir, base) = match &config.basename {
            Some(base) => (None, base.clone()),
            None => {
                let dir = tempfile::Builder::new().prefix("circuit-").tempdir()?;
                let base = dir.path().join("circuit");
                (Some(dir), base)
            }
        };
        Ok(Self {
            dir,
            lp: with_suffix(&base, "lp"),
            log: with_suffix(&base, "log"),
            keep_lp: config.keep_lp,
            keep_log: config.keep_log,
        })
    }

    /// SCIP appends to an existing log.
    fn remove_stale_log(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.log) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        for (path, keep) in [(&self.lp, self.keep_lp), (&self.log, self.keep_log)] {
            if keep {
                debug!("keeping {}", path.display());
            } else if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != ErrorKind::NotFound {
                    warn!("could not remove {}: {}", path.display(), e);
                }
            }
        }
        if self.keep_lp || self.keep_log {
            if let Some(dir) = self.dir.take() {
                let path = dir.keep();
                debug!("keeping directory {}", path.display());
            }
        }
    }
}

/// `circuit` -> `circuit.lp`; a trailing `.lp` on the base is dropped.
fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let base = match base.extension() {
        Some(ext) if ext == "lp" => base.with_extension(""),
        _ => base.to_path_buf(),
    };
    let mut name = base.into_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
