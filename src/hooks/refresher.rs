//! Desktop cache refresh
//!
//! Icon theme caches and compiled GSettings schemas are maintained by
//! external programs. [`CacheRefresher`] is the seam between the
//! post-install hook and those programs.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

/// Default icon cache tool
pub const ICON_CACHE_PROGRAM: &str = "gtk-update-icon-cache";

/// Default schema compiler
pub const SCHEMA_COMPILER_PROGRAM: &str = "glib-compile-schemas";

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Refreshes the caches that depend on installed data files
pub trait CacheRefresher {
    /// Rebuilds the icon theme cache for `dir` from scratch
    fn refresh_icon_cache(&self, dir: &Path) -> Result<(), RefreshError>;

    /// Compiles the GSettings schemas found in `dir`
    fn compile_schemas(&self, dir: &Path) -> Result<(), RefreshError>;
}

/// Runs the system cache tools as blocking subprocesses
#[derive(Debug, Clone)]
pub struct SystemCacheRefresher {
    icon_cache_program: OsString,
    schema_compiler_program: OsString,
}

impl SystemCacheRefresher {
    pub fn new() -> Self {
        Self {
            icon_cache_program: ICON_CACHE_PROGRAM.into(),
            schema_compiler_program: SCHEMA_COMPILER_PROGRAM.into(),
        }
    }

    /// Uses different executables for the two tools
    pub fn with_programs(icon_cache: impl Into<OsString>, schema_compiler: impl Into<OsString>) -> Self {
        Self {
            icon_cache_program: icon_cache.into(),
            schema_compiler_program: schema_compiler.into(),
        }
    }

    fn run(program: &OsString, command: &mut Command) -> Result<(), RefreshError> {
        let name = program.to_string_lossy().into_owned();
        let status = command.status().map_err(|source| RefreshError::Spawn {
            program: name.clone(),
            source,
        })?;

        if !status.success() {
            return Err(RefreshError::Failed { program: name, status });
        }

        Ok(())
    }
}

impl Default for SystemCacheRefresher {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheRefresher for SystemCacheRefresher {
    fn refresh_icon_cache(&self, dir: &Path) -> Result<(), RefreshError> {
        // -f: rebuild even if the cache is up to date, -t: no index.theme required
        Self::run(
            &self.icon_cache_program,
            Command::new(&self.icon_cache_program).arg("-f").arg("-t").arg(dir),
        )
    }

    fn compile_schemas(&self, dir: &Path) -> Result<(), RefreshError> {
        Self::run(
            &self.schema_compiler_program,
            Command::new(&self.schema_compiler_program).arg(dir),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_spawn_error() {
        let refresher = SystemCacheRefresher::with_programs(
            "build-aux-test-no-such-program",
            "build-aux-test-no-such-program",
        );

        let err = refresher.refresh_icon_cache(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, RefreshError::Spawn { .. }));
        assert!(err.to_string().contains("build-aux-test-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn successful_program_is_ok() {
        let refresher = SystemCacheRefresher::with_programs("true", "true");

        assert!(refresher.refresh_icon_cache(Path::new("/nonexistent")).is_ok());
        assert!(refresher.compile_schemas(Path::new("/nonexistent")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_status() {
        let refresher = SystemCacheRefresher::with_programs("false", "false");

        let err = refresher.compile_schemas(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, RefreshError::Failed { .. }));
    }
}
