use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default job name, used to derive the report and table file names.
pub const DEFAULT_JOB_NAME: &str = "fio_zone_mixed_args";

/// Errors raised while building or overriding a [`WorkloadConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Override `{token}` is not of the form key=value")]
    MalformedOverride { token: String },
    #[error("Unknown override key `{key}`")]
    UnknownKey { key: String },
    #[error("Invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// A block size as understood by the engine, e.g. `4k` or `64k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSize(String);

impl FromStr for BlockSize {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim_end_matches(['k', 'K', 'm', 'M', 'g', 'G']);
        // at most one unit suffix
        if s.len() - digits.len() > 1 {
            return Err("expected a single unit suffix");
        }
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err("expected a number with an optional k/m/g suffix");
        }
        if digits.chars().all(|c| c == '0') {
            return Err("block size must be non-zero");
        }
        Ok(BlockSize(s.to_string()))
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The I/O engine the workload is rendered for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IoEngine {
    #[default]
    IoUring,
    /// The SPDK bdev fio plugin, rooted at a checkout containing `spdk/`.
    Spdk { root: PathBuf },
}

/// Keys accepted by [`WorkloadConfig::apply_overrides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKey {
    BlocksizeWrites,
    BlocksizeReads,
    MaxOpenZones,
    WriteIolog,
    Numjobs,
    SpdkPath,
}

impl FromStr for OverrideKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blocksize_writes" => Ok(OverrideKey::BlocksizeWrites),
            "blocksize_reads" => Ok(OverrideKey::BlocksizeReads),
            "max_open_zones" => Ok(OverrideKey::MaxOpenZones),
            "write_iolog" => Ok(OverrideKey::WriteIolog),
            "numjobs" => Ok(OverrideKey::Numjobs),
            "spdk_path" => Ok(OverrideKey::SpdkPath),
            _ => Err(ConfigError::UnknownKey { key: s.to_string() }),
        }
    }
}

impl fmt::Display for OverrideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideKey::BlocksizeWrites => write!(f, "blocksize_writes"),
            OverrideKey::BlocksizeReads => write!(f, "blocksize_reads"),
            OverrideKey::MaxOpenZones => write!(f, "max_open_zones"),
            OverrideKey::WriteIolog => write!(f, "write_iolog"),
            OverrideKey::Numjobs => write!(f, "numjobs"),
            OverrideKey::SpdkPath => write!(f, "spdk_path"),
        }
    }
}

/// Split a `key=value` token at the first `=`.
pub fn parse_override(token: &str) -> Result<(OverrideKey, &str), ConfigError> {
    let (key, value) = token
        .split_once('=')
        .ok_or_else(|| ConfigError::MalformedOverride {
            token: token.to_string(),
        })?;
    Ok((key.parse()?, value))
}

/// Configuration for one workload description.
///
/// Every field that can be changed from the command line is listed in [`OverrideKey`]. Anything
/// else is rejected rather than silently added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadConfig {
    pub job_name: String,
    pub blocksize_writes: BlockSize,
    pub blocksize_reads: BlockSize,
    pub max_open_zones: u32,
    /// Attach a per-phase `--write_iolog` path.
    pub write_iolog: bool,
    pub numjobs: u32,
    pub io_engine: IoEngine,
    pub result_dir: PathBuf,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            job_name: DEFAULT_JOB_NAME.to_string(),
            blocksize_writes: BlockSize("64k".to_string()),
            blocksize_reads: BlockSize("4k".to_string()),
            max_open_zones: 14,
            write_iolog: false,
            numjobs: 1,
            io_engine: IoEngine::IoUring,
            result_dir: PathBuf::from("."),
        }
    }
}

impl WorkloadConfig {
    /// Builds a [`WorkloadConfig`] with the specified job name.
    pub fn job_name(mut self, job_name: String) -> Self {
        self.job_name = job_name;
        self
    }

    /// Builds a [`WorkloadConfig`] with the specified result directory.
    pub fn result_dir(mut self, result_dir: PathBuf) -> Self {
        self.result_dir = result_dir;
        self
    }

    /// Builds a [`WorkloadConfig`] with the specified write block size.
    pub fn blocksize_writes(mut self, block_size: BlockSize) -> Self {
        self.blocksize_writes = block_size;
        self
    }

    /// Builds a [`WorkloadConfig`] with the specified read block size.
    pub fn blocksize_reads(mut self, block_size: BlockSize) -> Self {
        self.blocksize_reads = block_size;
        self
    }

    /// Builds a [`WorkloadConfig`] with the specified open zone limit.
    pub fn max_open_zones(mut self, max_open_zones: u32) -> Self {
        self.max_open_zones = max_open_zones;
        self
    }

    /// Builds a [`WorkloadConfig`] with write-log capture toggled.
    pub fn write_iolog(mut self, write_iolog: bool) -> Self {
        self.write_iolog = write_iolog;
        self
    }

    /// Builds a [`WorkloadConfig`] with the specified number of clones per phase.
    pub fn numjobs(mut self, numjobs: u32) -> Self {
        self.numjobs = numjobs;
        self
    }

    /// Builds a [`WorkloadConfig`] with the specified I/O engine.
    pub fn io_engine(mut self, io_engine: IoEngine) -> Self {
        self.io_engine = io_engine;
        self
    }

    /// Directory that per-phase logs and the engine report are written to.
    pub fn result_path(&self) -> &Path {
        &self.result_dir
    }

    /// Where the engine writes its JSON report.
    pub fn report_path(&self) -> PathBuf {
        self.result_dir.join(format!("{}.log", self.job_name))
    }

    /// Where the aggregated result table is written.
    pub fn table_path(&self) -> PathBuf {
        self.result_dir.join(format!("{}.csv", self.job_name))
    }

    /// Apply `key=value` overrides.
    ///
    /// Either every override is applied or, on the first error, none are.
    pub fn apply_overrides<I, S>(&mut self, overrides: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut updated = self.clone();
        for token in overrides {
            let (key, value) = parse_override(token.as_ref())?;
            updated.set(key, value)?;
            log::debug!("Override {key}={value}");
        }
        *self = updated;
        Ok(())
    }

    fn set(&mut self, key: OverrideKey, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            OverrideKey::BlocksizeWrites => {
                self.blocksize_writes = value.parse().map_err(invalid)?;
            }
            OverrideKey::BlocksizeReads => {
                self.blocksize_reads = value.parse().map_err(invalid)?;
            }
            OverrideKey::MaxOpenZones => {
                self.max_open_zones = value
                    .parse()
                    .map_err(|_| invalid("expected a non-negative integer"))?;
            }
            OverrideKey::WriteIolog => {
                self.write_iolog = match value {
                    "1" | "true" => true,
                    "0" | "false" => false,
                    _ => return Err(invalid("expected 0, 1, true or false")),
                };
            }
            OverrideKey::Numjobs => {
                let numjobs: u32 = value
                    .parse()
                    .map_err(|_| invalid("expected a positive integer"))?;
                if numjobs == 0 {
                    return Err(invalid("expected a positive integer"));
                }
                self.numjobs = numjobs;
            }
            OverrideKey::SpdkPath => {
                if value.is_empty() {
                    return Err(invalid("expected a path"));
                }
                self.io_engine = IoEngine::Spdk {
                    root: PathBuf::from(value),
                };
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = WorkloadConfig::default();
        assert_eq!(config.blocksize_writes.to_string(), "64k");
        assert_eq!(config.blocksize_reads.to_string(), "4k");
        assert_eq!(config.max_open_zones, 14);
        assert!(!config.write_iolog);
        assert_eq!(config.numjobs, 1);
        assert_eq!(config.io_engine, IoEngine::IoUring);
    }

    #[test]
    fn test_should_apply_overrides() {
        let mut config = WorkloadConfig::default();
        config
            .apply_overrides([
                "blocksize_writes=128k",
                "blocksize_reads=8k",
                "max_open_zones=32",
                "write_iolog=1",
                "numjobs=4",
            ])
            .unwrap();

        assert_eq!(config.blocksize_writes.to_string(), "128k");
        assert_eq!(config.blocksize_reads.to_string(), "8k");
        assert_eq!(config.max_open_zones, 32);
        assert!(config.write_iolog);
        assert_eq!(config.numjobs, 4);
    }

    #[test]
    fn test_should_reject_token_without_separator() {
        let mut config = WorkloadConfig::default();
        let err = config.apply_overrides(["maxopenzones14"]).unwrap_err();

        assert_eq!(
            err,
            ConfigError::MalformedOverride {
                token: "maxopenzones14".to_string()
            }
        );
        assert_eq!(config, WorkloadConfig::default());
    }

    #[test]
    fn test_should_not_apply_any_override_when_one_fails() {
        let mut config = WorkloadConfig::default();
        let err = config
            .apply_overrides(["max_open_zones=20", "numjobs=0"])
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "numjobs"));
        assert_eq!(config.max_open_zones, 14);
    }

    #[test]
    fn test_should_reject_unknown_key() {
        let mut config = WorkloadConfig::default();
        let err = config.apply_overrides(["jobname=other"]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownKey {
                key: "jobname".to_string()
            }
        );
    }

    #[test]
    fn test_value_may_contain_separator() {
        let mut config = WorkloadConfig::default();
        config.apply_overrides(["spdk_path=/opt/a=b"]).unwrap();
        assert_eq!(
            config.io_engine,
            IoEngine::Spdk {
                root: PathBuf::from("/opt/a=b")
            }
        );
    }

    #[test]
    fn test_block_size_validation() {
        assert!("4k".parse::<BlockSize>().is_ok());
        assert!("4096".parse::<BlockSize>().is_ok());
        assert!("1M".parse::<BlockSize>().is_ok());
        assert!("k".parse::<BlockSize>().is_err());
        assert!("4kk".parse::<BlockSize>().is_err());
        assert!("0k".parse::<BlockSize>().is_err());
        assert!("four".parse::<BlockSize>().is_err());
        assert!("".parse::<BlockSize>().is_err());
    }

    #[test]
    fn test_should_reject_bad_write_iolog() {
        let mut config = WorkloadConfig::default();
        assert!(config.apply_overrides(["write_iolog=yes"]).is_err());
        assert!(!config.write_iolog);
    }

    #[test]
    fn test_builder_setters() {
        let config = WorkloadConfig::default()
            .blocksize_writes("128k".parse().unwrap())
            .blocksize_reads("16k".parse().unwrap())
            .max_open_zones(8)
            .write_iolog(true)
            .numjobs(2);

        let mut overridden = WorkloadConfig::default();
        overridden
            .apply_overrides([
                "blocksize_writes=128k",
                "blocksize_reads=16k",
                "max_open_zones=8",
                "write_iolog=true",
                "numjobs=2",
            ])
            .unwrap();
        assert_eq!(config, overridden);
    }

    #[test]
    fn test_derived_paths() {
        let config = WorkloadConfig::default().result_dir(PathBuf::from("/results/run-1"));
        assert_eq!(
            config.report_path(),
            PathBuf::from("/results/run-1/fio_zone_mixed_args.log")
        );
        assert_eq!(
            config.table_path(),
            PathBuf::from("/results/run-1/fio_zone_mixed_args.csv")
        );
    }
}
