use anyhow::Context;
use std::path::{Path, PathBuf};

/// Size of a sector as reported by `/sys/block/<dev>/size`.
const SYSFS_SECTOR_SIZE: u64 = 512;

/// The block device a workload is planned for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Path handed to the engine as `--filename`.
    pub path: PathBuf,
    /// Device capacity in bytes.
    pub capacity_bytes: u64,
    /// Whether the device exposes zones natively (host-managed or host-aware).
    pub zoned: bool,
}

impl DeviceDescriptor {
    pub fn new<P>(path: P, capacity_bytes: u64, zoned: bool) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: path.into(),
            capacity_bytes,
            zoned,
        }
    }

    /// Describe a device from its sysfs entries under `sysfs_root` (normally `/sys`).
    ///
    /// Reads `block/<name>/size` for the capacity and `block/<name>/queue/zoned` for the zone
    /// model. A missing `zoned` attribute is treated as a conventional device.
    pub fn from_sysfs<P, R>(path: P, sysfs_root: R) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
        R: AsRef<Path>,
    {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("No device name in {}", path.display()))?
            .to_string();
        let block_dir = sysfs_root.as_ref().join("block").join(&name);

        let size_path = block_dir.join("size");
        let sectors = std::fs::read_to_string(&size_path)
            .with_context(|| format!("Failed to read {}", size_path.display()))?
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid sector count in {}", size_path.display()))?;

        let zoned = match std::fs::read_to_string(block_dir.join("queue").join("zoned")) {
            Ok(model) => model.trim() != "none",
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e).context("Failed to read zone model"),
        };

        log::debug!("Device {name}: {sectors} sectors, zoned: {zoned}");

        Ok(Self {
            path,
            capacity_bytes: sectors.saturating_mul(SYSFS_SECTOR_SIZE),
            zoned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fake_sysfs(name: &str, sectors: &str, zoned: Option<&str>) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let queue = root.path().join("block").join(name).join("queue");
        std::fs::create_dir_all(&queue).unwrap();
        std::fs::write(root.path().join("block").join(name).join("size"), sectors).unwrap();
        if let Some(zoned) = zoned {
            std::fs::write(queue.join("zoned"), zoned).unwrap();
        }
        root
    }

    #[test]
    fn test_should_read_zoned_device() {
        let root = fake_sysfs("nvme0n2", "1953525168\n", Some("host-managed\n"));
        let device = DeviceDescriptor::from_sysfs("/dev/nvme0n2", root.path()).unwrap();

        assert_eq!(device.path, PathBuf::from("/dev/nvme0n2"));
        assert_eq!(device.capacity_bytes, 1953525168 * 512);
        assert!(device.zoned);
    }

    #[test]
    fn test_should_read_conventional_device() {
        let root = fake_sysfs("sdb", "2048\n", Some("none\n"));
        let device = DeviceDescriptor::from_sysfs("/dev/sdb", root.path()).unwrap();
        assert_eq!(device.capacity_bytes, 2048 * 512);
        assert!(!device.zoned);
    }

    #[test]
    fn test_missing_zone_model_is_conventional() {
        let root = fake_sysfs("sdc", "8", None);
        let device = DeviceDescriptor::from_sysfs("/dev/sdc", root.path()).unwrap();
        assert!(!device.zoned);
    }

    #[test]
    fn test_should_fail_on_unknown_device() {
        let root = tempfile::tempdir().unwrap();
        assert!(DeviceDescriptor::from_sysfs("/dev/nope", root.path()).is_err());
    }
}
