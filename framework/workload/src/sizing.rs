use crate::device::DeviceDescriptor;

/// Share of the zone size that is writable on zoned media.
pub const ZONED_CAPACITY_PCT: u64 = 52;
/// Conventional drives emulate zones whose capacity equals their size.
pub const CONVENTIONAL_CAPACITY_PCT: u64 = 100;
/// Zone size handed to the engine when emulating zones on a conventional drive.
pub const EMULATED_ZONE_SIZE: &str = "1102848k";

/// Capacity-derived sizing for the preparation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizing {
    /// Percentage of the capacity that is usable.
    pub capacity_pct: u64,
    /// Explicit `--zonesize` to pass on conventional media.
    pub zone_size_override: Option<&'static str>,
    /// Total volume written by the preparation phase, in kilobytes.
    pub io_size_kb: u64,
}

impl Sizing {
    pub fn for_device(device: &DeviceDescriptor) -> Self {
        let (capacity_pct, zone_size_override) = if device.zoned {
            (ZONED_CAPACITY_PCT, None)
        } else {
            (CONVENTIONAL_CAPACITY_PCT, Some(EMULATED_ZONE_SIZE))
        };

        if device.capacity_bytes == 0 {
            log::warn!(
                "Device {} reports zero capacity, the preparation pass will write nothing",
                device.path.display()
            );
        }

        Self {
            capacity_pct,
            zone_size_override,
            io_size_kb: io_size_kb(device.capacity_bytes, capacity_pct),
        }
    }
}

/// Usable capacity in kilobytes, doubled so the preparation pass fully populates the region.
fn io_size_kb(capacity_bytes: u64, capacity_pct: u64) -> u64 {
    let usable_kb = u128::from(capacity_bytes) * u128::from(capacity_pct) / 100 / 1000;
    // capacity_pct <= 100 keeps usable_kb at most u64::MAX / 1000
    (usable_kb as u64) * 2
}
