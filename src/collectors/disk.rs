use crate::provider::{DriveInfo, ProviderError};
use log::debug;
use std::time::Instant;
use sysinfo::{Disk, Disks};

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    Read,
    Write,
}

/// Fixed, non-removable drives keyed by mount point. When the same mount
/// point is listed twice the first entry wins; bind mounts of one device sit
/// on different mount points and are listed once per mount.
pub fn collect_drives(disks: &Disks) -> Vec<DriveInfo> {
    let start = Instant::now();
    let drives = first_per_mount(fixed_disks(disks).map(|disk| DriveInfo {
        name: mount_name(disk),
        total_bytes: disk.total_space(),
        available_bytes: disk.available_space(),
    }));
    debug!("collect_drives took: {} ms", start.elapsed().as_millis());
    drives
}

/// Cumulative bytes moved by the drive mounted at `name` since boot.
pub fn collect_io(disks: &Disks, name: &str, direction: Direction) -> Result<f64, ProviderError> {
    let disk = fixed_disks(disks)
        .find(|disk| mount_name(disk) == name)
        .ok_or_else(|| ProviderError::Unavailable(format!("drive {}", name)))?;

    let usage = disk.usage();
    let bytes = match direction {
        Direction::Read => usage.total_read_bytes,
        Direction::Write => usage.total_written_bytes,
    };
    Ok(bytes as f64)
}

fn fixed_disks(disks: &Disks) -> impl Iterator<Item = &Disk> {
    disks
        .list()
        .iter()
        .filter(|disk| is_fixed(disk.is_removable(), disk.total_space()))
}

// Pseudo filesystems report no size.
fn is_fixed(removable: bool, total_bytes: u64) -> bool {
    !removable && total_bytes > 0
}

fn first_per_mount(drives: impl IntoIterator<Item = DriveInfo>) -> Vec<DriveInfo> {
    let mut result: Vec<DriveInfo> = Vec::new();
    for drive in drives {
        if !result.iter().any(|d| d.name == drive.name) {
            result.push(drive);
        }
    }
    result
}

fn mount_name(disk: &Disk) -> String {
    disk.mount_point().to_string_lossy().to_string()
}
