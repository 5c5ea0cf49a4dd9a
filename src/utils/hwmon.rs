use std::fs::{read_dir, File};
use std::io::Read;
use std::path::{Path, PathBuf};

pub const HWMON_ROOT: &str = "/sys/class/hwmon";
pub const DMI_ROOT: &str = "/sys/class/dmi/id";

/// hwmon driver names that report the CPU package temperature, best first.
const CPU_SENSOR_DRIVERS: [&str; 5] = ["k10temp", "coretemp", "zenpower", "cpu_thermal", "acpitz"];

/// Labels preferred inside a CPU driver's folder over the first input found.
const CPU_PACKAGE_LABELS: [&str; 3] = ["tctl", "package id 0", "tdie"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sensor {
    pub id: u32,
    pub path: PathBuf,
    pub name: String,
    pub label: String,
    pub temperature: f32,
}

/// Read out `hwmon` info (hardware monitor) from `folder`.
///
/// Every `tempN_input` file becomes a [Sensor] carrying the folder's `name`,
/// the optional `tempN_label` and the current reading. Inputs that cannot be
/// parsed are skipped.
///
/// Kernel hwmon API: https://www.kernel.org/doc/html/latest/hwmon/hwmon-kernel-api.html
pub fn from_hwmon(sensors: &mut Vec<Sensor>, folder: &Path) -> Option<()> {
    let dir = read_dir(folder).ok()?;
    let name = get_file_line(&folder.join("name"), 16).unwrap_or_default();

    for entry in dir.flatten() {
        if !entry.file_type().is_ok_and(|file_type| !file_type.is_dir()) {
            continue;
        }

        let entry = entry.path();
        let filename = entry.file_name().and_then(|x| x.to_str()).unwrap_or("");
        let Some((id, item)) = filename
            .strip_prefix("temp")
            .and_then(|f| f.split_once('_'))
            .and_then(|(id, item)| Some((id.parse::<u32>().ok()?, item)))
        else {
            continue;
        };

        if item != "input" {
            continue;
        }

        let Some(temperature) = read_temperature(&entry) else {
            continue;
        };
        let label =
            get_file_line(&folder.join(format!("temp{}_label", id)), 16).unwrap_or_default();
        sensors.push(Sensor {
            id,
            path: entry.clone(),
            name: name.clone(),
            label,
            temperature,
        });
    }

    Some(())
}

/// Scans every `hwmonN` folder under `root` and picks the sensor that best
/// represents the CPU package.
pub fn find_cpu_sensor(root: &Path) -> Option<Sensor> {
    let mut sensors = Vec::new();
    for entry in read_dir(root).ok()?.flatten() {
        from_hwmon(&mut sensors, &entry.path());
    }

    for driver in CPU_SENSOR_DRIVERS {
        let mut candidates: Vec<&Sensor> = sensors.iter().filter(|s| s.name == driver).collect();
        if candidates.is_empty() {
            continue;
        }
        candidates.sort_by_key(|s| s.id);
        let preferred = candidates
            .iter()
            .find(|s| CPU_PACKAGE_LABELS.contains(&s.label.to_lowercase().as_str()))
            .or_else(|| candidates.first());
        return preferred.map(|s| (*s).clone());
    }
    None
}

/// Board vendor and name from DMI, e.g. `ASUSTeK COMPUTER INC. PRIME X570-P`.
pub fn read_board_name(dmi_root: &Path) -> Option<String> {
    let vendor = get_file_line(&dmi_root.join("board_vendor"), 64).unwrap_or_default();
    let name = get_file_line(&dmi_root.join("board_name"), 64)?;
    if name.is_empty() {
        return None;
    }
    if vendor.is_empty() {
        Some(name)
    } else {
        Some(format!("{} {}", vendor, name))
    }
}

// Read arbitrary string data.
pub fn get_file_line(file: &Path, capacity: usize) -> Option<String> {
    let mut reader = String::with_capacity(capacity);
    let mut f = File::open(file).ok()?;
    f.read_to_string(&mut reader).ok()?;
    reader.truncate(reader.trim_end().len());
    Some(reader)
}

/// Designed at first for reading an `i32` or `u32` aka `c_long`
/// from a `/sys/class/hwmon` sysfs file.
fn read_number_from_file<N>(file: &Path) -> Option<N>
where
    N: std::str::FromStr,
{
    let mut reader = [0u8; 32];
    let mut f = File::open(file).ok()?;
    let n = f.read(&mut reader).ok()?;
    // parse and trim would complain about `\0`.
    let number = &reader[..n];
    let number = std::str::from_utf8(number).ok()?;
    number.trim().parse().ok()
}

/// Reads a `tempN_input` file, converting milli-celsius to celsius.
#[inline]
pub fn read_temperature(file: &Path) -> Option<f32> {
    read_number_from_file::<i32>(file).map(|n| (n as f32) / 1000f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn hwmon_dir(root: &Path, dir: &str, name: &str, inputs: &[(u32, &str, i32)]) {
        let folder = root.join(dir);
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("name"), format!("{}\n", name)).unwrap();
        for (id, label, milli) in inputs {
            fs::write(folder.join(format!("temp{}_input", id)), format!("{}\n", milli)).unwrap();
            if !label.is_empty() {
                fs::write(
                    folder.join(format!("temp{}_label", id)),
                    format!("{}\n", label),
                )
                .unwrap();
            }
        }
    }

    #[test]
    fn test_from_hwmon_reads_inputs() {
        let root = TempDir::new().unwrap();
        hwmon_dir(root.path(), "hwmon0", "nvme", &[(1, "Composite", 38850), (2, "", 41000)]);

        let mut sensors = Vec::new();
        from_hwmon(&mut sensors, &root.path().join("hwmon0")).unwrap();
        sensors.sort_by_key(|s| s.id);

        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].name, "nvme");
        assert_eq!(sensors[0].label, "Composite");
        assert!((sensors[0].temperature - 38.85).abs() < 1e-4);
        assert_eq!(sensors[1].label, "");
    }

    #[test]
    fn test_find_cpu_sensor_prefers_package_label() {
        let root = TempDir::new().unwrap();
        hwmon_dir(root.path(), "hwmon0", "nvme", &[(1, "Composite", 38000)]);
        hwmon_dir(root.path(), "hwmon1", "k10temp", &[(1, "Tccd1", 55000), (3, "Tctl", 61500)]);

        let sensor = find_cpu_sensor(root.path()).unwrap();
        assert_eq!(sensor.name, "k10temp");
        assert_eq!(sensor.label, "Tctl");
        assert_eq!(read_temperature(&sensor.path), Some(61.5));
    }

    #[test]
    fn test_find_cpu_sensor_missing() {
        let root = TempDir::new().unwrap();
        hwmon_dir(root.path(), "hwmon0", "nvme", &[(1, "Composite", 38000)]);
        assert!(find_cpu_sensor(root.path()).is_none());
        assert!(find_cpu_sensor(&root.path().join("absent")).is_none());
    }

    #[test]
    fn test_read_board_name() {
        let root = TempDir::new().unwrap();
        assert_eq!(read_board_name(root.path()), None);

        fs::write(root.path().join("board_name"), "PRIME X570-P\n").unwrap();
        assert_eq!(read_board_name(root.path()).as_deref(), Some("PRIME X570-P"));

        fs::write(root.path().join("board_vendor"), "ASUSTeK COMPUTER INC.\n").unwrap();
        assert_eq!(
            read_board_name(root.path()).as_deref(),
            Some("ASUSTeK COMPUTER INC. PRIME X570-P")
        );
    }
}
