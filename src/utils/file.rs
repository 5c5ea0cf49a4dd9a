use log::debug;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let contents = fs::read_to_string(path)?;
    Ok(contents)
}

/// Total scheduling entities (threads) from the fourth field of
/// `/proc/loadavg`, e.g. `0.42 0.35 0.30 2/1487 91234`.
pub fn thread_count_from_loadavg(path: &Path) -> io::Result<u64> {
    let start = Instant::now();
    let contents = read_to_string(path)?;
    let result = parse_loadavg_threads(&contents).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unexpected loadavg format: {}", contents.trim()),
        )
    });
    debug!("thread_count_from_loadavg took: {} ms", start.elapsed().as_millis());
    result
}

fn parse_loadavg_threads(contents: &str) -> Option<u64> {
    let field = contents.split_whitespace().nth(3)?;
    let (_, total) = field.split_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loadavg_threads() {
        assert_eq!(parse_loadavg_threads("0.42 0.35 0.30 2/1487 91234\n"), Some(1487));
        assert_eq!(parse_loadavg_threads("0.42 0.35 0.30"), None);
        assert_eq!(parse_loadavg_threads("0.42 0.35 0.30 2-1487 1"), None);
    }
}
