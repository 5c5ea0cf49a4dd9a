use crate::provider::{MemoryReading, ProviderError};
use log::debug;
use std::time::Instant;
use systemstat::{Platform, System};

pub fn collect_ram(sys: &System) -> Result<MemoryReading, ProviderError> {
    let start = Instant::now();
    let result = match sys.memory() {
        Ok(mem) => {
            let total_bytes = mem.total.as_u64();
            let used_bytes = total_bytes.saturating_sub(mem.free.as_u64());
            Ok(MemoryReading {
                total_bytes,
                used_bytes,
            })
        }
        Err(x) => Err(ProviderError::read("memory", x)),
    };
    debug!("collect_ram took: {} ms", start.elapsed().as_millis());
    result
}
