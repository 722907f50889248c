use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use droneid_core::DroneIdError;

/// Append-only sink for successfully-descrambled frame bits, shared by every
/// worker. Opened append-only on each write so concurrent writers never
/// truncate each other's output.
pub struct BitsLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl BitsLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        BitsLog {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn append(&self, bytes: &[u8]) -> Result<(), DroneIdError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock().unwrap();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| DroneIdError::Dsp(format!("opening bits log {:?}: {e}", self.path)))?;
        file.write_all(bytes)
            .map_err(|e| DroneIdError::Dsp(format!("writing bits log {:?}: {e}", self.path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_across_multiple_calls() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("droneid_bits_log_test_{}.bin", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let log = BitsLog::new(&path);
        log.append(&[1, 2, 3]).unwrap();
        log.append(&[4, 5]).unwrap();

        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents, vec![1, 2, 3, 4, 5]);

        std::fs::remove_file(&path).unwrap();
    }
}
