use std::io::Write;
use std::sync::Mutex;

pub struct BufferedLog {
    pub log_id: String,
    pub log_file_path: Option<String>,
    pub buffered_log: Mutex<Vec<String>>,
    pub log_count_flush: usize,
}

impl BufferedLog {
    pub fn new(id: String) -> Self {
        BufferedLog {
            log_id: id,
            log_file_path: None,
            buffered_log: Mutex::new(Vec::new()),
            log_count_flush: 50,
        }
    }

    /// Start writing buffered entries to the given file, creating the parent directory and truncating the file.
    pub fn set_log_file(&mut self, full_file_path: String) -> Result<(), std::io::Error> {
        if let Some(parent) = std::path::Path::new(&full_file_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&full_file_path, "")?;
        self.log_file_path = Some(full_file_path);
        Ok(())
    }

    pub fn add_log(&self, log: String) {
        if self.log_file_path.is_none() {
            return;
        }
        if let Ok(mut log_buffer) = self.buffered_log.lock() {
            log_buffer.push(log);
        }
        self.consider_flush(false);
    }

    pub fn consider_flush(&self, force: bool) {
        let Some(log_file_path) = &self.log_file_path else {
            return;
        };

        let mut log_buffer = match self.buffered_log.lock() {
            Ok(buffer) => buffer,
            Err(_) => return,
        };
        if log_buffer.is_empty() || (!force && log_buffer.len() < self.log_count_flush) {
            return;
        }

        let log_data = log_buffer.join("\n") + "\n";
        if let Err(e) = std::fs::OpenOptions::new().append(true).open(log_file_path).and_then(|mut file| file.write_all(log_data.as_bytes())) {
            eprintln!("Failed to write log {} to {}: {}", &self.log_id, log_file_path, e);
        }

        log_buffer.clear();
    }
}
