use std::sync::{Arc, Mutex};

use chrono::Utc;
use ldk_asset_shaper::logger::{LogLevel, LogRecord, LogWriter};
use log::{LevelFilter as LogFacadeLevelFilter, Log as LogFacadeLog};

pub(crate) struct MockLogFacadeLogger {
	logs: Arc<Mutex<Vec<String>>>,
}

impl MockLogFacadeLogger {
	pub fn new() -> Self {
		Self { logs: Arc::new(Mutex::new(Vec::new())) }
	}

	pub fn retrieve_logs(&self) -> Vec<String> {
		self.logs.lock().unwrap().to_vec()
	}
}

impl LogFacadeLog for MockLogFacadeLogger {
	fn enabled(&self, _metadata: &log::Metadata) -> bool {
		true
	}

	fn log(&self, record: &log::Record) {
		let message = format!(
			"{} {:<5} [{}:{}] {}",
			Utc::now().format("%Y-%m-%d %H:%M:%S"),
			record.level().to_string(),
			record.module_path().unwrap(),
			record.line().unwrap(),
			record.args()
		);
		self.logs.lock().unwrap().push(message);
	}

	fn flush(&self) {}
}

pub(crate) fn init_log_logger(level: LogFacadeLevelFilter) -> Arc<MockLogFacadeLogger> {
	let logger = Arc::new(MockLogFacadeLogger::new());
	log::set_boxed_logger(Box::new(logger.clone())).unwrap();
	log::set_max_level(level);

	logger
}

/// Captures the records handed to a custom [`LogWriter`] together with their level.
#[derive(Default)]
pub(crate) struct CapturingLogWriter {
	records: Mutex<Vec<(LogLevel, String)>>,
}

impl CapturingLogWriter {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn retrieve_logs(&self) -> Vec<(LogLevel, String)> {
		self.records.lock().unwrap().clone()
	}

	pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
		self.records.lock().unwrap().iter().any(|(l, msg)| *l == level && msg.contains(needle))
	}

	pub fn count_at(&self, level: LogLevel) -> usize {
		self.records.lock().unwrap().iter().filter(|(l, _)| *l == level).count()
	}
}

impl LogWriter for CapturingLogWriter {
	fn log<'a>(&self, record: LogRecord<'a>) {
		self.records.lock().unwrap().push((record.level, record.args.to_string()));
	}
}

pub(crate) fn validate_log_entry(entry: &String) {
	let parts = entry.splitn(4, ' ').collect::<Vec<_>>();
	assert_eq!(parts.len(), 4);
	let (day, time, level, path_and_msg) = (parts[0], parts[1], parts[2], parts[3]);

	let day_parts = day.split('-').collect::<Vec<_>>();
	assert_eq!(day_parts.len(), 3);
	let (year, month, day) = (day_parts[0], day_parts[1], day_parts[2]);
	assert!(year.len() == 4 && month.len() == 2 && day.len() == 2);
	assert!(
		year.chars().all(|c| c.is_digit(10))
			&& month.chars().all(|c| c.is_digit(10))
			&& day.chars().all(|c| c.is_digit(10))
	);

	// The file writer adds milliseconds.
	let time = time.split('.').next().unwrap();
	let time_parts = time.split(':').collect::<Vec<_>>();
	assert_eq!(time_parts.len(), 3);
	let (hour, minute, second) = (time_parts[0], time_parts[1], time_parts[2]);
	assert!(hour.len() == 2 && minute.len() == 2 && second.len() == 2);
	assert!(
		hour.chars().all(|c| c.is_digit(10))
			&& minute.chars().all(|c| c.is_digit(10))
			&& second.chars().all(|c| c.is_digit(10))
	);

	assert!(["GOSSIP", "TRACE", "DEBUG", "INFO", "WARN", "ERROR"].contains(&level.trim_end()));

	let path_and_msg = path_and_msg.trim_start();
	let path = path_and_msg.split_whitespace().next().unwrap();
	assert!(path.contains('[') && path.contains(']'));
	let module_path = &path[1..path.len() - 1];
	let path_parts = module_path.rsplitn(2, ':').collect::<Vec<_>>();
	assert_eq!(path_parts.len(), 2);
	let (line_number, module_name) = (path_parts[0], path_parts[1]);
	assert!(module_name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':'));
	assert!(line_number.chars().all(|c| c.is_digit(10)));

	let msg_start_index = path_and_msg.find(']').unwrap() + 1;
	let msg = &path_and_msg[msg_start_index..];
	assert!(!msg.is_empty());
}
