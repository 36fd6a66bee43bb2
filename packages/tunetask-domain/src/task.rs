use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Lifecycle state of a task. Any state may move to any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
	#[default]
	Pending,
	InProgress,
	Completed,
}
impl TaskStatus {
	pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "Pending",
			Self::InProgress => "InProgress",
			Self::Completed => "Completed",
		}
	}
}
impl fmt::Display for TaskStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for TaskStatus {
	type Err = UnknownStatus;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|status| status.as_str() == raw)
			.ok_or_else(|| UnknownStatus(raw.to_string()))
	}
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown task status {0:?}.")]
pub struct UnknownStatus(pub String);

/// Trimmed title, or `None` when nothing but whitespace was given.
pub fn normalize_title(title: &str) -> Option<&str> {
	let trimmed = title.trim();

	if trimmed.is_empty() { None } else { Some(trimmed) }
}
