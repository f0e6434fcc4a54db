// src/file_io.rs
use std::io::Error;
use std::path::Path;

use log::debug;

/// Reads a whole bencoded document (typically a `.torrent` file) into memory.
pub async fn read_input(input_path: &Path) -> Result<Vec<u8>, Error> {
	let data = tokio::fs::read(input_path).await?;
	debug!("Read {} bytes from {}", data.len(), input_path.display());
	Ok(data)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[tokio::test]
	async fn test_read_input() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(b"d3:fooi42ee").unwrap();

		let data = read_input(file.path()).await.unwrap();
		assert_eq!(data, b"d3:fooi42ee");
	}

	#[tokio::test]
	async fn test_read_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		assert!(read_input(&dir.path().join("missing.torrent")).await.is_err());
	}
}
