//! Target file rendering and atomic replacement
//!
//! Each host gets `<dir>/<hypervisor>.<ext>`. The file is written to a
//! temporary sibling and renamed over the destination so Prometheus never
//! reads a partial file.

use crate::discovery::ScrapeRecord;
use crate::output::OutputFormat;
use crate::{Result, SdError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct TargetFileWriter {
    dir: PathBuf,
    format: OutputFormat,
}

impl TargetFileWriter {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn path_for(&self, hypervisor: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", hypervisor, self.format.extension()))
    }

    pub fn render(&self, records: &[ScrapeRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => {
                serde_yaml::to_string(records).map_err(|e| SdError::SerializeError(e.to_string()))
            }
            OutputFormat::Json => serde_json::to_string_pretty(records)
                .map(|mut body| {
                    body.push('\n');
                    body
                })
                .map_err(|e| SdError::SerializeError(e.to_string())),
        }
    }

    /// Replace the target file for `hypervisor` and return its path
    pub fn write(&self, hypervisor: &str, records: &[ScrapeRecord]) -> Result<PathBuf> {
        let body = self.render(records)?;
        let path = self.path_for(hypervisor);

        debug!("Scrape config for {}:\n{}", hypervisor, body);

        write_atomically(&path, body.as_bytes()).map_err(|source| SdError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

fn write_atomically(dst: &Path, contents: &[u8]) -> std::io::Result<()> {
    let file_name = dst
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = dst.with_file_name(format!(".{}.tmp", file_name));

    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, dst)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::LabelSet;
    use tempfile::TempDir;

    fn record() -> ScrapeRecord {
        let mut labels = LabelSet::new();
        labels.insert("tier".to_string(), "web".to_string());
        labels.insert("hypervisor".to_string(), "hv1.example.com".to_string());
        labels.insert("env".to_string(), "prod".to_string());

        ScrapeRecord {
            targets: vec![
                "web01.example.com:9100".to_string(),
                "web01.example.com:9113".to_string(),
            ],
            labels,
        }
    }

    #[test]
    fn test_path_for() {
        let yaml = TargetFileWriter::new("/srv/sd", OutputFormat::Yaml);
        assert_eq!(
            yaml.path_for("hv1.example.com"),
            PathBuf::from("/srv/sd/hv1.example.com.yml")
        );

        let json = TargetFileWriter::new("/srv/sd", OutputFormat::Json);
        assert_eq!(json.path_for("hv1"), PathBuf::from("/srv/sd/hv1.json"));
    }

    #[test]
    fn test_render_yaml_shape() {
        let writer = TargetFileWriter::new("/tmp", OutputFormat::Yaml);
        let body = writer.render(&[record()]).unwrap();

        let parsed: Vec<ScrapeRecord> = serde_yaml::from_str(&body).unwrap();
        assert_eq!(parsed, vec![record()]);

        let pos = |needle: &str| body.find(needle).expect(needle);
        assert!(pos("targets:") < pos("labels:"));
        assert!(pos("env:") < pos("hypervisor:"));
        assert!(pos("hypervisor:") < pos("tier:"));
    }

    #[test]
    fn test_render_json_shape() {
        let writer = TargetFileWriter::new("/tmp", OutputFormat::Json);
        let body = writer.render(&[record()]).unwrap();

        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let entry = value[0].as_object().unwrap();
        assert_eq!(entry.len(), 2);
        assert_eq!(entry["targets"][1], "web01.example.com:9113");
        assert_eq!(entry["labels"]["env"], "prod");
    }

    #[test]
    fn test_render_empty() {
        let writer = TargetFileWriter::new("/tmp", OutputFormat::Yaml);
        assert_eq!(writer.render(&[]).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_replaces_file() {
        let dir = TempDir::new().unwrap();
        let writer = TargetFileWriter::new(dir.path(), OutputFormat::Yaml);

        let path = writer.write("hv1", &[record()]).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("web01.example.com:9100"));

        writer.write("hv1", &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temporary file should not be left behind");
    }

    #[test]
    fn test_write_missing_directory() {
        let dir = TempDir::new().unwrap();
        let writer = TargetFileWriter::new(dir.path().join("missing"), OutputFormat::Yaml);

        let err = writer.write("hv1", &[record()]).unwrap_err();
        assert!(matches!(err, SdError::WriteFailed { .. }));
    }
}
