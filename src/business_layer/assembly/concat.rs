use std::path::{Path, PathBuf};

/// Ordered concat-demuxer manifest: one timed entry per slot, plus a
/// terminal repeat of the last image without a duration line so the
/// demuxer honors the final frame's display time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatManifest {
    entries: Vec<ConcatEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConcatEntry {
    pub path: PathBuf,
    pub duration: f64,
}

impl ConcatManifest {
    pub fn build(images: &[PathBuf], per_image: f64) -> Self {
        let entries = images
            .iter()
            .map(|path| ConcatEntry {
                path: path.clone(),
                duration: per_image,
            })
            .collect();
        Self { entries }
    }

    /// Timed entry count, excluding the terminal repeat line.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "file '{}'\nduration {}\n",
                escape_path(&entry.path),
                entry.duration
            ));
        }
        if let Some(last) = self.entries.last() {
            out.push_str(&format!("file '{}'\n", escape_path(&last.path)));
        }
        out
    }

    pub async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, self.render()).await
    }
}

/// Single quotes would terminate the quoted filename in a concat line, so
/// they are rewritten as `'\''`.
fn escape_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parses rendered manifest text back into (path, duration) pairs,
    /// undoing the quote escaping. Terminal repeat line excluded.
    fn parse(text: &str) -> Vec<(PathBuf, f64)> {
        let mut pairs = Vec::new();
        let mut pending: Option<PathBuf> = None;
        for line in text.lines() {
            if let Some(rest) = line.strip_prefix("file '") {
                let raw = rest.strip_suffix('\'').unwrap();
                pending = Some(PathBuf::from(raw.replace("'\\''", "'")));
            } else if let Some(rest) = line.strip_prefix("duration ") {
                let path = pending.take().unwrap();
                pairs.push((path, rest.parse().unwrap()));
            }
        }
        pairs
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn manifest_has_one_terminal_repeat_entry() {
        let manifest = ConcatManifest::build(&paths(&["a.jpg", "b.jpg", "a.jpg"]), 2.0);
        let rendered = manifest.render();

        let file_lines = rendered.lines().filter(|l| l.starts_with("file ")).count();
        let duration_lines = rendered
            .lines()
            .filter(|l| l.starts_with("duration "))
            .count();
        assert_eq!(file_lines, 4);
        assert_eq!(duration_lines, 3);
        assert!(rendered.ends_with("file 'a.jpg'\n"));
    }

    #[test]
    fn render_round_trips_paths_and_durations() {
        let images = paths(&["one.jpg", "it's here.jpg", "two.jpg"]);
        let manifest = ConcatManifest::build(&images, 2.0);

        let pairs = parse(&manifest.render());
        assert_eq!(pairs.len(), 3);
        for (i, (path, duration)) in pairs.iter().enumerate() {
            assert_eq!(path, &images[i]);
            assert_eq!(*duration, 2.0);
        }
    }

    #[test]
    fn single_quotes_are_escaped() {
        let manifest = ConcatManifest::build(&paths(&["it's.jpg"]), 1.5);
        let rendered = manifest.render();
        assert!(rendered.contains("file 'it'\\''s.jpg'"));
    }

    #[tokio::test]
    async fn write_to_persists_rendered_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("concat.txt");
        let manifest = ConcatManifest::build(&paths(&["a.jpg"]), 2.0);

        manifest.write_to(&path).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, manifest.render());
    }
}
