//! Scaffold templates and filesystem writes

use super::{AssetKind, ProjectLayout};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

const SKETCH_FILE: &str = "sketch.js";
const INDEX_FILE: &str = "index.html";
const GITIGNORE_FILE: &str = ".gitignore";

const INDEX_HEAD: &str = r#"<!DOCTYPE html>
<html lang="">

<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>p5.js sketch</title>
  <style>
    body {
      padding: 0;
      margin: 0;
      background-color: #1b1b1b;
    }
  </style>
"#;

const INDEX_BODY: &str = r#"</head>

<body>
  <main>
  </main>
</body>

</html>
"#;

const SKETCH_TEMPLATE: &str = r#"function setup() {
  createCanvas(320, 240);
}


function draw() {
  background(0);
  ellipse(100, 120, 16, 16);
}
"#;

/// A generated text file, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldFile {
    pub path: &'static str,
    pub contents: String,
}

/// Render the scaffold for a project; output depends only on `addons`
pub fn render(layout: &ProjectLayout, addons: bool) -> Vec<ScaffoldFile> {
    let assets = layout.assets(addons);

    let mut index = String::from(INDEX_HEAD);
    for kind in &assets {
        index.push_str(&format!(
            "  <script src=\"{}\"></script>\n",
            layout.asset_name(*kind)
        ));
    }
    index.push_str(&format!("  <script src=\"{}\"></script>\n", SKETCH_FILE));
    index.push_str(INDEX_BODY);

    let gitignore: String = assets
        .iter()
        .map(|kind| format!("{}\n", layout.asset_name(*kind)))
        .collect();

    vec![
        ScaffoldFile {
            path: INDEX_FILE,
            contents: index,
        },
        ScaffoldFile {
            path: SKETCH_FILE,
            contents: SKETCH_TEMPLATE.to_string(),
        },
        ScaffoldFile {
            path: GITIGNORE_FILE,
            contents: gitignore,
        },
    ]
}

/// Filesystem side of project operations
#[derive(Debug, Clone)]
pub struct FileWriter {
    layout: ProjectLayout,
}

impl FileWriter {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    /// Create `dir` and any missing parents
    ///
    /// Returns the top-most directory that did not exist before, which is what
    /// [`FileWriter::remove_dir`] must delete to undo the call.
    pub async fn create_dir(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let created = dir
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
            .last()
            .map(Path::to_path_buf);

        tracing::debug!(dir = %dir.display(), "creating project directory");
        fs::create_dir_all(dir).await?;
        Ok(created)
    }

    /// Remove a directory this run created; used to undo a failed create
    pub async fn remove_dir(&self, dir: &Path) -> Result<()> {
        tracing::debug!(dir = %dir.display(), "removing project directory");
        fs::remove_dir_all(dir).await?;
        Ok(())
    }

    /// Write the scaffold files, returning their paths relative to `dir`
    pub async fn write_scaffold(&self, dir: &Path, addons: bool) -> Result<Vec<String>> {
        let mut written = Vec::new();
        for file in render(&self.layout, addons) {
            let target = dir.join(file.path);
            tracing::debug!(path = %target.display(), "writing scaffold file");
            fs::write(&target, file.contents.as_bytes()).await?;
            written.push(file.path.to_string());
        }
        Ok(written)
    }

    pub async fn write_asset(&self, dir: &Path, kind: AssetKind, content: &[u8]) -> Result<PathBuf> {
        let target = self.layout.asset_path(dir, kind);
        tracing::debug!(path = %target.display(), size = content.len(), "writing asset");
        fs::write(&target, content).await?;
        Ok(target)
    }

    /// Delete an asset; returns false when it was not there
    pub async fn remove_asset(&self, dir: &Path, kind: AssetKind) -> Result<bool> {
        let target = self.layout.asset_path(dir, kind);
        match fs::remove_file(&target).await {
            Ok(()) => {
                tracing::debug!(path = %target.display(), "removed asset");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
