//! Session resolution.
//!
//! The director never reads content directly; it asks a [`ContentResolver`]
//! for a session by index and descriptor and caches the result.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use casebook_core::error::DomainError;
use casebook_core::geometry::Scale;
use tracing::{debug, info};

use crate::domain::model::{Course, Session, SessionDescriptor};
use crate::domain::source::{compile_course, compile_session, parse_course, parse_session};

/// Materializes a session from its descriptor.
///
/// Implementations must be idempotent per session index.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Resolve session `index`.
    async fn resolve(
        &self,
        index: u32,
        descriptor: &SessionDescriptor,
    ) -> Result<Session, DomainError>;
}

/// Resolves sessions from YAML files under a content root.
///
/// Descriptors are paths relative to the root. Paper `file` references are
/// relative to the session file that names them.
#[derive(Debug, Clone)]
pub struct YamlContentResolver {
    root: PathBuf,
    scale: Scale,
}

impl YamlContentResolver {
    /// Creates a resolver reading from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, scale: Scale) -> Self {
        Self {
            root: root.into(),
            scale,
        }
    }

    /// Loads the course map from `file`, relative to the root.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ContentNotFound` if the file is missing and
    /// `DomainError::InvalidContent` if it does not parse or is empty.
    pub async fn load_course(&self, file: &str) -> Result<Course, DomainError> {
        let path = self.root.join(file);
        let yaml = read(&path).await?;
        let course = compile_course(parse_course(&yaml)?, self.scale)?;
        info!(
            path = %path.display(),
            sessions = course.session_count(),
            "course loaded"
        );
        Ok(course)
    }
}

#[async_trait]
impl ContentResolver for YamlContentResolver {
    async fn resolve(
        &self,
        index: u32,
        descriptor: &SessionDescriptor,
    ) -> Result<Session, DomainError> {
        let path = self.root.join(&descriptor.0);
        let mut source = parse_session(&read(&path).await?)?;

        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        for level in &mut source.levels {
            if level.paper.markdown.is_some() {
                continue;
            }
            if let Some(file) = &level.paper.file {
                let paper_path = dir.join(file);
                debug!(path = %paper_path.display(), "loading paper");
                level.paper.markdown = Some(read(&paper_path).await?);
            }
        }

        let session = compile_session(source, self.scale)?;
        info!(
            session = index,
            path = %path.display(),
            levels = session.level_count(),
            "session resolved"
        );
        Ok(session)
    }
}

async fn read(path: &Path) -> Result<String, DomainError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            DomainError::ContentNotFound(path.display().to_string())
        } else {
            DomainError::InvalidContent(format!("{}: {e}", path.display()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_core::geometry::Rect;

    const COURSE: &str = r"
title: Casebook
sessions:
  - title: The Manor
    marker: { x: 10, y: 10, width: 40, height: 40 }
    source: manor/session.yaml
";

    const SESSION: &str = r"
title: The Manor
background: maps/manor.png
levels:
  - title: The Study
    marker: { x: 100, y: 100, width: 50, height: 50 }
    paper:
      title: Case notes
      file: study.md
    prompt: Pick the clues.
    picture: rooms/study.png
    correct: [2, 5, 8]
    scenes:
      - question: Where is the key?
        widgets:
          - kind: choice
            bounds: { x: 0, y: 0, width: 100, height: 100 }
            options: [Lamp, Drawer]
            answer: 0
";

    fn write_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("manor")).unwrap();
        std::fs::write(dir.path().join("course.yaml"), COURSE).unwrap();
        std::fs::write(dir.path().join("manor/session.yaml"), SESSION).unwrap();
        std::fs::write(
            dir.path().join("manor/study.md"),
            "# Study\n\nThe key is under the lamp.\n",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_course_scales_markers() {
        // Arrange
        let dir = write_tree();
        let resolver = YamlContentResolver::new(dir.path(), Scale(0.5));

        // Act
        let course = resolver.load_course("course.yaml").await.unwrap();

        // Assert
        assert_eq!(course.session_count(), 1);
        assert_eq!(course.sessions[0].marker, Rect::new(5.0, 5.0, 20.0, 20.0));
        assert_eq!(
            course.sessions[0].descriptor,
            SessionDescriptor("manor/session.yaml".to_owned())
        );
    }

    #[tokio::test]
    async fn test_resolve_inlines_paper_files() {
        // Arrange
        let dir = write_tree();
        let resolver = YamlContentResolver::new(dir.path(), Scale::IDENTITY);
        let descriptor = SessionDescriptor("manor/session.yaml".to_owned());

        // Act
        let session = resolver.resolve(0, &descriptor).await.unwrap();

        // Assert
        assert_eq!(session.background.as_deref(), Some("maps/manor.png"));
        let level = session.level(0).unwrap();
        assert_eq!(level.paper.title, "Case notes");
        assert_eq!(level.paper.blocks.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_missing_session_is_not_found() {
        let dir = write_tree();
        let resolver = YamlContentResolver::new(dir.path(), Scale::IDENTITY);

        let result = resolver
            .resolve(3, &SessionDescriptor("missing.yaml".to_owned()))
            .await;

        assert!(matches!(result, Err(DomainError::ContentNotFound(_))));
    }
}
