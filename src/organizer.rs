/// Directory scanning, placement, and move execution.
///
/// The organizer enumerates the root directory plus every managed category
/// folder that already exists (one level deep, never recursing), classifies
/// each file, and moves it to its category folder, resolving name
/// collisions with a numbered suffix. A failure while processing one file
/// is reported as an [`Outcome::Failed`] for that file and never aborts the
/// rest of the batch.
use crate::classifier::{Category, Classifier};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

/// Matches a trailing parenthesized counter in a file stem, e.g. "name (3)".
static NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)$").expect("collision suffix pattern is valid"));

/// One filesystem entry under consideration for a single run.
///
/// Materialized fresh by enumeration and discarded when the run ends. The
/// modification time is read during per-file processing, not here, so that
/// a metadata failure stays isolated to the file it belongs to.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Full path to the entry.
    pub path: PathBuf,
    /// Basename, used for exclusion checks and reporting.
    pub name: String,
}

/// The computed destination for one candidate, after collision handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
    /// The category the file classified into.
    pub category: Category,
    /// Final resolved absolute target path.
    pub target: PathBuf,
}

/// The reported result for one processed file.
///
/// `target` paths are relative to the organized root. Files already sitting
/// at their computed destination produce no outcome at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was moved (live mode).
    Moved { file: String, target: PathBuf },
    /// The file would be moved (dry-run mode).
    WouldMove { file: String, target: PathBuf },
    /// Processing this file failed; the rest of the batch continued.
    Failed { file: String, reason: String },
}

impl Outcome {
    /// Basename of the file this outcome refers to.
    pub fn file(&self) -> &str {
        match self {
            Outcome::Moved { file, .. }
            | Outcome::WouldMove { file, .. }
            | Outcome::Failed { file, .. } => file,
        }
    }
}

/// Run-level errors. Per-file failures are [`Outcome::Failed`] instead.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root directory could not be enumerated.
    RootUnreadable { path: PathBuf, source: io::Error },
    /// An existing managed folder could not be enumerated.
    ManagedDirUnreadable { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootUnreadable { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::ManagedDirUnreadable { path, source } => {
                write!(
                    f,
                    "Failed to read managed folder {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RootUnreadable { source, .. } | Self::ManagedDirUnreadable { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Result type for run-level organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Classifies and relocates files under a root directory.
pub struct Organizer {
    classifier: Classifier,
    excluded: HashSet<String>,
}

impl Organizer {
    /// Creates an organizer with the given classifier and exclusion set.
    ///
    /// Files whose basename appears in `excluded` are never moved and never
    /// reported, in either mode.
    pub fn new(classifier: Classifier, excluded: HashSet<String>) -> Self {
        Self {
            classifier,
            excluded,
        }
    }

    /// Organizes every eligible file under `root`.
    ///
    /// Enumerates regular files directly inside `root` and directly inside
    /// each managed category folder that exists, then classifies and
    /// relocates each one. In dry-run mode nothing on disk changes, not
    /// even directory creation; the returned outcomes describe what live
    /// mode would do.
    ///
    /// Files already at their computed destination produce no outcome, so
    /// a second run over an unchanged tree reports nothing.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError`] if the root or an existing managed folder
    /// cannot be enumerated. Failures scoped to a single file come back as
    /// [`Outcome::Failed`] entries instead.
    pub fn organize(&self, root: &Path, dry_run: bool) -> OrganizeResult<Vec<Outcome>> {
        let now = SystemTime::now();
        let candidates = self.collect(root)?;

        let mut outcomes = Vec::new();
        for file in &candidates {
            if self.excluded.contains(&file.name) {
                continue;
            }
            match self.place(root, file, now, dry_run) {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => {}
                Err(e) => outcomes.push(Outcome::Failed {
                    file: file.name.clone(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok(outcomes)
    }

    /// Collects candidates from the root and every existing managed folder.
    fn collect(&self, root: &Path) -> OrganizeResult<Vec<CandidateFile>> {
        let mut files = Vec::new();

        push_files(root, &mut files).map_err(|source| OrganizeError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        for name in Category::managed_dir_names() {
            let dir = root.join(name);
            if !dir.is_dir() {
                continue;
            }
            push_files(&dir, &mut files).map_err(|source| OrganizeError::ManagedDirUnreadable {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(files)
    }

    /// Processes one candidate: classify, resolve, then move or simulate.
    ///
    /// Returns `Ok(None)` when the file is already where it belongs.
    fn place(
        &self,
        root: &Path,
        file: &CandidateFile,
        now: SystemTime,
        dry_run: bool,
    ) -> io::Result<Option<Outcome>> {
        let Some(decision) = self.decide(root, file, now)? else {
            return Ok(None);
        };

        let target = decision
            .target
            .strip_prefix(root)
            .unwrap_or(&decision.target)
            .to_path_buf();

        if dry_run {
            return Ok(Some(Outcome::WouldMove {
                file: file.name.clone(),
                target,
            }));
        }

        if let Some(parent) = decision.target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&file.path, &decision.target)?;

        Ok(Some(Outcome::Moved {
            file: file.name.clone(),
            target,
        }))
    }

    /// Computes the placement for one candidate without touching the disk.
    ///
    /// Returns `Ok(None)` when the resolved target equals the source path.
    fn decide(
        &self,
        root: &Path,
        file: &CandidateFile,
        now: SystemTime,
    ) -> io::Result<Option<PlacementDecision>> {
        let modified = fs::metadata(&file.path)?.modified()?;
        let category = self.classifier.classify(&file.name, modified, now);

        let naive = root.join(category.dir_name()).join(&file.name);

        // Only a distinct entry at the target is a collision; the source
        // already sitting there means the file is correctly placed.
        let target = if naive.exists() && naive != file.path {
            resolve_collision(&naive)
        } else {
            naive
        };

        if target == file.path {
            return Ok(None);
        }
        Ok(Some(PlacementDecision { category, target }))
    }
}

/// Appends regular files directly inside `dir` to `out`.
///
/// Individual entries that cannot be inspected are skipped; only the
/// directory read itself propagates an error.
fn push_files(dir: &Path, out: &mut Vec<CandidateFile>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            out.push(CandidateFile {
                path: entry.path(),
                name: entry.file_name().to_string_lossy().into_owned(),
            });
        }
    }
    Ok(())
}

/// Finds a non-colliding sibling path for an occupied target.
///
/// The stem's existing `"(n)"` suffix, if any, is stripped before a new
/// number is chosen, so suffixes never stack: `"name (2).txt"` colliding
/// again yields `"name (3).txt"`, not `"name (2) (1).txt"`. Probing starts
/// at the stripped number plus one (or 1 for plain stems) and walks upward
/// until an unoccupied path is found.
pub fn resolve_collision(target: &Path) -> PathBuf {
    let directory = target.parent().map(Path::to_path_buf).unwrap_or_default();
    let filename = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = split_name(&filename);

    let (base, start) = match NUMBER_SUFFIX.find(stem) {
        Some(m) => {
            let digits = &stem[m.start() + 1..m.end() - 1];
            match digits.parse::<u64>() {
                Ok(n) => (stem[..m.start()].trim_end(), n.saturating_add(1)),
                // A counter too large for u64 is treated as part of the stem.
                Err(_) => (stem, 1),
            }
        }
        None => (stem, 1),
    };

    let mut number = start;
    loop {
        let candidate = directory.join(format!("{base} ({number}){ext}"));
        if !candidate.exists() {
            return candidate;
        }
        number += 1;
    }
}

/// Splits a filename into stem and extension, keeping the dot on the
/// extension. Uses the same last-dot rule as the classifier: a leading dot
/// does not start an extension.
fn split_name(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => (&filename[..idx], &filename[idx..]),
        _ => (filename, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use std::fs::File;
    use tempfile::TempDir;

    fn organizer() -> Organizer {
        Organizer::new(Classifier::default(), HashSet::new())
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("noext"), ("noext", ""));
        assert_eq!(split_name(".bashrc"), (".bashrc", ""));
        assert_eq!(split_name("report (1).pdf"), ("report (1)", ".pdf"));
    }

    #[test]
    fn test_resolve_collision_plain_name_starts_at_one() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("report.pdf");
        File::create(&target).expect("Failed to create file");

        let resolved = resolve_collision(&target);
        assert_eq!(resolved, temp_dir.path().join("report (1).pdf"));
    }

    #[test]
    fn test_resolve_collision_skips_occupied_numbers() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for name in ["report.pdf", "report (1).pdf", "report (2).pdf"] {
            File::create(temp_dir.path().join(name)).expect("Failed to create file");
        }

        let resolved = resolve_collision(&temp_dir.path().join("report.pdf"));
        assert_eq!(resolved, temp_dir.path().join("report (3).pdf"));
    }

    #[test]
    fn test_resolve_collision_never_stacks_suffixes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        File::create(temp_dir.path().join("report (2).pdf")).expect("Failed to create file");

        let resolved = resolve_collision(&temp_dir.path().join("report (2).pdf"));
        assert_eq!(resolved, temp_dir.path().join("report (3).pdf"));
    }

    #[test]
    fn test_resolve_collision_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        File::create(temp_dir.path().join("notes")).expect("Failed to create file");

        let resolved = resolve_collision(&temp_dir.path().join("notes"));
        assert_eq!(resolved, temp_dir.path().join("notes (1)"));
    }

    #[test]
    fn test_resolve_collision_parenthesized_but_not_a_counter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        File::create(temp_dir.path().join("notes (draft).txt")).expect("Failed to create file");

        // "(draft)" is not a number, so it stays part of the stem.
        let resolved = resolve_collision(&temp_dir.path().join("notes (draft).txt"));
        assert_eq!(resolved, temp_dir.path().join("notes (draft) (1).txt"));
    }

    #[test]
    fn test_resolve_collision_oversized_counter_kept_in_stem() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let name = "big (99999999999999999999999).txt";
        File::create(temp_dir.path().join(name)).expect("Failed to create file");

        let resolved = resolve_collision(&temp_dir.path().join(name));
        assert_eq!(
            resolved,
            temp_dir
                .path()
                .join("big (99999999999999999999999) (1).txt")
        );
    }

    #[test]
    fn test_organize_nonexistent_root_is_an_error() {
        let result = organizer().organize(Path::new("/nonexistent/tidybox-root"), false);
        assert!(matches!(result, Err(OrganizeError::RootUnreadable { .. })));
    }

    #[test]
    fn test_fresh_file_moves_to_recent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("photo.png");
        File::create(&file).expect("Failed to create file");

        let outcomes = organizer()
            .organize(temp_dir.path(), false)
            .expect("organize failed");

        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            outcomes[0],
            Outcome::Moved {
                file: "photo.png".to_string(),
                target: PathBuf::from("recent/photo.png"),
            }
        );
        assert!(temp_dir.path().join("recent/photo.png").exists());
        assert!(!file.exists());
    }

    #[test]
    fn test_excluded_file_is_untouched_and_unreported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        File::create(temp_dir.path().join("tidybox.json")).expect("Failed to create file");

        let excluded: HashSet<String> = ["tidybox.json".to_string()].into();
        let outcomes = Organizer::new(Classifier::default(), excluded)
            .organize(temp_dir.path(), false)
            .expect("organize failed");

        assert!(outcomes.is_empty());
        assert!(temp_dir.path().join("tidybox.json").exists());
    }

    #[test]
    fn test_dry_run_reports_without_moving() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("photo.png");
        File::create(&file).expect("Failed to create file");

        let outcomes = organizer()
            .organize(temp_dir.path(), true)
            .expect("organize failed");

        assert_eq!(
            outcomes,
            vec![Outcome::WouldMove {
                file: "photo.png".to_string(),
                target: PathBuf::from("recent/photo.png"),
            }]
        );
        assert!(file.exists());
        assert!(!temp_dir.path().join("recent").exists());
    }

    #[test]
    fn test_subdirectories_are_not_candidates() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("projects")).expect("Failed to create dir");
        File::create(temp_dir.path().join("projects/notes.txt")).expect("Failed to create file");

        let outcomes = organizer()
            .organize(temp_dir.path(), false)
            .expect("organize failed");

        assert!(outcomes.is_empty());
        assert!(temp_dir.path().join("projects/notes.txt").exists());
    }
}
