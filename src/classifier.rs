/// Age- and extension-based file classification.
///
/// Classification is age-first: anything modified within the last seven days
/// is "recent" no matter what its extension says. Only older files fall
/// through to the extension table.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use tidybox::classifier::{Category, Classifier};
///
/// let classifier = Classifier::default();
/// let now = SystemTime::now();
/// let old = now - Duration::from_secs(30 * 24 * 60 * 60);
///
/// assert_eq!(classifier.classify("photo.png", now, now), Category::Recent);
/// assert_eq!(classifier.classify("photo.png", old, now), Category::Images);
/// assert_eq!(classifier.classify("mystery.xyz", old, now), Category::Other);
/// ```
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, SystemTime};

/// Files modified less than this long ago classify as [`Category::Recent`].
pub const RECENT_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The closed set of destinations a file can be classified into.
///
/// Each category owns exactly one folder directly under the organized root;
/// together those folders form the managed-directory set the organizer
/// rescans on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Modified within the last seven days, regardless of extension.
    Recent,
    Images,
    Videos,
    Audio,
    Documents,
    Applications,
    Code,
    Archives,
    /// Extension unknown to the table, or no extension at all.
    Other,
}

impl Category {
    /// Every category, in the order their folders are scanned.
    pub const ALL: [Category; 9] = [
        Category::Recent,
        Category::Images,
        Category::Videos,
        Category::Audio,
        Category::Documents,
        Category::Applications,
        Category::Code,
        Category::Archives,
        Category::Other,
    ];

    /// Returns the folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidybox::classifier::Category;
    ///
    /// assert_eq!(Category::Recent.dir_name(), "recent");
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Recent => "recent",
            Category::Images => "Images",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Documents => "Documents",
            Category::Applications => "Applications",
            Category::Code => "Code",
            Category::Archives => "Archives",
            Category::Other => "Other",
        }
    }

    /// Folder names of all managed directories.
    pub fn managed_dir_names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(Category::dir_name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// An extension was bound to two different categories.
///
/// The table refuses overlapping bindings outright rather than letting
/// insertion order decide which category wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlappingExtension {
    /// The extension (lowercased, no leading dot) that was bound twice.
    pub extension: String,
    /// The category the extension was already bound to.
    pub existing: Category,
    /// The category the caller tried to bind it to.
    pub conflicting: Category,
}

impl fmt::Display for OverlappingExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extension '{}' is already mapped to {} and cannot also map to {}",
            self.extension, self.existing, self.conflicting
        )
    }
}

impl std::error::Error for OverlappingExtension {}

/// Extensions assigned to each category out of the box.
const BUILTIN_MAPPINGS: &[(Category, &[&str])] = &[
    (
        Category::Images,
        &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"],
    ),
    (
        Category::Videos,
        &["mp4", "mkv", "avi", "mov", "wmv", "webm"],
    ),
    (Category::Audio, &["mp3", "wav", "flac", "aac", "ogg"]),
    (
        Category::Documents,
        &[
            "pdf", "doc", "docx", "txt", "ppt", "pptx", "xls", "xlsx", "vtt",
        ],
    ),
    (Category::Applications, &["exe", "msi", "dmg", "apk"]),
    (
        Category::Code,
        &[
            "py", "js", "java", "cpp", "c", "cs", "go", "rs", "html", "css", "json", "xml", "yaml",
            "yml", "md",
        ],
    ),
    (Category::Archives, &["zip", "rar", "7z", "tar", "gz"]),
];

/// Maps lowercase file extensions to categories.
///
/// The table is an immutable value for the duration of a run; it is built
/// up front and handed to the [`Classifier`] rather than living in global
/// state. Extensions are mutually exclusive across categories: binding one
/// extension to two categories is a construction error.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    map: HashMap<String, Category>,
}

impl ExtensionTable {
    /// Creates an empty table. Every lookup falls back to [`Category::Other`].
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Creates the built-in table used by the default classifier.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (category, extensions) in BUILTIN_MAPPINGS {
            for ext in *extensions {
                table
                    .insert(ext, *category)
                    .expect("built-in extension table contains an overlap");
            }
        }
        table
    }

    /// Binds an extension to a category.
    ///
    /// Extensions are normalized to lowercase and stripped of a leading dot.
    /// Re-binding an extension to the category it already maps to is a
    /// no-op; binding it to a different category is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`OverlappingExtension`] if the extension already maps to a
    /// different category.
    pub fn insert(&mut self, ext: &str, category: Category) -> Result<(), OverlappingExtension> {
        let key = ext.trim_start_matches('.').to_lowercase();
        match self.map.get(&key) {
            Some(existing) if *existing != category => Err(OverlappingExtension {
                extension: key,
                existing: *existing,
                conflicting: category,
            }),
            Some(_) => Ok(()),
            None => {
                self.map.insert(key, category);
                Ok(())
            }
        }
    }

    /// Looks up a category by extension (case-insensitive).
    pub fn lookup(&self, ext: &str) -> Option<Category> {
        self.map.get(&ext.to_lowercase()).copied()
    }

    /// Number of extensions in the table.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the table holds no mappings.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Classifies files by age and extension.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    table: ExtensionTable,
}

impl Classifier {
    /// Creates a classifier over the given extension table.
    pub fn new(table: ExtensionTable) -> Self {
        Self { table }
    }

    /// Computes the category for a file.
    ///
    /// Recency wins over everything: if `modified` is less than seven days
    /// before `now` (or lies in the future), the result is
    /// [`Category::Recent`]. Otherwise the filename's extension decides,
    /// with unknown or missing extensions landing in [`Category::Other`].
    ///
    /// Total function: never fails, always yields exactly one category.
    pub fn classify(&self, filename: &str, modified: SystemTime, now: SystemTime) -> Category {
        // A clock skew that puts the mtime in the future clamps to age zero.
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age < RECENT_WINDOW {
            return Category::Recent;
        }
        self.table
            .lookup(extension_of(filename))
            .unwrap_or(Category::Other)
    }
}

/// Extracts the extension: the substring after the last dot, without the dot.
///
/// A dot in the first position does not start an extension, so dotfiles like
/// `.bashrc` have none. Names without a dot, or ending in a dot, yield `""`.
pub fn extension_of(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[idx + 1..],
        _ => "",
    }
}
