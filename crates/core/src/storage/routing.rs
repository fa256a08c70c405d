//! Folder routing policy.
//!
//! Pure decision logic mapping content attributes to a canonical storage
//! path prefix. This determines the destination folder for every upload; it
//! performs no I/O and has no failure modes.

/// Whether an object is publicly resolvable or access-controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Anyone with the URL may read the object.
    Public,
    /// Access requires a signed URL.
    Private,
}

/// Content category of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Ordinary application content.
    General,
    /// Restricted content such as identity-verification evidence.
    Restricted,
}

/// Broad media kind of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Photographic or graphic content.
    Image,
    /// Everything else (documents, video, archives).
    Other,
}

/// Map content attributes to the canonical storage folder prefix.
///
/// Private restricted content always nests under `private/restricted/`.
/// Public content collapses the category flag: there is no public
/// restricted distinction, restricted material is only ever stored private.
#[must_use]
pub fn route_folder(visibility: Visibility, category: Category, kind: MediaKind) -> &'static str {
    match (visibility, category, kind) {
        (Visibility::Public, _, MediaKind::Image) => "public/images",
        (Visibility::Public, _, MediaKind::Other) => "public/documents",
        (Visibility::Private, Category::General, MediaKind::Image) => "private/images",
        (Visibility::Private, Category::General, MediaKind::Other) => "private/documents",
        (Visibility::Private, Category::Restricted, MediaKind::Image) => {
            "private/restricted/images"
        }
        (Visibility::Private, Category::Restricted, MediaKind::Other) => {
            "private/restricted/documents"
        }
    }
}

/// Whether a destination folder holds access-controlled content.
#[must_use]
pub fn is_private_folder(folder: &str) -> bool {
    folder == "private" || folder.starts_with("private/")
}
