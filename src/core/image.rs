use std::path::Path;

/// Suffixes that mark a file as an image. Matching is case-sensitive.
pub const IMAGE_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp"];

/// True if the final component of `path` ends with one of [`IMAGE_EXTENSIONS`].
pub fn is_image_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
