//! Slide image storage and normalisation.
//!
//! Uploaded slide images are stored under
//! `{media_root}/{organisation_slug}/{presentation_slug}/{presentation_id}/{file}`
//! and resized in place to a fixed width as soon as the slide is saved.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use crate::errors::AppError;

/// Width every stored slide image is scaled to.
pub const SLIDE_IMAGE_WIDTH: u32 = 700;

/// Target size for an image of `width`x`height` scaled to `target_width`,
/// preserving the aspect ratio. The height is truncated, never below 1.
///
/// Narrower images are scaled *up* as well.
pub fn target_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width == 0 {
        return (target_width, height.max(1));
    }
    let ratio = target_width as f64 / width as f64;
    let scaled = (height as f64 * ratio) as u32;
    (target_width, scaled.max(1))
}

/// Relative storage path for a slide image. Only the final component of
/// `filename` is used so a client can't escape the presentation directory.
pub fn upload_path(
    organisation_slug: &str,
    presentation_slug: &str,
    presentation_id: i64,
    filename: &str,
) -> Result<PathBuf, AppError> {
    let file = Path::new(filename)
        .file_name()
        .and_then(|f| f.to_str())
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::Validation(format!("invalid image filename {filename:?}")))?;

    Ok(PathBuf::from(organisation_slug)
        .join(presentation_slug)
        .join(presentation_id.to_string())
        .join(file))
}

/// Write raw upload bytes below `media_root`, creating directories as needed.
///
/// An existing file is never replaced: when `relative` is taken the upload is
/// stored as `{stem}_{n}.{ext}` with the first free `n`. Returns the relative
/// path actually written.
pub fn store_upload(media_root: &Path, relative: &Path, bytes: &[u8]) -> Result<PathBuf, AppError> {
    let dir = relative.parent().unwrap_or_else(|| Path::new(""));
    std::fs::create_dir_all(media_root.join(dir))?;

    let mut attempt = 0u32;
    loop {
        let candidate = match attempt {
            0 => relative.to_path_buf(),
            n => dir.join(numbered_name(relative, n)),
        };
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(media_root.join(&candidate))
        {
            Ok(mut file) => {
                file.write_all(bytes)?;
                if attempt > 0 {
                    log::debug!("{} taken, stored upload as {}", relative.display(), candidate.display());
                }
                return Ok(candidate);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

fn numbered_name(file: &Path, n: u32) -> String {
    let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or("upload");
    match file.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{n}.{ext}"),
        None => format!("{stem}_{n}"),
    }
}

/// Resize the image at `path` to `target_width` (aspect preserved) and
/// overwrite the file. Returns the new dimensions.
///
/// Decode and IO failures are returned as-is; the file is left untouched
/// in that case.
pub fn normalize_image(path: &Path, target_width: u32) -> Result<(u32, u32), AppError> {
    let img = image::open(path)?;
    let (width, height) = target_dimensions(img.width(), img.height(), target_width);

    log::debug!(
        "Resizing {} from {}x{} to {}x{}",
        path.display(),
        img.width(),
        img.height(),
        width,
        height
    );

    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    resized.save(path)?;
    Ok((width, height))
}

/// Hook run after a slide has been persisted. Does nothing when the slide has
/// no image.
pub fn on_slide_saved(media_root: &Path, image: Option<&str>) -> Result<Option<(u32, u32)>, AppError> {
    match image.filter(|p| !p.is_empty()) {
        Some(relative) => {
            let dims = normalize_image(&media_root.join(relative), SLIDE_IMAGE_WIDTH)?;
            log::info!("Normalised slide image {relative} to {}x{}", dims.0, dims.1);
            Ok(Some(dims))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn wide_image_keeps_aspect_ratio() {
        assert_eq!(target_dimensions(1400, 800, 700), (700, 400));
    }

    #[test]
    fn narrow_image_is_upscaled() {
        assert_eq!(target_dimensions(300, 200, 700), (700, 466));
    }

    #[test]
    fn height_never_collapses_to_zero() {
        assert_eq!(target_dimensions(10_000, 1, 700), (700, 1));
    }

    #[test]
    fn upload_path_is_keyed_by_org_presentation_and_id() {
        let path = upload_path("acme", "intro-deck", 42, "cover.png").unwrap();
        assert_eq!(path, PathBuf::from("acme/intro-deck/42/cover.png"));
    }

    #[test]
    fn upload_path_strips_directories_from_filename() {
        let path = upload_path("acme", "deck", 1, "../../etc/passwd").unwrap();
        assert_eq!(path, PathBuf::from("acme/deck/1/passwd"));
    }

    #[test]
    fn upload_path_rejects_empty_filename() {
        assert!(matches!(upload_path("acme", "deck", 1, ""), Err(AppError::Validation(_))));
    }

    #[test]
    fn normalize_overwrites_file_with_target_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "slide.png", 1400, 800);

        let dims = normalize_image(&path, SLIDE_IMAGE_WIDTH).unwrap();
        assert_eq!(dims, (700, 400));

        let reopened = image::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (700, 400));
    }

    #[test]
    fn normalize_upscales_small_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "small.png", 300, 200);

        normalize_image(&path, SLIDE_IMAGE_WIDTH).unwrap();
        let reopened = image::open(&path).unwrap();
        assert_eq!(reopened.width(), 700);
    }

    #[test]
    fn normalize_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = normalize_image(&dir.path().join("nope.png"), SLIDE_IMAGE_WIDTH).unwrap_err();
        assert!(matches!(err, AppError::Image(_) | AppError::Io(_)));
    }

    #[test]
    fn normalize_fails_for_garbage_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(normalize_image(&path, SLIDE_IMAGE_WIDTH).is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"definitely not a png");
    }

    #[test]
    fn on_slide_saved_skips_slides_without_image() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(on_slide_saved(dir.path(), None).unwrap(), None);
        assert_eq!(on_slide_saved(dir.path(), Some("")).unwrap(), None);
    }

    #[test]
    fn store_then_normalize_via_hook() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_png(dir.path(), "upload.png", 1400, 800);
        let bytes = std::fs::read(&src).unwrap();

        let relative = upload_path("acme", "deck", 3, "upload.png").unwrap();
        let relative = store_upload(dir.path(), &relative, &bytes).unwrap();

        let dims = on_slide_saved(dir.path(), relative.to_str()).unwrap();
        assert_eq!(dims, Some((700, 400)));
    }

    #[test]
    fn same_filename_twice_keeps_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let relative = upload_path("acme", "deck", 1, "cover.png").unwrap();

        let first = store_upload(dir.path(), &relative, b"slide A bytes").unwrap();
        let second = store_upload(dir.path(), &relative, b"slide B bytes").unwrap();
        let third = store_upload(dir.path(), &relative, b"slide C bytes").unwrap();

        assert_eq!(first, PathBuf::from("acme/deck/1/cover.png"));
        assert_eq!(second, PathBuf::from("acme/deck/1/cover_1.png"));
        assert_eq!(third, PathBuf::from("acme/deck/1/cover_2.png"));
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"slide A bytes");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"slide B bytes");
    }

    #[test]
    fn numbered_name_without_extension() {
        assert_eq!(numbered_name(Path::new("a/b/README"), 3), "README_3");
    }
}
