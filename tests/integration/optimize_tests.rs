//! WebP optimizer tests over temporary directory trees

use image::{DynamicImage, Rgba, RgbaImage};
use siteprobe::optimize::{encode_webp, optimize_directory, OptimizeOptions};
use siteprobe::OptimizeError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_webp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x / 16 % 256) as u8, (y / 16 % 256) as u8, 90, 255])
    });
    let bytes = encode_webp(&DynamicImage::ImageRgba8(img), 100).unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_wide_image_capped_at_default_width() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("hero.webp");
    write_webp(&file, 4000, 2000);

    let summary = optimize_directory(dir.path(), &OptimizeOptions::default()).unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_resized, 1);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(image::image_dimensions(&file).unwrap(), (2800, 1400));
}

#[test]
fn test_dry_run_leaves_files_untouched() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("photos").join("wide.webp");
    write_webp(&file, 600, 300);
    let before = fs::read(&file).unwrap();

    let options = OptimizeOptions {
        max_width: 400,
        dry_run: true,
        ..OptimizeOptions::default()
    };
    let summary = optimize_directory(dir.path(), &options).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.files_resized, 1);
    assert_eq!(fs::read(&file).unwrap(), before);
}

#[test]
fn test_hidden_and_vendor_directories_skipped() {
    let dir = TempDir::new().unwrap();
    write_webp(&dir.path().join("visible.webp"), 32, 32);
    write_webp(&dir.path().join(".cache").join("hidden.webp"), 32, 32);
    write_webp(&dir.path().join("node_modules").join("pkg.webp"), 32, 32);

    let hidden = dir.path().join(".cache").join("hidden.webp");
    let before = fs::read(&hidden).unwrap();

    let summary = optimize_directory(dir.path(), &OptimizeOptions::default()).unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(fs::read(&hidden).unwrap(), before);
}

#[test]
fn test_corrupt_file_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    write_webp(&dir.path().join("a.webp"), 64, 64);
    fs::write(dir.path().join("b.webp"), b"not an image").unwrap();
    write_webp(&dir.path().join("c.webp"), 64, 64);

    let summary = optimize_directory(dir.path(), &OptimizeOptions::default()).unwrap();

    assert_eq!(summary.files_processed, 3);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(
        image::image_dimensions(dir.path().join("c.webp")).unwrap(),
        (64, 64)
    );
}

#[test]
fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "hello").unwrap();

    let summary = optimize_directory(dir.path(), &OptimizeOptions::default()).unwrap();
    assert_eq!(summary.files_processed, 0);
    assert_eq!(summary.total_savings(), 0);
}

#[test]
fn test_missing_directory_rejected() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let result = optimize_directory(&missing, &OptimizeOptions::default());
    assert!(matches!(result, Err(OptimizeError::InvalidDirectory(_))));
}
