/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use vidmux::errors::OutputError;
use vidmux::file_utils::FileManager;
use crate::common;

fn exts(list: &[&str]) -> Vec<String> {
    list.iter().map(|e| e.to_string()).collect()
}

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test extension matching is case-insensitive and dot-agnostic
#[test]
fn test_has_extension_withMixedCase_shouldMatch() {
    let wanted = exts(&[".mkv", "mp4"]);
    assert!(FileManager::has_extension("a/Movie.MKV", &wanted));
    assert!(FileManager::has_extension("Movie.mp4", &wanted));
    assert!(!FileManager::has_extension("Movie.srt", &wanted));
    assert!(!FileManager::has_extension("mkv", &wanted));
}

/// Test recursive search returns matches in lexical order
#[test]
fn test_find_files_with_extensions_withNestedDirs_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b/second.mkv", "")?;
    common::create_test_file(root, "a/first.MP4", "")?;
    common::create_test_file(root, "a/notes.txt", "")?;
    common::create_test_file(root, "c.avi", "")?;

    let files = FileManager::find_files_with_extensions(root, &exts(&[".mp4", ".mkv", ".avi"]))?;
    let names: Vec<String> = files.iter().map(|f| FileManager::relative_name(root, f)).collect();

    assert_eq!(names, vec!["a/first.MP4", "b/second.mkv", "c.avi"]);
    Ok(())
}

/// Test that ordering is by full path, not per directory
#[test]
fn test_find_files_with_extensions_withSpaceInDirName_shouldSortByFullPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a/x.mkv", "")?;
    common::create_test_file(root, "a b/x.mkv", "")?;
    common::create_test_file(root, "a.mkv", "")?;

    let files = FileManager::find_files_with_extensions(root, &exts(&[".mkv"]))?;
    let names: Vec<String> = files.iter().map(|f| FileManager::relative_name(root, f)).collect();

    assert_eq!(names, vec!["a b/x.mkv", "a.mkv", "a/x.mkv"]);
    Ok(())
}

/// Test that a missing library directory is an error
#[test]
fn test_find_files_with_extensions_withMissingDir_shouldFail() {
    assert!(FileManager::find_files_with_extensions("./non_existent_directory_12345", &exts(&[".mkv"])).is_err());
}

/// Test backup naming
#[test]
fn test_backup_path_withSuffix_shouldAppendToFileName() {
    assert_eq!(
        FileManager::backup_path("/tmp/movie.srt", ".bak"),
        Path::new("/tmp/movie.srt.bak")
    );
}

/// Test atomic replacement of an existing file
#[test]
fn test_write_atomically_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "out.txt", "old")?;

    FileManager::write_atomically(&file, b"new")?;

    assert_eq!(fs::read_to_string(&file)?, "new");
    // No temporary files left behind
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

/// Test that writing into a missing directory is an output error
#[test]
fn test_write_atomically_withMissingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("missing").join("out.txt");

    let result = FileManager::write_atomically(&target, b"data");

    assert!(matches!(result, Err(OutputError::Write { .. })));
    assert!(!target.exists());
    Ok(())
}
