//! End-to-end tests for loading, validating and staging course modules.
//!
//! These tests build a small course on disk and verify the complete flow:
//! - YAML descriptor → Module → validation
//! - Module → build directory with every submission artifact
//! - Generated `.meta` → Module, matching the YAML load
//!
//! Run with: `cargo test --test module_staging`

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use coursepack::{Module, StageError, StageOptions};

// ============================================================================
// Fixtures
// ============================================================================

const COURSE_ID: &str = "foo-fundamentals";

const M1_DESCRIPTOR: &str = "\
module:
  title: Introduction to the Foo Framework
  description: >
    Brief customer facing description of module.
  clips:
    - What is Foo?
    - Installing Foo
    - Your first Foo app
";

const M3_DESCRIPTOR: &str = "\
module:
  title: Deploying Foo
  description: >
    Shipping a Foo app to production.
  clips:
    - Packaging
";

/// On-disk course with a module folder per module plus a clip folder.
struct Course {
    root: TempDir,
}

impl Course {
    fn new() -> Self {
        let course = Self {
            root: TempDir::new().unwrap(),
        };

        let m1 = course.module_dir("m1-fooFunModule");
        fs::write(m1.join("module.yaml"), M1_DESCRIPTOR).unwrap();
        fs::create_dir_all(m1.join("ExBefore").join("src")).unwrap();
        fs::write(m1.join("ExBefore").join("src").join("app.js"), "// start").unwrap();
        fs::write(m1.join("questions.txt"), "What is Foo?\n").unwrap();
        fs::write(m1.join("slides.pptx"), "m1 deck").unwrap();

        let m3 = course.module_dir("m3-fooDeploy");
        fs::write(m3.join("module.yaml"), M3_DESCRIPTOR).unwrap();
        fs::write(m3.join("no-questions.txt"), "").unwrap();
        fs::write(m3.join("slides.pptx"), "m3 deck").unwrap();

        let clips = course.clip_dir();
        fs::create_dir_all(&clips).unwrap();
        for position in 1..=3 {
            fs::write(
                clips.join(format!("m1-fooFunModule-0{}.mp4", position)),
                format!("m1 clip {}", position),
            )
            .unwrap();
        }
        fs::write(clips.join("m3-fooDeploy-01.mp4"), "m3 clip 1").unwrap();

        course
    }

    fn module_dir(&self, id: &str) -> PathBuf {
        let dir = self.root.path().join("source").join(id);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn descriptor(&self, id: &str) -> PathBuf {
        self.root.path().join("source").join(id).join("module.yaml")
    }

    fn clip_dir(&self) -> PathBuf {
        self.root.path().join("clips")
    }

    fn build_dir(&self, id: &str) -> PathBuf {
        self.root.path().join("build").join(id)
    }
}

fn zip_entries(path: &Path) -> BTreeSet<String> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test]
async fn test_stage_module_with_demos_and_questions() {
    let course = Course::new();
    let module = Module::load_from_yaml(COURSE_ID, course.descriptor("m1-fooFunModule"))
        .await
        .unwrap();
    assert!(module.validate().is_empty());

    let build = course.build_dir("m1");
    let staged = module
        .stage_all(&build, course.clip_dir(), &StageOptions::default())
        .await
        .unwrap();

    let expected: BTreeSet<String> = [
        "foo-fundamentals-m1.meta",
        "demos.zip",
        "questions.txt",
        "slides.pptx",
        "foo-fundamentals-m1-01.mp4",
        "foo-fundamentals-m1-02.mp4",
        "foo-fundamentals-m1-03.mp4",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(file_names(&build), expected);
    assert_eq!(staged.file_count(), 7);

    let entries = zip_entries(&staged.demo_file);
    assert!(entries.contains("before/src/app.js"));
    assert!(entries.iter().all(|name| name.starts_with("before/")));

    let mut archive = ZipArchive::new(File::open(&staged.demo_file).unwrap()).unwrap();
    let mut content = String::new();
    archive
        .by_name("before/src/app.js")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "// start");

    assert_eq!(
        fs::read_to_string(&staged.questions_file).unwrap(),
        "What is Foo?\n"
    );
    assert_eq!(
        fs::read_to_string(&staged.clips[1]).unwrap(),
        "m1 clip 2"
    );
}

#[tokio::test]
async fn test_stage_module_without_demos() {
    let course = Course::new();
    let module = Module::load_from_yaml(COURSE_ID, course.descriptor("m3-fooDeploy"))
        .await
        .unwrap();
    assert_eq!(module.index, 3);

    let build = course.build_dir("m3");
    let staged = module
        .stage_all(&build, course.clip_dir(), &StageOptions::default())
        .await
        .unwrap();

    assert_eq!(staged.demo_file, build.join("no-demos.txt"));
    assert_eq!(fs::metadata(&staged.demo_file).unwrap().len(), 0);
    assert_eq!(staged.questions_file, build.join("no-questions.txt"));
    assert_eq!(staged.clips, vec![build.join("foo-fundamentals-m3-01.mp4")]);
    assert!(!build.join("demos.zip").exists());
}

#[tokio::test]
async fn test_generated_meta_matches_descriptor() {
    let course = Course::new();
    let from_yaml = Module::load_from_yaml(COURSE_ID, course.descriptor("m1-fooFunModule"))
        .await
        .unwrap();

    // Generate next to the descriptor so both loads derive the same identity
    let meta_path = from_yaml
        .create_meta_file(&from_yaml.full_path, &StageOptions::default())
        .await
        .unwrap();
    let from_meta = Module::load_from_meta(COURSE_ID, &meta_path).await.unwrap();

    assert_eq!(from_meta.title, from_yaml.title);
    assert_eq!(from_meta.description, from_yaml.description);
    assert_eq!(from_meta.clips().len(), from_yaml.clips().len());
    assert_eq!(from_meta, from_yaml);
}

#[tokio::test]
async fn test_stage_fails_without_questions() {
    let course = Course::new();
    let m3 = course.module_dir("m3-fooDeploy");
    fs::remove_file(m3.join("no-questions.txt")).unwrap();

    let module = Module::load_from_yaml(COURSE_ID, course.descriptor("m3-fooDeploy"))
        .await
        .unwrap();
    let result = module
        .stage_all(course.build_dir("m3"), course.clip_dir(), &StageOptions::default())
        .await;

    assert!(matches!(result, Err(StageError::QuestionsNotFound(_))));
}

#[tokio::test]
async fn test_validation_reports_long_titles() {
    let module = Module {
        title: "x".repeat(79),
        clips: Some(vec!["y".repeat(53), "z".repeat(70)]),
        ..Default::default()
    };

    assert_eq!(
        module.validate(),
        vec![
            "Module title length (79) invalid. Must be at most 65.".to_string(),
            "Clip #1 title length (70) invalid. Must be at most 65.".to_string(),
        ]
    );
}
