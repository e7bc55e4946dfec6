//! Centralized submission naming conventions.
//!
//! This module is the single source of truth for every filename the staging
//! pipeline reads or writes:
//! - Metadata files (e.g., `foo-fundamentals-m1.meta`)
//! - Source clips (e.g., `m1-fooFunModule-01.mp4`)
//! - Staged clips (e.g., `foo-fundamentals-m1-01.mp4`)
//! - Fixed-name module assets (`slides.pptx`, `questions.txt`, ...)
//!
//! Staging code should use these functions rather than formatting names directly,
//! so that the metadata file and the staged clips always agree.

/// Width of the positional suffix on clip filenames.
pub const CLIP_NUMBER_WIDTH: usize = 2;

/// Default clip file extension.
pub const DEFAULT_CLIP_EXTENSION: &str = "mp4";

/// Demo folder holding the starting state of a module's demos.
pub const DEMO_BEFORE_DIR: &str = "ExBefore";

/// Demo folder holding the finished state of a module's demos.
pub const DEMO_AFTER_DIR: &str = "ExAfter";

/// Archive entry prefix for the before demos.
pub const ARCHIVE_BEFORE_PREFIX: &str = "before";

/// Archive entry prefix for the after demos.
pub const ARCHIVE_AFTER_PREFIX: &str = "after";

/// Staged demo archive.
pub const DEMOS_ARCHIVE: &str = "demos.zip";

/// Placeholder written when a module has no demos.
pub const NO_DEMOS_FILE: &str = "no-demos.txt";

/// Assessment questions for a module.
pub const QUESTIONS_FILE: &str = "questions.txt";

/// Marker stating that a module deliberately has no questions.
pub const NO_QUESTIONS_FILE: &str = "no-questions.txt";

/// Slide deck for a module.
pub const SLIDES_FILE: &str = "slides.pptx";

/// Left-pad a number with zeros to `width` characters.
///
/// Numbers that already need more than `width` digits are returned unchanged,
/// never truncated.
///
/// # Examples
///
/// ```
/// use coursepack::naming::pad_leading_zeros;
///
/// assert_eq!(pad_leading_zeros(2, 1), "01");
/// assert_eq!(pad_leading_zeros(2, 12), "12");
/// assert_eq!(pad_leading_zeros(2, 123), "123");
/// ```
pub fn pad_leading_zeros(width: usize, number: usize) -> String {
    format!("{:0width$}", number, width = width)
}

/// Generate the metadata filename for a module.
///
/// # Format
///
/// `{course_id}-m{index}.meta`
///
/// # Examples
///
/// ```
/// use coursepack::naming::meta_filename;
///
/// assert_eq!(meta_filename("foo-fundamentals", 1), "foo-fundamentals-m1.meta");
/// ```
pub fn meta_filename(course_id: &str, index: u32) -> String {
    format!("{}-m{}.meta", course_id, index)
}

/// Generate the filename of a recorded clip as it sits in the clip folder.
///
/// `position` is 1-based.
///
/// # Format
///
/// `{module_id}-{pad2(position)}.{extension}`
///
/// # Examples
///
/// ```
/// use coursepack::naming::source_clip_filename;
///
/// assert_eq!(
///     source_clip_filename("m1-fooFunModule", 3, "mp4"),
///     "m1-fooFunModule-03.mp4"
/// );
/// ```
pub fn source_clip_filename(module_id: &str, position: usize, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        module_id,
        pad_leading_zeros(CLIP_NUMBER_WIDTH, position),
        extension
    )
}

/// Generate the submission filename of a clip.
///
/// `position` is 1-based. This is also the `href` written into the metadata
/// file for the clip.
///
/// # Format
///
/// `{course_id}-m{index}-{pad2(position)}.{extension}`
///
/// # Examples
///
/// ```
/// use coursepack::naming::staged_clip_filename;
///
/// assert_eq!(
///     staged_clip_filename("foo-fundamentals", 1, 12, "mp4"),
///     "foo-fundamentals-m1-12.mp4"
/// );
/// ```
pub fn staged_clip_filename(
    course_id: &str,
    index: u32,
    position: usize,
    extension: &str,
) -> String {
    format!(
        "{}-m{}-{}.{}",
        course_id,
        index,
        pad_leading_zeros(CLIP_NUMBER_WIDTH, position),
        extension
    )
}
