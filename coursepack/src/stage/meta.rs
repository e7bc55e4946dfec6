//! Metadata file generation.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;

use crate::config::StageOptions;
use crate::error::{StageError, StageResult};
use crate::module::Module;
use crate::naming;

/// XML namespace of submission metadata documents.
pub const MODULE_NAMESPACE: &str = "http://pluralsight.com/sapphire/module/2007/11";

impl Module {
    /// Render the module's metadata document.
    ///
    /// Each clip's `href` is its staged filename, so the document always
    /// matches the files written by [`Module::stage_clips_with`] under the
    /// same options.
    pub fn to_meta_xml(&self, options: &StageOptions) -> StageResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(xml_write_error)?;

        let mut root = BytesStart::new("module");
        root.push_attribute(("xmlns", MODULE_NAMESPACE));
        writer
            .write_event(Event::Start(root))
            .map_err(xml_write_error)?;

        write_text_element(&mut writer, "author", &options.author)?;
        write_text_element(&mut writer, "title", &self.title)?;
        write_text_element(&mut writer, "description", &self.description)?;

        writer
            .write_event(Event::Start(BytesStart::new("clips")))
            .map_err(xml_write_error)?;
        for (index, clip) in self.clips().iter().enumerate() {
            let href = naming::staged_clip_filename(
                &self.course_id,
                self.index,
                index + 1,
                &options.clip_extension,
            );
            let mut element = BytesStart::new("clip");
            element.push_attribute(("href", href.as_str()));
            element.push_attribute(("title", clip.as_str()));
            writer
                .write_event(Event::Empty(element))
                .map_err(xml_write_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("clips")))
            .map_err(xml_write_error)?;

        writer
            .write_event(Event::End(BytesEnd::new("module")))
            .map_err(xml_write_error)?;

        String::from_utf8(writer.into_inner()).map_err(xml_write_error)
    }

    /// Write `{course_id}-m{index}.meta` into the build directory.
    ///
    /// Returns the path of the written file.
    pub async fn create_meta_file(
        &self,
        build_dir: impl AsRef<Path>,
        options: &StageOptions,
    ) -> StageResult<PathBuf> {
        let path = build_dir.as_ref().join(self.meta_filename());
        let xml = self.to_meta_xml(options)?;

        tokio::fs::write(&path, xml)
            .await
            .map_err(|e| StageError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;

        info!(path = %path.display(), clips = self.clips().len(), "Created metadata file");
        Ok(path)
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> StageResult<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_write_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_write_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_write_error)?;
    Ok(())
}

fn xml_write_error(e: impl std::fmt::Display) -> StageError {
    StageError::XmlWrite(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_module() -> Module {
        Module {
            course_id: "foo-fundamentals".to_string(),
            id: "m1-fooFunModule".to_string(),
            index: 1,
            title: "Introduction to the Foo Framework".to_string(),
            description: "Brief customer facing description of module.".to_string(),
            clips: Some(vec![
                "What is Foo?".to_string(),
                "Tips & Tricks".to_string(),
            ]),
            full_path: PathBuf::from("/courses/foo/m1-fooFunModule"),
        }
    }

    #[test]
    fn test_to_meta_xml_structure() {
        let xml = sample_module().to_meta_xml(&StageOptions::default()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(&format!(r#"<module xmlns="{}">"#, MODULE_NAMESPACE)));
        assert!(xml.contains("<author>andrew-connell</author>"));
        assert!(xml.contains("<title>Introduction to the Foo Framework</title>"));
        assert!(xml.contains(r#"href="foo-fundamentals-m1-01.mp4""#));
        assert!(xml.contains(r#"href="foo-fundamentals-m1-02.mp4""#));
        assert!(xml.contains(r#"title="Tips &amp; Tricks""#));

        // Element order: author, title, description, clips
        let author = xml.find("<author>").unwrap();
        let title = xml.find("<title>").unwrap();
        let description = xml.find("<description>").unwrap();
        let clips = xml.find("<clips>").unwrap();
        assert!(author < title && title < description && description < clips);
    }

    #[test]
    fn test_to_meta_xml_uses_configured_author_and_extension() {
        let options = StageOptions::new("jane-doe").with_clip_extension("wmv");
        let xml = sample_module().to_meta_xml(&options).unwrap();

        assert!(xml.contains("<author>jane-doe</author>"));
        assert!(xml.contains(r#"href="foo-fundamentals-m1-01.wmv""#));
        assert!(!xml.contains("andrew-connell"));
    }

    #[tokio::test]
    async fn test_create_meta_file() {
        let temp = TempDir::new().unwrap();
        let module = sample_module();

        let path = module
            .create_meta_file(temp.path(), &StageOptions::default())
            .await
            .unwrap();

        assert_eq!(path, temp.path().join("foo-fundamentals-m1.meta"));
        assert!(path.is_file());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("What is Foo?"));
    }

    #[tokio::test]
    async fn test_create_meta_file_missing_build_dir() {
        let temp = TempDir::new().unwrap();
        let result = sample_module()
            .create_meta_file(temp.path().join("missing"), &StageOptions::default())
            .await;
        assert!(matches!(result, Err(StageError::WriteFailed { .. })));
    }

    #[tokio::test]
    async fn test_meta_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("m1-fooFunModule");
        std::fs::create_dir_all(&folder).unwrap();
        let module = sample_module();

        let path = module
            .create_meta_file(&folder, &StageOptions::default())
            .await
            .unwrap();
        let loaded = Module::load_from_meta("foo-fundamentals", &path)
            .await
            .unwrap();

        assert_eq!(loaded.title, module.title);
        assert_eq!(loaded.description, module.description);
        assert_eq!(loaded.clips, module.clips);
        assert_eq!(loaded.index, 1);
    }
}
