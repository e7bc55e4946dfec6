//! Loader for generated metadata files (`{course}-m{index}.meta`).

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::{ensure_exists, strip_first_newline, Module, SourceLocation};
use crate::error::{StageError, StageResult};

/// Fields read from a metadata document.
#[derive(Debug, Default)]
struct MetaDocument {
    title: Option<String>,
    description: Option<String>,
    clips: Option<Vec<String>>,
}

/// Text field of the `module` element currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Title,
    Description,
}

impl Module {
    /// Load a module from a generated metadata file.
    ///
    /// Clip titles come from the `title` attribute of each `clips/clip`
    /// element, in document order.
    ///
    /// # Errors
    ///
    /// [`StageError::PathNotFound`] if the file does not exist,
    /// [`StageError::XmlParse`] for malformed XML, and
    /// [`StageError::MissingElement`] when `title`, `description` or `clips`
    /// is absent.
    pub async fn load_from_meta(course_id: &str, path: impl AsRef<Path>) -> StageResult<Module> {
        let path = path.as_ref();
        ensure_exists(path).await?;

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StageError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        let document = parse_meta_document(&text).map_err(|e| StageError::XmlParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let missing = |element| StageError::MissingElement {
            path: path.to_path_buf(),
            element,
        };
        let title = document.title.ok_or_else(|| missing("title"))?;
        let description = document.description.ok_or_else(|| missing("description"))?;
        let clips = document.clips.ok_or_else(|| missing("clips"))?;

        let location = SourceLocation::from_file(path)?;

        debug!(path = %path.display(), clips = clips.len(), "Loaded module metadata");

        Ok(Module {
            course_id: course_id.to_string(),
            id: location.id,
            index: location.index,
            title,
            description: strip_first_newline(&description),
            clips: Some(clips),
            full_path: location.full_path,
        })
    }
}

/// Walk the document and collect the first `title` and `description` of the
/// root element plus every `clips/clip` title.
fn parse_meta_document(xml: &str) -> Result<MetaDocument, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut document = MetaDocument::default();
    let mut stack: Vec<String> = Vec::new();
    let mut field: Option<TextField> = None;
    let mut buffer = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                match (stack.as_slice(), name.as_str()) {
                    ([root], "title") if root == "module" && document.title.is_none() => {
                        field = Some(TextField::Title);
                        buffer.clear();
                    }
                    ([root], "description")
                        if root == "module" && document.description.is_none() =>
                    {
                        field = Some(TextField::Description);
                        buffer.clear();
                    }
                    ([root], "clips") if root == "module" => {
                        document.clips.get_or_insert_with(Vec::new);
                    }
                    ([root, parent], "clip") if root == "module" && parent == "clips" => {
                        push_clip(&mut document, &e)?;
                    }
                    _ => {}
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(&e);
                match (stack.as_slice(), name.as_str()) {
                    ([root], "title") if root == "module" && document.title.is_none() => {
                        document.title = Some(String::new());
                    }
                    ([root], "description")
                        if root == "module" && document.description.is_none() =>
                    {
                        document.description = Some(String::new());
                    }
                    ([root], "clips") if root == "module" => {
                        document.clips.get_or_insert_with(Vec::new);
                    }
                    ([root, parent], "clip") if root == "module" && parent == "clips" => {
                        push_clip(&mut document, &e)?;
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                if field.is_some() && stack.len() == 2 {
                    buffer.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if field.is_some() && stack.len() == 2 {
                    buffer.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                if stack.len() == 2 {
                    match field.take() {
                        Some(TextField::Title) => {
                            document.title = Some(std::mem::take(&mut buffer));
                        }
                        Some(TextField::Description) => {
                            document.description = Some(std::mem::take(&mut buffer));
                        }
                        None => {}
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(document)
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn push_clip(document: &mut MetaDocument, e: &BytesStart<'_>) -> Result<(), quick_xml::Error> {
    let mut title = String::new();
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"title" {
            title = attr.unescape_value()?.into_owned();
        }
    }
    document.clips.get_or_insert_with(Vec::new).push(title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const META: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<module xmlns="http://pluralsight.com/sapphire/module/2007/11">
  <author>andrew-connell</author>
  <title>Introduction to the Foo Framework</title>
  <description>Brief customer facing description of module.
</description>
  <clips>
    <clip href="foo-fundamentals-m1-01.mp4" title="What is Foo?"/>
    <clip href="foo-fundamentals-m1-02.mp4" title="Installing &amp; Configuring"/>
    <clip href="foo-fundamentals-m1-03.mp4" title="Your first Foo app"></clip>
  </clips>
</module>
"#;

    fn write_meta(root: &Path, folder: &str, content: &str) -> std::path::PathBuf {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("foo-fundamentals-m1.meta");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_meta_document() {
        let document = parse_meta_document(META).unwrap();
        assert_eq!(
            document.title.as_deref(),
            Some("Introduction to the Foo Framework")
        );
        assert_eq!(
            document.description.as_deref(),
            Some("Brief customer facing description of module.\n")
        );
        assert_eq!(
            document.clips.unwrap(),
            vec![
                "What is Foo?".to_string(),
                "Installing & Configuring".to_string(),
                "Your first Foo app".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_ignores_nested_titles() {
        let xml = "<module><clips><clip title=\"a\"><title>nested</title></clip></clips>\
                   <title>Real</title><description>d</description></module>";
        let document = parse_meta_document(xml).unwrap();
        assert_eq!(document.title.as_deref(), Some("Real"));
        assert_eq!(document.clips.unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse_meta_document("<module><title>x</module>").is_err());
    }

    #[tokio::test]
    async fn test_load_from_meta() {
        let temp = TempDir::new().unwrap();
        let path = write_meta(temp.path(), "m1-fooFunModule-psexpected", META);

        let module = Module::load_from_meta("foo-fundamentals", &path)
            .await
            .unwrap();

        assert_eq!(module.course_id, "foo-fundamentals");
        assert_eq!(module.id, "m1-fooFunModule-psexpected");
        assert_eq!(module.index, 1);
        assert_eq!(module.title, "Introduction to the Foo Framework");
        assert_eq!(
            module.description,
            "Brief customer facing description of module."
        );
        assert_eq!(module.clips().len(), 3);
        assert_eq!(module.full_path, path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_load_from_meta_invalid_path() {
        let temp = TempDir::new().unwrap();
        let result = Module::load_from_meta("foo", temp.path().join("xxx")).await;
        assert!(matches!(result, Err(StageError::PathNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_from_meta_missing_description() {
        let temp = TempDir::new().unwrap();
        let xml = "<module><title>T</title><clips/></module>";
        let path = write_meta(temp.path(), "m1-foo", xml);

        let result = Module::load_from_meta("foo", &path).await;
        assert!(matches!(
            result,
            Err(StageError::MissingElement {
                element: "description",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_load_from_meta_empty_clips() {
        let temp = TempDir::new().unwrap();
        let xml = "<module><title>T</title><description>D</description><clips/></module>";
        let path = write_meta(temp.path(), "m5-foo", xml);

        let module = Module::load_from_meta("foo", &path).await.unwrap();
        assert_eq!(module.index, 5);
        assert_eq!(module.clips, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_load_from_meta_malformed() {
        let temp = TempDir::new().unwrap();
        let path = write_meta(temp.path(), "m1-foo", "<module><title>x</module>");

        let result = Module::load_from_meta("foo", &path).await;
        assert!(matches!(result, Err(StageError::XmlParse { .. })));
    }
}
