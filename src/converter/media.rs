//! Embedded media - resolves image relationships and emits image markup.

use crate::render::escape_link_destination;
use crate::{error::Error, ImageHandling, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rs_docx::document::{Drawing, Pict};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the DOCX package can be re-opened to read media parts.
enum Package {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Pulls images out of the DOCX archive according to [`ImageHandling`].
pub struct MediaExtractor {
    handling: ImageHandling,
    package: Option<Package>,
    written: usize,
}

impl MediaExtractor {
    /// Extractor reading media from the package file at `docx_path`.
    pub fn from_file<P: AsRef<Path>>(docx_path: P, handling: &ImageHandling) -> Result<Self> {
        Self::build(Package::File(docx_path.as_ref().to_path_buf()), handling)
    }

    /// Extractor reading media from an in-memory package.
    pub fn from_bytes(bytes: &[u8], handling: &ImageHandling) -> Result<Self> {
        Self::build(Package::Memory(bytes.to_vec()), handling)
    }

    /// Extractor that drops every image.
    pub fn skip() -> Self {
        Self {
            handling: ImageHandling::Skip,
            package: None,
            written: 0,
        }
    }

    fn build(package: Package, handling: &ImageHandling) -> Result<Self> {
        match handling {
            ImageHandling::Skip => return Ok(Self::skip()),
            ImageHandling::SaveToDir(dir) => fs::create_dir_all(dir)?,
            ImageHandling::Inline => {}
        }
        Ok(Self {
            handling: handling.clone(),
            package: Some(package),
            written: 0,
        })
    }

    fn is_skipping(&self) -> bool {
        matches!(self.handling, ImageHandling::Skip)
    }

    /// Image markup for a DrawingML element, if it references a picture.
    pub fn drawing_markup(
        &mut self,
        drawing: &Drawing,
        rels: &HashMap<String, String>,
    ) -> Result<Option<String>> {
        if self.is_skipping() {
            return Ok(None);
        }
        match drawing_embed_id(drawing).and_then(|id| rels.get(&id)) {
            Some(target) => self.emit(target),
            None => Ok(None),
        }
    }

    /// Image markup for a legacy VML picture.
    pub fn pict_markup(
        &mut self,
        pict: &Pict,
        rels: &HashMap<String, String>,
    ) -> Result<Option<String>> {
        if self.is_skipping() {
            return Ok(None);
        }
        match pict_image_id(pict).and_then(|id| rels.get(&id)) {
            Some(target) => self.emit(target),
            None => Ok(None),
        }
    }

    fn emit(&mut self, target: &str) -> Result<Option<String>> {
        let data = self.read_part(target)?;
        self.written += 1;

        let ext = Path::new(target)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_lowercase();

        match &self.handling {
            ImageHandling::SaveToDir(dir) => {
                let out = dir.join(format!("image_{}.{}", self.written, ext));
                fs::write(&out, &data)?;
                debug!(path = %out.display(), bytes = data.len(), "saved image");
                Ok(Some(format!(
                    "![image]({})",
                    escape_link_destination(&out.display().to_string())
                )))
            }
            ImageHandling::Inline => Ok(Some(format!(
                "<img src=\"data:{};base64,{}\" alt=\"image\" />",
                mime_type(&ext),
                BASE64.encode(&data)
            ))),
            ImageHandling::Skip => Ok(None),
        }
    }

    fn read_part(&self, target: &str) -> Result<Vec<u8>> {
        match &self.package {
            Some(Package::File(path)) => read_zip_entry(File::open(path)?, target),
            Some(Package::Memory(bytes)) => read_zip_entry(Cursor::new(bytes), target),
            None => Err(Error::MediaNotFound(target.to_string())),
        }
    }
}

fn mime_type(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "emf" => "image/emf",
        "wmf" => "image/wmf",
        _ => "application/octet-stream",
    }
}

fn drawing_embed_id(drawing: &Drawing) -> Option<String> {
    let inline = drawing.inline.as_ref().and_then(|i| i.graphic.as_ref());
    let anchor = drawing.anchor.as_ref().and_then(|a| a.graphic.as_ref());
    [inline, anchor]
        .into_iter()
        .flatten()
        .filter_map(|graphic| graphic.data.children.first())
        .map(|pic| pic.fill.blip.embed.to_string())
        .find(|embed| !embed.is_empty())
}

fn pict_image_id(pict: &Pict) -> Option<String> {
    let from_shape = pict
        .shape
        .as_ref()
        .and_then(|s| s.image_data.as_ref())
        .and_then(|d| d.id.as_ref());
    let from_rect = pict
        .rect
        .as_ref()
        .and_then(|r| r.image_data.as_ref())
        .and_then(|d| d.id.as_ref());
    from_shape.or(from_rect).map(|id| id.to_string())
}

/// Reads a relationship target from the archive, trying `word/<target>` first.
fn read_zip_entry<R: Read + Seek>(reader: R, target: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let target = target.trim_start_matches('/');
    let in_word = if target.starts_with("word/") {
        target.to_string()
    } else {
        format!("word/{}", target)
    };

    for candidate in [in_word.as_str(), target] {
        if let Ok(mut entry) = archive.by_name(candidate) {
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            return Ok(data);
        }
    }

    Err(Error::MediaNotFound(target.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hard_xml::XmlRead;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn package_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(data).expect("write entry");
        }
        writer.finish().expect("finish zip").into_inner()
    }

    fn rels(id: &str, target: &str) -> HashMap<String, String> {
        HashMap::from([(id.to_string(), target.to_string())])
    }

    const VML_PICT: &str = r#"<w:pict><v:shape id="S1"><v:imagedata r:id="rIdImg"/></v:shape></w:pict>"#;

    #[test]
    fn test_inline_image_is_data_uri() {
        let bytes = package_with(&[("word/media/logo.png", b"PNGDATA".as_slice())]);
        let mut media = MediaExtractor::from_bytes(&bytes, &ImageHandling::Inline).unwrap();
        let pict = Pict::from_str(VML_PICT).expect("pict xml");

        let html = media
            .pict_markup(&pict, &rels("rIdImg", "media/logo.png"))
            .unwrap()
            .expect("image markup");
        assert_eq!(
            html,
            format!(
                "<img src=\"data:image/png;base64,{}\" alt=\"image\" />",
                BASE64.encode(b"PNGDATA")
            )
        );
    }

    const DRAWING: &str = r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="1" cy="1"/><wp:docPr id="1" name="Picture 1"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="0" name=""/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rIdPhoto"/></pic:blipFill><pic:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#;

    #[test]
    fn test_inline_drawing_resolves_blip_embed() {
        let bytes = package_with(&[("word/media/chart.gif", b"GIF89a".as_slice())]);
        let mut media = MediaExtractor::from_bytes(&bytes, &ImageHandling::Inline).unwrap();
        let drawing = Drawing::from_str(DRAWING).expect("drawing xml");

        assert_eq!(drawing_embed_id(&drawing).as_deref(), Some("rIdPhoto"));
        let html = media
            .drawing_markup(&drawing, &rels("rIdPhoto", "media/chart.gif"))
            .unwrap()
            .expect("image markup");
        assert_eq!(
            html,
            format!(
                "<img src=\"data:image/gif;base64,{}\" alt=\"image\" />",
                BASE64.encode(b"GIF89a")
            )
        );
        assert!(media
            .drawing_markup(&drawing, &rels("rIdOther", "media/chart.gif"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_saved_image_path_is_escaped() {
        let dir = std::env::temp_dir().join(format!("docxdown media ({})", std::process::id()));
        let bytes = package_with(&[("word/media/a.png", b"PNG".as_slice())]);
        let handling = ImageHandling::SaveToDir(dir.clone());
        let mut media = MediaExtractor::from_bytes(&bytes, &handling).unwrap();
        let pict = Pict::from_str(VML_PICT).expect("pict xml");

        let markup = media
            .pict_markup(&pict, &rels("rIdImg", "media/a.png"))
            .unwrap()
            .expect("markup");
        let _ = fs::remove_dir_all(&dir);

        let escaped = escape_link_destination(&dir.join("image_1.png").display().to_string());
        assert_eq!(markup, format!("![image]({})", escaped));
        assert!(markup.contains("docxdown\\ media\\ \\("));
    }

    #[test]
    fn test_save_to_dir_writes_numbered_files() {
        let dir = std::env::temp_dir().join(format!("docxdown_media_{}", std::process::id()));
        let bytes = package_with(&[("word/media/photo.JPG", b"JPEG".as_slice())]);
        let handling = ImageHandling::SaveToDir(dir.clone());
        let mut media = MediaExtractor::from_bytes(&bytes, &handling).unwrap();
        let pict = Pict::from_str(VML_PICT).expect("pict xml");
        let rels = rels("rIdImg", "media/photo.JPG");

        let first = media.pict_markup(&pict, &rels).unwrap().expect("markup");
        let second = media.pict_markup(&pict, &rels).unwrap().expect("markup");

        let first_path = dir.join("image_1.jpg");
        assert_eq!(first, format!("![image]({})", first_path.display()));
        assert!(second.ends_with("image_2.jpg)"));
        assert_eq!(fs::read(&first_path).unwrap(), b"JPEG");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_media_part_is_an_error() {
        let bytes = package_with(&[("word/document.xml", b"<w:document/>".as_slice())]);
        let mut media = MediaExtractor::from_bytes(&bytes, &ImageHandling::Inline).unwrap();
        let pict = Pict::from_str(VML_PICT).expect("pict xml");

        let err = media
            .pict_markup(&pict, &rels("rIdImg", "media/gone.png"))
            .expect_err("missing media");
        assert!(matches!(err, Error::MediaNotFound(name) if name == "media/gone.png"));
    }

    #[test]
    fn test_skip_ignores_images() {
        let mut media = MediaExtractor::skip();
        let pict = Pict::from_str(VML_PICT).expect("pict xml");
        assert!(media
            .pict_markup(&pict, &rels("rIdImg", "media/logo.png"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unresolved_relationship_yields_nothing() {
        let bytes = package_with(&[]);
        let mut media = MediaExtractor::from_bytes(&bytes, &ImageHandling::Inline).unwrap();
        let pict = Pict::from_str(VML_PICT).expect("pict xml");
        assert!(media.pict_markup(&pict, &HashMap::new()).unwrap().is_none());
    }
}
