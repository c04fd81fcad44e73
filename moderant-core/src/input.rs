//! Input loading.
//!
//! Turns an `InputSource` into the ordered list of texts to classify:
//! pasted text and `.txt`/`.pdf` files yield one record, `.csv` files yield
//! one record per data row.

use crate::config::InputConfig;
use crate::error::InputError;
use crate::types::{InputKind, InputSource};
use std::path::Path;
use tracing::{debug, warn};

/// Extracts the text of each page of a PDF, in page order.
pub trait PageTextExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, InputError>;
}

/// `PageTextExtractor` backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PageTextExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, InputError> {
        let doc = lopdf::Document::load(path).map_err(|e| read_error(path, e))?;

        // get_pages() is keyed by page number, so iteration is in page order
        let mut pages = Vec::new();
        for page_no in doc.get_pages().keys() {
            let text = doc
                .extract_text(&[*page_no])
                .map_err(|e| read_error(path, format!("page {}: {}", page_no, e)))?;
            // lopdf terminates every text object with a newline
            pages.push(text.trim_end_matches('\n').to_string());
        }
        Ok(pages)
    }
}

/// Loads records from pasted text or files.
pub struct InputLoader {
    config: InputConfig,
    extractor: Box<dyn PageTextExtractor>,
}

impl InputLoader {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            extractor: Box::new(LopdfExtractor),
        }
    }

    /// Replace the PDF extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn PageTextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Resolve `source` into the texts to classify.
    pub fn load(&self, source: &InputSource) -> Result<Vec<String>, InputError> {
        match source {
            InputSource::PastedText(text) => Ok(vec![text.clone()]),
            InputSource::FilePath(path) => match detect_kind(path)? {
                InputKind::Text => Ok(vec![self.load_text(path)?]),
                InputKind::Pdf => Ok(vec![self.load_pdf(path)?]),
                InputKind::Csv => self.load_csv(path),
            },
        }
    }

    /// Read a UTF-8 text file as a single record.
    pub fn load_text(&self, path: &Path) -> Result<String, InputError> {
        let content = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        debug!(path = %path.display(), chars = content.chars().count(), "Loaded text file");
        Ok(content)
    }

    /// Concatenate the text of every PDF page, in order.
    pub fn load_pdf(&self, path: &Path) -> Result<String, InputError> {
        let pages = self.extractor.extract_pages(path)?;
        for (index, page) in pages.iter().enumerate() {
            if page.is_empty() {
                warn!(path = %path.display(), page = index + 1, "PDF page has no extractable text");
            }
        }
        debug!(path = %path.display(), pages = pages.len(), "Loaded PDF");
        Ok(pages.join(&self.config.pdf_page_separator))
    }

    /// Read the configured text column of every CSV data row.
    pub fn load_csv(&self, path: &Path) -> Result<Vec<String>, InputError> {
        let column = self.config.csv_text_column.as_str();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| read_error(path, e))?;

        let headers = reader.headers().map_err(|e| read_error(path, e))?;
        let index = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
            .ok_or_else(|| InputError::Schema {
                path: path.to_path_buf(),
                column: column.to_string(),
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| read_error(path, e))?;
            rows.push(record.get(index).unwrap_or_default().to_string());
        }
        debug!(path = %path.display(), rows = rows.len(), "Loaded CSV");
        Ok(rows)
    }
}

/// Map a path to its input kind, rejecting unknown extensions.
pub fn detect_kind(path: &Path) -> Result<InputKind, InputError> {
    InputKind::from_path(path).ok_or_else(|| InputError::UnsupportedType {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(none)".to_string()),
    })
}

fn read_error(path: &Path, err: impl std::fmt::Display) -> InputError {
    InputError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Document, Object, Stream};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FakePages(Vec<&'static str>);

    impl PageTextExtractor for FakePages {
        fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, InputError> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn write_pdf(dir: &TempDir, name: &str, pages: &[&str]) -> PathBuf {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Courier".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        let resources_id = doc.add_object(Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "F1",
                Object::Reference(font_id),
            )])),
        )]));

        let mut page_ids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                    ),
                    Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            text.as_bytes().to_vec(),
                            lopdf::StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
                ("Resources", Object::Reference(resources_id)),
                ("Contents", Object::Reference(content_id)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(page_ids.len() as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let path = dir.path().join(name);
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn test_pasted_text_is_single_record() {
        let loader = InputLoader::new(InputConfig::default());
        // Looks like a path but must never be opened.
        let source = InputSource::pasted("/etc/passwd.txt");
        assert_eq!(loader.load(&source).unwrap(), vec!["/etc/passwd.txt".to_string()]);
    }

    #[test]
    fn test_text_file_is_single_record() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "notes.TXT", "line one\nline two\n".as_bytes());
        let loader = InputLoader::new(InputConfig::default());
        let records = loader.load(&InputSource::file(&path)).unwrap();
        assert_eq!(records, vec!["line one\nline two\n".to_string()]);
    }

    #[test]
    fn test_missing_text_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let loader = InputLoader::new(InputConfig::default());
        let result = loader.load(&InputSource::file(dir.path().join("absent.txt")));
        assert!(matches!(result, Err(InputError::Read { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bad.txt", &[0xff, 0xfe, 0x00, 0x80]);
        let loader = InputLoader::new(InputConfig::default());
        assert!(matches!(
            loader.load(&InputSource::file(&path)),
            Err(InputError::Read { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let loader = InputLoader::new(InputConfig::default());
        match loader.load(&InputSource::file("report.docx")) {
            Err(InputError::UnsupportedType { extension, .. }) => assert_eq!(extension, "docx"),
            other => panic!("Expected UnsupportedType, got {:?}", other),
        }
        match detect_kind(Path::new("Makefile")) {
            Err(InputError::UnsupportedType { extension, .. }) => assert_eq!(extension, "(none)"),
            other => panic!("Expected UnsupportedType, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_pages_join_without_separator() {
        let loader = InputLoader::new(InputConfig::default())
            .with_extractor(Box::new(FakePages(vec!["Hello ", "World"])));
        let records = loader.load(&InputSource::file("doc.pdf")).unwrap();
        assert_eq!(records, vec!["Hello World".to_string()]);
    }

    #[test]
    fn test_pdf_pages_can_fuse_words() {
        let loader = InputLoader::new(InputConfig::default())
            .with_extractor(Box::new(FakePages(vec!["end of page", "next page"])));
        assert_eq!(
            loader.load_pdf(Path::new("doc.pdf")).unwrap(),
            "end of pagenext page"
        );
    }

    #[test]
    fn test_pdf_configured_separator() {
        let config = InputConfig {
            pdf_page_separator: "\n".to_string(),
            ..Default::default()
        };
        let loader = InputLoader::new(config)
            .with_extractor(Box::new(FakePages(vec!["one", "", "three"])));
        assert_eq!(loader.load_pdf(Path::new("doc.pdf")).unwrap(), "one\n\nthree");
    }

    #[test]
    fn test_lopdf_extracts_pages_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, "two_pages.pdf", &["Hello", "World"]);
        let pages = LopdfExtractor.extract_pages(&path).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Hello"));
        assert!(pages[1].contains("World"));

        let loader = InputLoader::new(InputConfig::default());
        let records = loader.load(&InputSource::file(&path)).unwrap();
        assert_eq!(records.len(), 1);
        let hello = records[0].find("Hello").unwrap();
        let world = records[0].find("World").unwrap();
        assert!(hello < world);
    }

    #[test]
    fn test_corrupt_pdf_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "broken.pdf", b"this is not a pdf");
        let loader = InputLoader::new(InputConfig::default());
        assert!(matches!(
            loader.load(&InputSource::file(&path)),
            Err(InputError::Read { .. })
        ));
    }

    #[test]
    fn test_csv_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "rows.csv",
            b"id,text\n1,I hate this\n2,\"offensive, really\"\n3,all good\n",
        );
        let loader = InputLoader::new(InputConfig::default());
        let records = loader.load(&InputSource::file(&path)).unwrap();
        assert_eq!(
            records,
            vec![
                "I hate this".to_string(),
                "offensive, really".to_string(),
                "all good".to_string(),
            ]
        );
    }

    #[test]
    fn test_csv_header_with_bom_and_spaces() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "bom.csv", "\u{feff} text ,other\nhello,x\n".as_bytes());
        let loader = InputLoader::new(InputConfig::default());
        assert_eq!(loader.load_csv(&path).unwrap(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_csv_short_row_yields_empty_text() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "short.csv", b"id,text\n1\n2,two\n");
        let loader = InputLoader::new(InputConfig::default());
        assert_eq!(
            loader.load_csv(&path).unwrap(),
            vec![String::new(), "two".to_string()]
        );
    }

    #[test]
    fn test_csv_missing_column_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "wrong.csv", b"id,body\n1,hello\n");
        let loader = InputLoader::new(InputConfig::default());
        match loader.load(&InputSource::file(&path)) {
            Err(InputError::Schema { column, .. }) => assert_eq!(column, "text"),
            other => panic!("Expected Schema, got {:?}", other),
        }
    }

    #[test]
    fn test_csv_custom_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "custom.csv", b"comment\nfirst\nsecond\n");
        let config = InputConfig {
            csv_text_column: "comment".to_string(),
            ..Default::default()
        };
        let loader = InputLoader::new(config);
        assert_eq!(loader.load_csv(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_csv_header_only_yields_no_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.csv", b"text\n");
        let loader = InputLoader::new(InputConfig::default());
        assert!(loader.load_csv(&path).unwrap().is_empty());
    }
}
