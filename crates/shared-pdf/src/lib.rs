//! Upload ingestion for property documents
//!
//! This crate turns an uploaded file into a single raster page for OCR:
//! MIME dispatch, PDF page counting and metadata via lopdf, and an injectable
//! [`PdfRasterizer`] for rendering pages (pdfium behind the `pdfium` feature).

pub mod error;
pub mod metadata;
pub mod normalize;
#[cfg(feature = "pdfium")]
pub mod pdfium;
pub mod raster;

pub use error::IngestError;
pub use metadata::{parse_pdf_date, DocumentMetadata};
pub use normalize::{NormalizedPage, Normalizer};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;
pub use raster::{PdfRasterizer, RasterImage, RasterSource, MIN_RENDER_SCALE};

/// Fixtures shared with downstream integration tests
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use crate::error::IngestError;
    use crate::raster::PdfRasterizer;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, Stream};
    use std::io::Cursor;
    use std::sync::Mutex;

    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// Rasterizer that records (page, scale) and returns a blank letter-size page
    #[derive(Default)]
    pub struct RecordingRasterizer {
        calls: Mutex<Vec<(u32, f32)>>,
    }

    impl RecordingRasterizer {
        pub fn calls(&self) -> Vec<(u32, f32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PdfRasterizer for RecordingRasterizer {
        fn render_page(
            &self,
            _pdf: &[u8],
            page: u32,
            scale: f32,
        ) -> Result<DynamicImage, IngestError> {
            self.calls.lock().unwrap().push((page, scale));
            Ok(DynamicImage::ImageRgb8(RgbImage::new(
                (61.2 * scale) as u32,
                (79.2 * scale) as u32,
            )))
        }
    }

    /// Build a PDF with `num_pages` text pages and an optional Info `ModDate`
    pub fn create_test_pdf(num_pages: u32, mod_date: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for i in 0..num_pages {
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
                            format!("Page {}", i + 1).into_bytes(),
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
                ("Contents", Object::Reference(content_id)),
            ]);
            page_ids.push(doc.add_object(page));
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        if let Some(date) = mod_date {
            let info = Dictionary::from_iter(vec![(
                "ModDate",
                Object::String(date.as_bytes().to_vec(), lopdf::StringFormat::Literal),
            )]);
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", Object::Reference(info_id));
        }

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}
