//! CSV export of harvested products
//!
//! One file per category, `<output_dir>/<name>.csv`, with the header
//! `title,description,price,rating,num_of_reviews`. Files are written to a
//! temporary sibling first and renamed into place, so an interrupted export
//! never leaves a truncated file behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExportError;
use crate::models::{PRODUCT_FIELDS, Product};

#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn destination(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.csv"))
    }

    /// Write `products` to `<output_dir>/<name>.csv`, replacing any existing file
    ///
    /// # Returns
    /// * `PathBuf` - Path of the written file
    pub fn export(&self, name: &str, products: &[Product]) -> Result<PathBuf, ExportError> {
        let path = self.destination(name);
        let tmp_path = self.output_dir.join(format!("{name}.csv.tmp"));

        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        if let Err(e) = write_products(&tmp_path, products) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        fs::rename(&tmp_path, &path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        debug!("Wrote {} rows to {}", products.len(), path.display());
        Ok(path)
    }
}

fn write_products(path: &Path, products: &[Product]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    // Header is written by hand so empty categories still get one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(PRODUCT_FIELDS).map_err(csv_err)?;
    for product in products {
        writer.serialize(product).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Product> {
        vec![
            Product {
                title: "Asus VivoBook X441BA".to_string(),
                description: "Asus VivoBook X441BA, 14\", Celeron N3350, 4GB".to_string(),
                price: 295.99,
                rating: 3,
                num_of_reviews: 14,
            },
            Product {
                title: "Apple MacBook Air 13\u{2033}".to_string(),
                description: "Écran Retina, 8GB, 256GB SSD".to_string(),
                price: 1347.78,
                rating: 0,
                num_of_reviews: 0,
            },
        ]
    }

    #[test]
    fn writes_header_and_rows_that_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let products = sample();

        let path = exporter.export("laptops", &products).unwrap();
        assert_eq!(path, dir.path().join("laptops.csv"));

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().next(),
            Some("title,description,price,rating,num_of_reviews")
        );

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec![
                    "Asus VivoBook X441BA",
                    "Asus VivoBook X441BA, 14\", Celeron N3350, 4GB",
                    "295.99",
                    "3",
                    "14",
                ],
                vec![
                    "Apple MacBook Air 13\u{2033}",
                    "Écran Retina, 8GB, 256GB SSD",
                    "1347.78",
                    "0",
                    "0",
                ],
            ]
        );

        let decoded: Vec<Product> = csv::Reader::from_path(&path)
            .unwrap()
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(decoded, products);
    }

    #[test]
    fn empty_category_still_gets_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = CsvExporter::new(dir.path()).export("home", &[]).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, "title,description,price,rating,num_of_reviews\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());
        fs::write(exporter.destination("phones"), "stale,data\n1,2\n3,4\n").unwrap();

        exporter.export("phones", &sample()[..1]).unwrap();

        let contents = fs::read_to_string(exporter.destination("phones")).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(!contents.contains("stale"));
        assert!(!dir.path().join("phones.csv.tmp").exists());
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("csv");

        let path = CsvExporter::new(&nested).export("tablets", &sample()).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
