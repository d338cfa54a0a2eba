//! Delimited-text writer for the derived tables.
//!
//! Each table is written as its own file with a header row followed by one
//! row per entry. Column order follows the row struct's field order.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::CocotabError;
use crate::tables::{TableRow, Tables};

/// Options controlling the CSV output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Paths of the files produced by [`write_tables`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFiles {
    pub metadata: PathBuf,
    pub images: PathBuf,
    pub objects: PathBuf,
}

/// The directory the tables for `input_path` are written into:
/// `<output_root>/<input file stem>`.
pub fn output_dir_for(output_root: &Path, input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "coco".into());
    output_root.join(stem)
}

/// Writes all three tables into `dir`, creating it if needed.
///
/// Existing files are overwritten. A failure partway through leaves any
/// files already written in place.
pub fn write_tables(
    dir: &Path,
    tables: &Tables,
    opts: &WriteOptions,
) -> Result<WrittenFiles, CocotabError> {
    fs::create_dir_all(dir).map_err(|source| CocotabError::io(dir, source))?;

    let files = WrittenFiles {
        metadata: dir.join(Tables::METADATA_FILE),
        images: dir.join(Tables::IMAGES_FILE),
        objects: dir.join(Tables::OBJECTS_FILE),
    };

    write_table(&files.metadata, std::slice::from_ref(&tables.metadata), opts)?;
    write_table(&files.images, &tables.images, opts)?;
    write_table(&files.objects, &tables.objects, opts)?;

    Ok(files)
}

/// Writes one table to a file.
pub fn write_table<R: TableRow>(
    path: &Path,
    rows: &[R],
    opts: &WriteOptions,
) -> Result<(), CocotabError> {
    let file = File::create(path).map_err(|source| CocotabError::io(path, source))?;
    let writer = BufWriter::new(file);

    let mut csv_writer = csv_builder(opts).from_writer(writer);
    serialize_rows(&mut csv_writer, rows, path)?;

    csv_writer
        .into_inner()
        .map_err(|e| CocotabError::io(path, e.into_error()))?
        .flush()
        .map_err(|source| CocotabError::io(path, source))?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}

/// Writes one table to a string.
///
/// Useful for testing without file I/O.
pub fn write_table_to_string<R: TableRow>(
    rows: &[R],
    opts: &WriteOptions,
) -> Result<String, CocotabError> {
    let dummy_path = Path::new("<string>");

    let mut csv_writer = csv_builder(opts).from_writer(Vec::new());
    serialize_rows(&mut csv_writer, rows, dummy_path)?;

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| CocotabError::io(dummy_path, e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| {
        CocotabError::io(
            dummy_path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}

fn csv_builder(opts: &WriteOptions) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .has_headers(false)
        .delimiter(opts.delimiter)
        .terminator(csv::Terminator::Any(b'\n'));
    builder
}

fn serialize_rows<W: Write, R: TableRow>(
    csv_writer: &mut csv::Writer<W>,
    rows: &[R],
    path: &Path,
) -> Result<(), CocotabError> {
    let to_csv_error = |source: csv::Error| CocotabError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    csv_writer.write_record(R::HEADER).map_err(to_csv_error)?;
    for row in rows {
        csv_writer.serialize(row).map_err(to_csv_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{AspectRatio, ImageRow, MetadataRow, ObjectRow};

    fn sample_tables() -> Tables {
        Tables {
            metadata: MetadataRow {
                image_count: 1,
                object_count: 1,
            },
            images: vec![ImageRow {
                id: 1,
                file_name: "a.jpg".to_string(),
                object_count: 1,
                width: 100,
                height: 50,
                area: 5000,
                aspect_ratio: AspectRatio::reduce(100, 50).unwrap(),
                aspect_ratio_float: 2.0,
            }],
            objects: vec![ObjectRow {
                image_id: 1,
                x: 2,
                y: 1,
                width: 4,
                height: 2,
                area: 8,
                aspect_ratio: AspectRatio::reduce(4, 2).unwrap(),
                aspect_ratio_float: 2.0,
            }],
        }
    }

    #[test]
    fn header_matches_field_order() {
        let tables = sample_tables();
        let opts = WriteOptions::default();

        let images = write_table_to_string(&tables.images, &opts).unwrap();
        let mut lines = images.lines();
        assert_eq!(
            lines.next(),
            Some("id,file_name,object_count,width,height,area,aspect_ratio,aspect_ratio_float")
        );
        assert_eq!(lines.next(), Some("1,a.jpg,1,100,50,5000,2:1,2.0"));
        assert_eq!(lines.next(), None);

        let objects = write_table_to_string(&tables.objects, &opts).unwrap();
        assert_eq!(
            objects,
            "image_id,x,y,width,height,area,aspect_ratio,aspect_ratio_float\n\
             1,2,1,4,2,8,2:1,2.0\n"
        );

        let metadata = write_table_to_string(&[tables.metadata], &opts).unwrap();
        assert_eq!(metadata, "image_count,object_count\n1,1\n");
    }

    #[test]
    fn custom_delimiter() {
        let tables = sample_tables();
        let opts = WriteOptions { delimiter: b'\t' };

        let metadata = write_table_to_string(&[tables.metadata], &opts).unwrap();
        assert_eq!(metadata, "image_count\tobject_count\n1\t1\n");
    }

    #[test]
    fn file_names_with_delimiters_are_quoted() {
        let mut tables = sample_tables();
        tables.images[0].file_name = "a,b.jpg".to_string();

        let out = write_table_to_string(&tables.images, &WriteOptions::default()).unwrap();
        assert!(out.contains("\"a,b.jpg\""));
    }

    #[test]
    fn empty_table_still_has_header() {
        let rows: Vec<ObjectRow> = Vec::new();
        let out = write_table_to_string(&rows, &WriteOptions::default()).unwrap();
        assert_eq!(
            out,
            "image_id,x,y,width,height,area,aspect_ratio,aspect_ratio_float\n"
        );
    }

    #[test]
    fn write_tables_creates_nested_dir_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let tables = sample_tables();

        let files = write_tables(&dir, &tables, &WriteOptions::default()).unwrap();
        assert!(files.metadata.is_file());
        assert!(files.images.is_file());
        assert!(files.objects.is_file());

        fs::write(&files.metadata, "stale").unwrap();
        write_tables(&dir, &tables, &WriteOptions::default()).unwrap();
        assert_eq!(
            fs::read_to_string(&files.metadata).unwrap(),
            "image_count,object_count\n1,1\n"
        );
    }

    #[test]
    fn unwritable_destination_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err =
            write_tables(&blocker.join("sub"), &sample_tables(), &WriteOptions::default())
                .unwrap_err();
        assert!(matches!(err, CocotabError::Io { .. }));
    }

    #[test]
    fn output_dir_uses_input_stem() {
        assert_eq!(
            output_dir_for(Path::new("out"), Path::new("data/instances_val.json")),
            PathBuf::from("out/instances_val")
        );
        assert_eq!(
            output_dir_for(Path::new("."), Path::new("train.coco.json")),
            PathBuf::from("./train.coco")
        );
    }
}
