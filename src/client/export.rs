//! Reassembly of downloaded pages into a book file.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::models::{Book, PagedContent};

use super::error::ClientResult;

/// Concatenates page contents in page order, without separators.
pub fn assemble(pages: &[PagedContent]) -> String {
    let mut pages: Vec<&PagedContent> = pages.iter().collect();
    pages.sort_by_key(|p| p.page_number());
    pages.iter().map(|p| p.content()).collect()
}

/// Local file name for a downloaded book.
///
/// Uses the last path component of the stored file name, falling back to
/// `<id>.txt` when the book has none.
pub fn export_file_name(book: &Book) -> String {
    book.file_name
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.txt", book.id))
}

/// Writes the assembled text of `book` into `dir`, creating the directory if
/// needed. Returns the path of the written file.
///
/// The text goes to a temporary file that is renamed into place, so a failed
/// download never leaves a truncated book behind.
pub async fn write_book_file(
    book: &Book,
    dir: &Path,
    pages: &[PagedContent],
) -> ClientResult<PathBuf> {
    fs::create_dir_all(dir).await?;

    let path = dir.join(export_file_name(book));
    let temp_path = path.with_extension("part");
    let text = assemble(pages);

    let mut file = fs::File::create(&temp_path).await?;
    if let Err(e) = write_all(&mut file, text.as_bytes()).await {
        drop(file);
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    drop(file);
    fs::rename(&temp_path, &path).await?;

    info!(id = book.id, path = %path.display(), chars = text.chars().count(), "Wrote book file");
    Ok(path)
}

async fn write_all(file: &mut fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::paginate;

    fn book(file_name: Option<&str>) -> Book {
        Book {
            id: 9,
            title: "Njáls saga".to_string(),
            file_name: file_name.map(String::from),
            ..Book::default()
        }
    }

    fn pages(text: &str, size: usize) -> Vec<PagedContent> {
        let total = paginate(text, 0, size).unwrap().total_pages();
        (0..total)
            .map(|n| paginate(text, n as i64, size).unwrap())
            .collect()
    }

    #[test]
    fn test_assemble_orders_pages() {
        let text = "First page content.\nSecond page content.\nThird";
        let mut all = pages(text, 20);
        all.reverse();
        assert_eq!(assemble(&all), text);
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(&book(Some("AbC.txt"))), "AbC.txt");
        assert_eq!(export_file_name(&book(Some("../../etc/passwd"))), "passwd");
        assert_eq!(export_file_name(&book(None)), "9.txt");
    }

    #[tokio::test]
    async fn test_write_book_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloads");
        let text = "Hér hefur upp sögu. ".repeat(30);

        let path = write_book_file(&book(Some("Njala12345.txt")), &target, &pages(&text, 64))
            .await
            .unwrap();

        assert_eq!(path, target.join("Njala12345.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
        assert!(!target.join("Njala12345.part").exists());
    }

    #[tokio::test]
    async fn test_write_empty_book() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_book_file(&book(None), dir.path(), &pages("", 10))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }
}
