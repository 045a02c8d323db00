//! Book Catalog Queries
//!
//! A [`Catalog`] owns a loaded [`Document`] and answers two questions about it:
//! whether a book id exists, and the typed record of that book.
//!
//! Construction either yields a ready catalog or a [`LoadError`]; there is no
//! half-loaded state, so queries never have to check for a missing document.
//! Queries take `&self` and never mutate, which keeps a catalog safe to share
//! across threads.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::document::{Document, Element};
use crate::error::{LoadError, LoadResult, MalformedRecordError, RecordResult};

/// Tag name of the catalog entries
pub const BOOK_TAG: &str = "book";

/// Attribute carrying a book's identifier
pub const ID_ATTRIBUTE: &str = "id";

/// Child elements every book record must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Author,
    Genre,
    Price,
    PublishDate,
    Description,
}

impl BookField {
    pub const ALL: [BookField; 5] = [
        BookField::Author,
        BookField::Genre,
        BookField::Price,
        BookField::PublishDate,
        BookField::Description,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::Price => "price",
            BookField::PublishDate => "publish_date",
            BookField::Description => "description",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.tag() == tag)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A typed value of a book record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Decimal(f64),
    Date(NaiveDate),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::Decimal(value) => write!(f, "{:.2}", value),
            FieldValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Structured summary of one book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInfo {
    pub id: String,
    pub author: String,
    pub genre: String,
    pub price: f64,
    pub publish_date: NaiveDate,
    pub description: String,
}

impl BookInfo {
    /// Build the record for `id` from a matched book element.
    ///
    /// Each required field comes from the first direct child with that tag.
    /// `id` is echoed back as queried, not re-read from the element.
    pub fn from_element(id: &str, book: &Element) -> RecordResult<Self> {
        let mut children: [Option<&Element>; 5] = [None; 5];
        for child in book.child_elements() {
            if let Some(field) = BookField::from_tag(child.name()) {
                children[field.index()].get_or_insert(child);
            }
        }

        let text = |field: BookField| -> RecordResult<String> {
            children[field.index()]
                .map(Element::text_content)
                .ok_or_else(|| MalformedRecordError::missing(id, field.tag()))
        };

        let author = text(BookField::Author)?;
        let genre = text(BookField::Genre)?;
        let price = parse_price(id, &text(BookField::Price)?)?;
        let publish_date = parse_publish_date(id, &text(BookField::PublishDate)?)?;
        let description = text(BookField::Description)?;

        Ok(Self {
            id: id.to_string(),
            author,
            genre,
            price,
            publish_date,
            description,
        })
    }

    /// The six record fields in their fixed order
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::Text(self.id.clone())),
            (
                BookField::Author.tag(),
                FieldValue::Text(self.author.clone()),
            ),
            (BookField::Genre.tag(), FieldValue::Text(self.genre.clone())),
            (BookField::Price.tag(), FieldValue::Decimal(self.price)),
            (
                BookField::PublishDate.tag(),
                FieldValue::Date(self.publish_date),
            ),
            (
                BookField::Description.tag(),
                FieldValue::Text(self.description.clone()),
            ),
        ]
    }
}

impl fmt::Display for BookInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .fields()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

fn parse_price(id: &str, raw: &str) -> RecordResult<f64> {
    let field = BookField::Price.tag();
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| MalformedRecordError::invalid(id, field, raw, e.to_string()))?;
    if !value.is_finite() {
        return Err(MalformedRecordError::invalid(
            id,
            field,
            raw,
            "not a finite number",
        ));
    }
    Ok(value)
}

fn parse_publish_date(id: &str, raw: &str) -> RecordResult<NaiveDate> {
    let field = BookField::PublishDate.tag();
    let text = raw.trim();
    if !is_iso_date_shape(text) {
        return Err(MalformedRecordError::invalid(
            id,
            field,
            raw,
            "expected YYYY-MM-DD",
        ));
    }
    text.parse::<NaiveDate>()
        .map_err(|e| MalformedRecordError::invalid(id, field, raw, e.to_string()))
}

/// `YYYY-MM-DD` with exactly four, two and two ASCII digits
fn is_iso_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn is_blank(id: &str) -> bool {
    id.trim().is_empty()
}

/// Read-only book catalog backed by a parsed document
#[derive(Debug, Clone)]
pub struct Catalog {
    document: Document,
    source: Option<PathBuf>,
}

impl Catalog {
    /// Load the catalog file at `path`, failing if it cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let document = Document::load(path)?;
        Ok(Self {
            document,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            source: None,
        }
    }

    /// File the catalog was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Whether a book with this id exists.
    ///
    /// Blank ids are never present; they short-circuit before any scan.
    pub fn exists(&self, id: &str) -> bool {
        if is_blank(id) {
            return false;
        }
        self.find_book(id).is_some()
    }

    /// Typed record of the first book with this id.
    ///
    /// `Ok(None)` means no such book (or a blank id). A matched book with a
    /// missing or unparsable field is an error, never a partial record.
    pub fn info(&self, id: &str) -> RecordResult<Option<BookInfo>> {
        if is_blank(id) {
            return Ok(None);
        }
        match self.find_book(id) {
            Some(book) => BookInfo::from_element(id, book).map(Some),
            None => Ok(None),
        }
    }

    /// Ids of all books carrying one, in document order
    pub fn book_ids(&self) -> Vec<String> {
        self.books()
            .filter_map(|book| book.attributes().get(ID_ATTRIBUTE).map(str::to_string))
            .collect()
    }

    pub fn book_count(&self) -> usize {
        self.books().count()
    }

    fn books(&self) -> impl Iterator<Item = &Element> {
        self.document.elements_by_tag(BOOK_TAG).into_iter()
    }

    fn find_book(&self, id: &str) -> Option<&Element> {
        self.books()
            .find(|book| book.attributes().get(ID_ATTRIBUTE) == Some(id))
    }
}

impl FromStr for Catalog {
    type Err = LoadError;

    fn from_str(xml: &str) -> LoadResult<Self> {
        Document::parse(xml).map(Self::from_document)
    }
}
