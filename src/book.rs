//! Book records and the details a patron supplies when requesting one
use super::error::ValidationError;
use super::status::BookStatus;
use chrono::{DateTime, TimeZone, Utc};

// Also used for constructing requests
#[derive(minicbor::Encode, minicbor::Decode, Debug, Default, Clone, Eq, PartialEq)]
pub struct BookDetails {
    #[n(0)]
    title: Option<String>,
    #[n(1)]
    author: Option<String>,
    #[n(2)]
    isbn: Option<String>, // digits only once finalised
    #[n(3)]
    publisher: Option<String>,
    #[n(4)]
    publication_year: Option<i32>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Eq, PartialEq)]
pub struct Book {
    #[n(0)]
    pub id: String, // uuid7, bech32m under "book_"
    #[n(1)]
    pub details: BookDetails,
    #[n(2)]
    pub status: BookStatus,
    #[n(3)]
    pub requested_by: String,
    #[n(4)]
    pub created_at: TimeStamp,
    #[n(5)]
    pub updated_at: TimeStamp,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl BookDetails {
    /// Construct an empty request, fields are filled in with the setters below
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_title(mut self, title: &str) -> Self {
        self.title = Some(title.trim().to_string());
        self
    }
    pub fn set_author(mut self, author: &str) -> Self {
        self.author = Some(author.trim().to_string());
        self
    }
    pub fn set_isbn(mut self, isbn: &str) -> Self {
        self.isbn = Some(isbn.to_string());
        self
    }
    pub fn set_publisher(mut self, publisher: &str) -> Self {
        self.publisher = Some(publisher.trim().to_string());
        self
    }
    pub fn set_publication_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }
    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }
    pub fn publication_year(&self) -> Option<i32> {
        self.publication_year
    }

    // Checks required fields and normalises the isbn to bare digits
    pub fn validate_and_finalise(mut self) -> Result<Self, ValidationError> {
        if self.title.as_deref().is_none_or(str::is_empty) {
            return Err(ValidationError::MissingField("title"));
        }
        if self.author.as_deref().is_none_or(str::is_empty) {
            return Err(ValidationError::MissingField("author"));
        }
        let Some(isbn) = self.isbn.as_deref() else {
            return Err(ValidationError::MissingField("isbn"));
        };

        self.isbn = Some(normalise_isbn(isbn)?);
        Ok(self)
    }
}

/// Strips separators and accepts ten digits (last may be `X`) or thirteen digits.
pub fn normalise_isbn(raw: &str) -> Result<String, ValidationError> {
    let compact: String = raw
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let valid = match compact.len() {
        10 => compact
            .char_indices()
            .all(|(i, c)| c.is_ascii_digit() || (i == 9 && c == 'X')),
        13 => compact.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    };

    if valid {
        Ok(compact)
    } else {
        Err(ValidationError::InvalidIsbn(raw.to_string()))
    }
}

impl Book {
    /// A fresh request, always starts in [`BookStatus::Requested`]
    pub fn new(id: String, details: BookDetails, requested_by: String) -> Self {
        Self::new_with_status(id, details, requested_by, BookStatus::Requested)
    }
    pub fn new_with_status(
        id: String,
        details: BookDetails,
        requested_by: String,
        status: BookStatus,
    ) -> Self {
        let now = TimeStamp::new();
        Self {
            id,
            details,
            status,
            requested_by,
            created_at: now.clone(),
            updated_at: now,
        }
    }
    pub fn set_status(&mut self, status: BookStatus) {
        self.status = status;
        self.updated_at = TimeStamp::new();
    }
}

impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}
impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
