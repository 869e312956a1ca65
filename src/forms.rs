//! Field validation and form decoding shared by all create/update
//! handlers. Rules mirror the forms: required fields fail closed,
//! optional fields are skipped when empty, free text is trimmed.
//! Failures accumulate as human-readable messages so the originating
//! form can be re-rendered with everything the user typed.

use axum::extract::Multipart;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::uploads;

pub type Errors = Vec<String>;

/// A decoded form submission: ordered text fields plus at most one
/// stored image. For multipart forms the image is content-sniffed and
/// written before field validation runs, so a sniff failure lands in
/// the same error list as everything else.
pub struct FormData {
    fields: Vec<(String, String)>,
    pub image: Option<String>,
    pub image_error: Option<String>,
}

impl FormData {
    /// Wrap an urlencoded body (forms without an image field).
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        Self {
            fields,
            image: None,
            image_error: None,
        }
    }

    /// Drain a multipart submission. The `image` part is validated by
    /// magic bytes and stored under `upload_dir` when it passes; an
    /// empty file part means "no image".
    pub async fn read(mut multipart: Multipart, upload_dir: &str) -> Result<Self, AppError> {
        let mut form = Self::from_fields(Vec::new());

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if data.is_empty() {
                    continue;
                }
                if data.len() > uploads::MAX_IMAGE_SIZE {
                    form.image_error = Some(format!(
                        "Image too large, maximum size is {} bytes",
                        uploads::MAX_IMAGE_SIZE
                    ));
                    continue;
                }
                match uploads::sniff_image(&data) {
                    Ok(format) => {
                        form.image = Some(uploads::store_image(&data, format, upload_dir).await?);
                    }
                    Err(msg) => form.image_error = Some(msg),
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.fields.push((name, value));
            }
        }

        Ok(form)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Throw away the stored upload after a failed validation pass.
    pub async fn discard_image(&self, upload_dir: &str) {
        if let Some(filename) = &self.image {
            uploads::remove_image(upload_dir, filename).await;
        }
    }
}

pub fn required_text(value: Option<&str>, min: usize, msg: &str, errors: &mut Errors) -> String {
    let trimmed = value.unwrap_or("").trim().to_string();
    if trimmed.chars().count() < min {
        errors.push(msg.to_string());
    }
    trimmed
}

pub fn optional_text(value: Option<&str>, min: usize, msg: &str, errors: &mut Errors) -> Option<String> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() < min {
        errors.push(msg.to_string());
    }
    Some(trimmed.to_string())
}

pub fn required_number(value: Option<&str>, msg: &str, errors: &mut Errors) -> f64 {
    match value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
    {
        Some(n) => n,
        None => {
            errors.push(msg.to_string());
            0.0
        }
    }
}

pub fn optional_number(value: Option<&str>, msg: &str, errors: &mut Errors) -> Option<f64> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => Some(n),
        Err(_) => {
            errors.push(msg.to_string());
            None
        }
    }
}

/// ISO-8601 dates: a bare date (what `<input type="date">` submits)
/// becomes midnight UTC; a full timestamp is taken as-is.
pub fn optional_date(value: Option<&str>, msg: &str, errors: &mut Errors) -> Option<DateTime<Utc>> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(_) => {
            errors.push(msg.to_string());
            None
        }
    }
}

pub fn required_id(value: Option<&str>, msg: &str, errors: &mut Errors) -> Option<Uuid> {
    match value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| Uuid::parse_str(v).ok())
    {
        Some(id) => Some(id),
        None => {
            errors.push(msg.to_string());
            None
        }
    }
}

pub fn optional_id(value: Option<&str>, msg: &str, errors: &mut Errors) -> Option<Uuid> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return None;
    }
    match Uuid::parse_str(trimmed) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(msg.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::from_fields(
            pairs
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn required_text_enforces_minimum_length() {
        let mut errors = Errors::new();
        let value = required_text(Some("  ok  "), 3, "too short", &mut errors);
        assert_eq!(value, "ok");
        assert_eq!(errors, vec!["too short".to_string()]);
    }

    #[test]
    fn required_text_trims_before_checking() {
        let mut errors = Errors::new();
        let value = required_text(Some("  Fruits  "), 3, "too short", &mut errors);
        assert_eq!(value, "Fruits");
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_text_skips_empty_values() {
        let mut errors = Errors::new();
        assert_eq!(optional_text(Some("   "), 3, "too short", &mut errors), None);
        assert_eq!(optional_text(None, 3, "too short", &mut errors), None);
        assert!(errors.is_empty());

        assert_eq!(
            optional_text(Some("ab"), 3, "too short", &mut errors),
            Some("ab".to_string())
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn numbers_are_coerced() {
        let mut errors = Errors::new();
        assert_eq!(required_number(Some("2.5"), "bad", &mut errors), 2.5);
        assert!(errors.is_empty());

        required_number(Some("a lot"), "bad", &mut errors);
        assert_eq!(errors, vec!["bad".to_string()]);

        assert_eq!(optional_number(Some(""), "bad", &mut errors), None);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn dates_parse_from_iso_8601() {
        let mut errors = Errors::new();
        assert_eq!(
            optional_date(Some("2024-03-01"), "bad date", &mut errors),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            optional_date(Some("2024-03-01T10:30:00Z"), "bad date", &mut errors),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(optional_date(Some(""), "bad date", &mut errors), None);
        assert!(errors.is_empty());

        optional_date(Some("next tuesday"), "bad date", &mut errors);
        assert_eq!(errors, vec!["bad date".to_string()]);
    }

    #[test]
    fn ids_must_be_uuids() {
        let mut errors = Errors::new();
        let id = Uuid::new_v4();
        assert_eq!(
            required_id(Some(&id.to_string()), "pick one", &mut errors),
            Some(id)
        );
        assert_eq!(required_id(Some(""), "pick one", &mut errors), None);
        assert_eq!(errors, vec!["pick one".to_string()]);
    }

    #[test]
    fn repeated_fields_keep_their_order() {
        let form = form(&[
            ("cookware[]", "a"),
            ("title", "Soup"),
            ("cookware[]", "b"),
        ]);
        assert_eq!(form.values("cookware[]"), vec!["a", "b"]);
        assert_eq!(form.value("title"), Some("Soup"));
        assert_eq!(form.value("missing"), None);
    }
}
