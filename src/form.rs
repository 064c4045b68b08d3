//! Contact form decoding and validation.
//!
//! A [`ContactForm`] is whatever the browser sent; a [`Submission`] is what
//! the store is allowed to write. The only way from one to the other is
//! [`ContactForm::validate`].

/// Raw contact form fields decoded from an urlencoded body.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ContactForm {
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A validated contact form entry, ready to be persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Submission {
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// The required field that was missing or blank.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MissingField {
    #[error("email is required")]
    Email,
    #[error("message is required")]
    Message,
}

impl ContactForm {
    /// Decodes an `application/x-www-form-urlencoded` body. Unknown fields
    /// are ignored; a repeated field keeps its first value.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut form = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "email" => &mut form.email,
                "subject" => &mut form.subject,
                "message" => &mut form.message,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        form
    }

    /// Requires a non-blank `email` and `message`. `subject` may be absent.
    pub fn validate(self) -> Result<Submission, MissingField> {
        let email = present(self.email).ok_or(MissingField::Email)?;
        let message = present(self.message).ok_or(MissingField::Message)?;
        Ok(Submission {
            email,
            subject: self.subject.unwrap_or_default(),
            message,
        })
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}
