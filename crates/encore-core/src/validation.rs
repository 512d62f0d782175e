//! Client-side form validation.
//!
//! Front-ends run these checks before calling the API so obvious mistakes
//! are reported without a round trip. The server still validates everything;
//! the domain query modules never call into this module.

use chrono::{NaiveDate, NaiveTime};

use crate::Result;
use crate::credentials::Credentials;
use crate::error::{FieldViolation, InvalidInputError};
use crate::models::{
    CreatePerformanceRequest, CreateReviewRequest, EmailVerificationRequest, Role, SignInRequest,
    SignUpRequest, UpdatePerformanceRequest, UpdateReviewRequest,
};

/// Sign-up form including the password confirmation field.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.0.push(FieldViolation {
                field,
                message: message.to_string(),
            });
        }
    }

    fn finish(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(InvalidInputError::Validation(self.0).into())
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}

fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.trim().chars().count())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok()
}

/// Validate a sign-up form and build the request body.
pub fn sign_up(form: &SignUpForm) -> Result<SignUpRequest> {
    let mut v = Violations::default();
    v.check(!form.email.trim().is_empty(), "email", "is required");
    v.check(
        form.email.trim().is_empty() || is_email(form.email.trim()),
        "email",
        "must be a valid email address",
    );
    v.check(
        is_strong_password(&form.password),
        "password",
        "must be at least 8 characters with upper case, lower case and a digit",
    );
    v.check(
        form.password == form.confirm_password,
        "confirmPassword",
        "does not match the password",
    );
    v.check(
        length_between(&form.name, 2, 50),
        "name",
        "must be between 2 and 50 characters",
    );
    v.finish()?;

    Ok(SignUpRequest {
        email: form.email.trim().to_string(),
        password: form.password.clone(),
        name: form.name.trim().to_string(),
        role: form.role,
    })
}

/// Validate sign-in fields.
pub fn sign_in(credentials: &Credentials) -> Result<SignInRequest> {
    let mut v = Violations::default();
    let email = credentials.email();
    v.check(!email.is_empty(), "email", "is required");
    v.check(
        email.is_empty() || is_email(email),
        "email",
        "must be a valid email address",
    );
    v.check(!credentials.password().is_empty(), "password", "is required");
    v.finish()?;

    Ok(SignInRequest::from(credentials))
}

/// Validate an email verification attempt.
pub fn email_verification(email: &str, code: &str) -> Result<EmailVerificationRequest> {
    let mut v = Violations::default();
    v.check(is_email(email.trim()), "email", "must be a valid email address");
    v.check(!code.trim().is_empty(), "verificationCode", "is required");
    v.finish()?;

    Ok(EmailVerificationRequest {
        email: email.trim().to_string(),
        verification_code: code.trim().to_string(),
    })
}

/// Validate a new performance listing against `today`.
pub fn new_performance(request: &CreatePerformanceRequest, today: NaiveDate) -> Result<()> {
    let mut v = Violations::default();
    check_title(&mut v, &request.title);
    check_content(&mut v, &request.content);
    v.check(!request.genre.trim().is_empty(), "genre", "is required");
    check_band(&mut v, &request.band_name);
    check_venue(&mut v, &request.venue);
    check_date(&mut v, &request.performance_date, today);
    check_times(&mut v, Some(&request.start_time), Some(&request.end_time));
    v.finish()
}

/// Validate the fields present in a performance update against `today`.
pub fn performance_update(request: &UpdatePerformanceRequest, today: NaiveDate) -> Result<()> {
    let mut v = Violations::default();
    if let Some(title) = &request.title {
        check_title(&mut v, title);
    }
    if let Some(content) = &request.content {
        check_content(&mut v, content);
    }
    if let Some(genre) = &request.genre {
        v.check(!genre.trim().is_empty(), "genre", "is required");
    }
    if let Some(band) = &request.band_name {
        check_band(&mut v, band);
    }
    if let Some(venue) = &request.venue {
        check_venue(&mut v, venue);
    }
    if let Some(date) = &request.performance_date {
        check_date(&mut v, date, today);
    }
    check_times(
        &mut v,
        request.start_time.as_deref(),
        request.end_time.as_deref(),
    );
    v.finish()
}

/// Validate a new review.
pub fn new_review(request: &CreateReviewRequest) -> Result<()> {
    let mut v = Violations::default();
    check_rating(&mut v, request.rating);
    check_review_content(&mut v, &request.content);
    v.finish()
}

/// Validate the fields present in a review update.
pub fn review_update(request: &UpdateReviewRequest) -> Result<()> {
    let mut v = Violations::default();
    if let Some(rating) = request.rating {
        check_rating(&mut v, rating);
    }
    if let Some(content) = &request.content {
        check_review_content(&mut v, content);
    }
    v.finish()
}

fn check_title(v: &mut Violations, title: &str) {
    v.check(
        length_between(title, 1, 100),
        "title",
        "must be between 1 and 100 characters",
    );
}

fn check_content(v: &mut Violations, content: &str) {
    v.check(
        length_between(content, 10, 1000),
        "content",
        "must be between 10 and 1000 characters",
    );
}

fn check_band(v: &mut Violations, band: &str) {
    v.check(
        length_between(band, 1, 50),
        "bandName",
        "must be between 1 and 50 characters",
    );
}

fn check_venue(v: &mut Violations, venue: &str) {
    v.check(
        length_between(venue, 1, 100),
        "venue",
        "must be between 1 and 100 characters",
    );
}

fn check_date(v: &mut Violations, date: &str, today: NaiveDate) {
    match parse_date(date) {
        Some(day) => v.check(day >= today, "performanceDate", "must not be in the past"),
        None => v.check(false, "performanceDate", "must be a date (YYYY-MM-DD)"),
    }
}

fn check_times(v: &mut Violations, start: Option<&str>, end: Option<&str>) {
    let start_time = start.map(|s| (s, parse_time(s)));
    let end_time = end.map(|s| (s, parse_time(s)));

    if let Some((_, parsed)) = start_time {
        v.check(parsed.is_some(), "startTime", "must be a time (HH:MM)");
    }
    if let Some((_, parsed)) = end_time {
        v.check(parsed.is_some(), "endTime", "must be a time (HH:MM)");
    }
    if let (Some((_, Some(s))), Some((_, Some(e)))) = (start_time, end_time) {
        v.check(e > s, "endTime", "must be after the start time");
    }
}

fn check_rating(v: &mut Violations, rating: u8) {
    v.check((1..=5).contains(&rating), "rating", "must be between 1 and 5");
}

fn check_review_content(v: &mut Violations, content: &str) {
    v.check(
        length_between(content, 10, 500),
        "content",
        "must be between 10 and 500 characters",
    );
}
