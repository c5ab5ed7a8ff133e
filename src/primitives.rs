// fhir-fuzzing/src/primitives.rs
//! Scalar value fuzzers: strings, ids, codes, dates, urls
//!
//! All functions draw from the context RNG so a seeded session replays
//! identical values.

use crate::context::FuzzerContext;
use chrono::{Duration, NaiveDate, Utc};
use fake::faker::address::en::{CityName, StreetName, ZipCode};
use fake::faker::lorem::en::Word;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::Rng;

const LANGUAGE_CODES: &[&str] = &["de", "en", "fr", "it", "es", "nl", "pl", "tr", "da", "pt"];

/// A printable string of length 1..=max_length
pub fn random_string(ctx: &mut FuzzerContext, max_length: usize) -> String {
    let len = ctx.rng().gen_range(1..=max_length.max(1));
    ctx.rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A UUID built from the context RNG, so replays stay deterministic
pub fn random_id(ctx: &mut FuzzerContext) -> String {
    uuid::Builder::from_random_bytes(ctx.rng().gen())
        .into_uuid()
        .to_string()
}

/// A two-letter language code from a small common set
pub fn random_language_code(ctx: &mut FuzzerContext) -> String {
    let idx = ctx.rng().gen_range(0..LANGUAGE_CODES.len());
    LANGUAGE_CODES[idx].to_string()
}

/// A plausible https url
pub fn random_url(ctx: &mut FuzzerContext) -> String {
    let host: String = Word().fake_with_rng(ctx.rng());
    let path: String = Word().fake_with_rng(ctx.rng());
    format!("https://{}.example.org/{}", host, path)
}

/// Any plausible date, past or future
pub fn random_date(ctx: &mut FuzzerContext) -> NaiveDate {
    let year = ctx.rng().gen_range(1950..=2035);
    let month = ctx.rng().gen_range(1..=12);
    // day capped at 28 so every month is valid
    let day = ctx.rng().gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// A past-only date within the given horizon, e.g. for birth dates
pub fn random_date_back(ctx: &mut FuzzerContext, years_back: u32) -> NaiveDate {
    let horizon_days = i64::from(years_back.max(1)) * 365;
    let offset = ctx.rng().gen_range(0..=horizon_days);
    Utc::now().date_naive() - Duration::days(offset)
}

/// A positive decimal with two fraction digits
pub fn random_decimal(ctx: &mut FuzzerContext) -> f64 {
    f64::from(ctx.rng().gen_range(1..100_000)) / 100.0
}

/// A plausible given name
pub fn random_given_name(ctx: &mut FuzzerContext) -> String {
    FirstName().fake_with_rng(ctx.rng())
}

/// A plausible family name
pub fn random_family_name(ctx: &mut FuzzerContext) -> String {
    LastName().fake_with_rng(ctx.rng())
}

/// A plausible city name
pub fn random_city(ctx: &mut FuzzerContext) -> String {
    CityName().fake_with_rng(ctx.rng())
}

/// A plausible street line
pub fn random_street_line(ctx: &mut FuzzerContext) -> String {
    let street: String = StreetName().fake_with_rng(ctx.rng());
    let number = ctx.rng().gen_range(1..200);
    format!("{} {}", street, number)
}

/// A plausible postal code
pub fn random_postal_code(ctx: &mut FuzzerContext) -> String {
    ZipCode().fake_with_rng(ctx.rng())
}

/// A lowercase word, for codes and display texts
pub fn random_word(ctx: &mut FuzzerContext) -> String {
    Word().fake_with_rng(ctx.rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuzzConfig;
    use chrono::Utc;

    fn context() -> FuzzerContext {
        FuzzerContext::with_seed(FuzzConfig::default(), 42)
    }

    #[test]
    fn test_random_string_is_length_bounded() {
        let mut ctx = context();
        for _ in 0..100 {
            let s = random_string(&mut ctx, 12);
            assert!(!s.is_empty() && s.len() <= 12);
        }
        // a zero bound still yields a usable value
        assert_eq!(random_string(&mut ctx, 0).len(), 1);
    }

    #[test]
    fn test_random_id_is_uuid_shaped() {
        let mut ctx = context();
        let id = random_id(&mut ctx);
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
    }

    #[test]
    fn test_random_date_back_stays_in_horizon() {
        let mut ctx = context();
        let today = Utc::now().date_naive();
        for _ in 0..100 {
            let date = random_date_back(&mut ctx, 80);
            assert!(date <= today);
            assert!((today - date).num_days() <= 80 * 365);
        }
    }

    #[test]
    fn test_language_code_is_known() {
        let mut ctx = context();
        let code = random_language_code(&mut ctx);
        assert!(LANGUAGE_CODES.contains(&code.as_str()));
    }
}
