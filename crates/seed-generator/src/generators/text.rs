//! Localized (pt-BR) text generators backed by `fake`.

use crate::FixtureRng;
use fake::faker::address::raw::{BuildingNumber, CityName, StateAbbr, StateName, StreetName, ZipCode};
use fake::faker::company::raw::CompanyName;
use fake::faker::lorem::raw::{Sentence, Word};
use fake::faker::name::raw::{FirstName, Name};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::PT_BR;
use fake::Fake;

const NEIGHBORHOODS: [&str; 12] = [
    "Centro",
    "Jardim América",
    "Vila Nova",
    "Boa Vista",
    "Santa Cruz",
    "São Cristóvão",
    "Liberdade",
    "Bela Vista",
    "Campo Grande",
    "Jardim Primavera",
    "Vila Mariana",
    "Industrial",
];

/// Full person name.
pub fn person_name(rng: &mut FixtureRng) -> String {
    Name(PT_BR).fake_with_rng(rng)
}

/// Given name only.
pub fn first_name(rng: &mut FixtureRng) -> String {
    FirstName(PT_BR).fake_with_rng(rng)
}

/// Company name.
pub fn company_name(rng: &mut FixtureRng) -> String {
    CompanyName(PT_BR).fake_with_rng(rng)
}

/// City name.
pub fn city_name(rng: &mut FixtureRng) -> String {
    CityName(PT_BR).fake_with_rng(rng)
}

/// State name.
pub fn state_name(rng: &mut FixtureRng) -> String {
    StateName(PT_BR).fake_with_rng(rng)
}

/// Two-letter state abbreviation.
pub fn state_abbr(rng: &mut FixtureRng) -> String {
    StateAbbr(PT_BR).fake_with_rng(rng)
}

/// Street name.
pub fn street_name(rng: &mut FixtureRng) -> String {
    StreetName(PT_BR).fake_with_rng(rng)
}

/// Phone number.
pub fn phone_number(rng: &mut FixtureRng) -> String {
    PhoneNumber(PT_BR).fake_with_rng(rng)
}

/// Neighborhood (bairro).
pub fn neighborhood(rng: &mut FixtureRng) -> String {
    rng.pick(&NEIGHBORHOODS).to_string()
}

/// Single line postal address, parts joined by `separator`.
pub fn address(rng: &mut FixtureRng, separator: &str) -> String {
    let street = street_name(rng);
    let number: String = BuildingNumber(PT_BR).fake_with_rng(rng);
    let district = neighborhood(rng);
    let city = city_name(rng);
    let state = state_abbr(rng);
    let zip: String = ZipCode(PT_BR).fake_with_rng(rng);
    format!("{street}, {number}{separator}{district}{separator}{zip} {city} / {state}")
}

/// Sentence of exactly `words` words.
pub fn sentence(rng: &mut FixtureRng, words: usize) -> String {
    Sentence(PT_BR, words..words + 1).fake_with_rng(rng)
}

/// Single capitalized word.
pub fn capitalized_word(rng: &mut FixtureRng) -> String {
    let word: String = Word(PT_BR).fake_with_rng(rng);
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => word,
    }
}

/// Truncate to at most `max_chars` characters so the value fits its column.
pub fn fit(value: String, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value
    } else {
        value.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rng(seed: u64) -> FixtureRng {
        FixtureRng::new(seed, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc".to_string(), 5), "abc");
        assert_eq!(fit("São Paulo".to_string(), 3), "São");
    }

    #[test]
    fn test_text_is_deterministic() {
        let mut a = rng(9);
        let mut b = rng(9);
        assert_eq!(person_name(&mut a), person_name(&mut b));
        assert_eq!(company_name(&mut a), company_name(&mut b));
        assert_eq!(address(&mut a, " "), address(&mut b, " "));
    }

    #[test]
    fn test_generators_produce_text() {
        let mut rng = rng(1);
        assert!(!person_name(&mut rng).is_empty());
        assert!(!city_name(&mut rng).is_empty());
        assert!(!phone_number(&mut rng).is_empty());
        assert!(!address(&mut rng, ", ").contains('\n'));
        let word = capitalized_word(&mut rng);
        assert!(word.chars().next().map(char::is_uppercase).unwrap_or(true));
    }
}
