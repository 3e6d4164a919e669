//! Numbered menus and the mapping from typed numbers to choices.

use chrono::{Days, NaiveDate};

/// How many days past today the date menu offers (the forecast covers five days).
pub const MAX_DAYS_AHEAD: u8 = 4;

/// A menu whose entries are selected by number.
pub trait Menu: Sized {
    fn from_number(number: i64) -> Option<Self>;

    /// Parse one input line. Anything that is not a listed number is `None`.
    fn parse(line: &str) -> Option<Self> {
        line.trim().parse::<i64>().ok().and_then(Self::from_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateChoice {
    DaysAhead(u8),
    Exit,
}

impl DateChoice {
    pub fn date(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateChoice::DaysAhead(days) => today.checked_add_days(Days::new(days.into())),
            DateChoice::Exit => None,
        }
    }
}

impl Menu for DateChoice {
    fn from_number(number: i64) -> Option<Self> {
        match number {
            1..=5 => u8::try_from(number - 1).ok().map(DateChoice::DaysAhead),
            6 => Some(DateChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationChoice {
    CityName,
    CurrentLocation,
    ManualCoordinates,
    Exit,
}

impl Menu for LocationChoice {
    fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(LocationChoice::CityName),
            2 => Some(LocationChoice::CurrentLocation),
            3 => Some(LocationChoice::ManualCoordinates),
            4 => Some(LocationChoice::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionChoice {
    Yes,
    No,
}

impl Menu for SuggestionChoice {
    fn from_number(number: i64) -> Option<Self> {
        match number {
            1 => Some(SuggestionChoice::Yes),
            2 => Some(SuggestionChoice::No),
            _ => None,
        }
    }
}

pub fn date_menu(today: NaiveDate) -> String {
    let mut menu = String::from("\n-------- Main Menu --------\n1. Today\n2. Tomorrow\n");
    for days in 2..=MAX_DAYS_AHEAD {
        if let Some(date) = today.checked_add_days(Days::new(days.into())) {
            menu.push_str(&format!("{}. {date}\n", days + 1));
        }
    }
    menu.push_str("6. Exit\nEnter your choice (1-6): ");
    menu
}

pub const LOCATION_MENU: &str = "\nChoose one of the following search methods:\n\
1. Search by city name\n\
2. Use my current location\n\
3. Enter coordinates manually\n\
4. Exit\n\
Enter your choice (1-4): ";

pub const SUGGESTION_MENU: &str =
    "\nDo you want the Weather Wizard 3000 to help you dress properly in this weather?\n\
1. Yes\n\
2. No\n\
Enter your choice (1-2): ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_choices_map_to_offsets() {
        assert_eq!(DateChoice::parse("1"), Some(DateChoice::DaysAhead(0)));
        assert_eq!(DateChoice::parse(" 5 "), Some(DateChoice::DaysAhead(4)));
        assert_eq!(DateChoice::parse("6"), Some(DateChoice::Exit));
    }

    #[test]
    fn out_of_range_numbers_are_invalid() {
        assert_eq!(DateChoice::parse("0"), None);
        assert_eq!(DateChoice::parse("7"), None);
        assert_eq!(DateChoice::parse("-1"), None);
        assert_eq!(LocationChoice::parse("5"), None);
        assert_eq!(SuggestionChoice::parse("3"), None);
    }

    #[test]
    fn non_numeric_input_is_invalid() {
        assert_eq!(DateChoice::parse("abc"), None);
        assert_eq!(LocationChoice::parse(""), None);
        assert_eq!(SuggestionChoice::parse("yes"), None);
        assert_eq!(LocationChoice::parse("1.5"), None);
        assert_eq!(DateChoice::parse("99999999999999999999999"), None);
    }

    #[test]
    fn location_and_suggestion_choices() {
        assert_eq!(LocationChoice::parse("1"), Some(LocationChoice::CityName));
        assert_eq!(LocationChoice::parse("2"), Some(LocationChoice::CurrentLocation));
        assert_eq!(LocationChoice::parse("3"), Some(LocationChoice::ManualCoordinates));
        assert_eq!(LocationChoice::parse("4"), Some(LocationChoice::Exit));
        assert_eq!(SuggestionChoice::parse("1"), Some(SuggestionChoice::Yes));
        assert_eq!(SuggestionChoice::parse("2"), Some(SuggestionChoice::No));
    }

    #[test]
    fn date_choice_resolves_against_today() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();

        assert_eq!(DateChoice::DaysAhead(0).date(today), Some(today));
        assert_eq!(
            DateChoice::DaysAhead(3).date(today),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
        assert_eq!(DateChoice::Exit.date(today), None);
    }

    #[test]
    fn date_menu_lists_upcoming_dates() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let menu = date_menu(today);

        assert!(menu.contains("1. Today\n2. Tomorrow\n"));
        assert!(menu.contains("3. 2024-02-29\n"));
        assert!(menu.contains("4. 2024-03-01\n"));
        assert!(menu.contains("5. 2024-03-02\n"));
        assert!(menu.ends_with("6. Exit\nEnter your choice (1-6): "));
    }
}
