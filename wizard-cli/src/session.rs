//! The interactive menu loop: date, then location, then the optional outfit advice.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::NaiveDate;
use wizard_core::{Coordinates, DailySummary, Place, Services, WeatherRequest};

use crate::console::Console;
use crate::menu::{
    self, DateChoice, LOCATION_MENU, LocationChoice, Menu, SUGGESTION_MENU, SuggestionChoice,
};

const BANNER: &str =
    "\n=== 🌦️  Weather Wizard 3000 🌈 ===\nYour personal weather forecasting assistant!";
const FAREWELL: &str =
    "\n✨ Thank you for using Weather Wizard 3000!\n☁️  Stay dry and have a wonderful day!\n";
const INVALID_OPTION: &str = "⚠️  Invalid option! Please try again.";

/// Outcome of a step that the user may abandon by exiting.
#[derive(Debug)]
enum Step<T> {
    Next(T),
    Exit,
}

/// Lifts the value out of a [`Step`], returning `Step::Exit` from the caller on exit.
macro_rules! next {
    ($step:expr) => {
        match $step {
            Step::Next(value) => value,
            Step::Exit => return Ok(Step::Exit),
        }
    };
}

/// Source of the current local date, read once per round.
pub type Clock = Box<dyn Fn() -> NaiveDate + Send>;

pub struct Session<R, W> {
    services: Services,
    console: Console<R, W>,
    clock: Clock,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        services: Services,
        console: Console<R, W>,
        clock: impl Fn() -> NaiveDate + Send + 'static,
    ) -> Self {
        Self { services, console, clock: Box::new(clock) }
    }

    /// Run menus until the user exits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        self.console.println(BANNER)?;

        while let Step::Next(()) = self.round().await? {}

        self.console.println(FAREWELL)?;
        Ok(())
    }

    async fn round(&mut self) -> Result<Step<()>> {
        let today = (self.clock)();
        let date = next!(self.select_date(today)?);
        tracing::debug!(%date, "date selected");

        let summary = next!(self.select_location(date).await?);
        self.select_suggestion(&summary).await
    }

    /// Show `text` until a valid choice is entered.
    fn choose<M: Menu>(&mut self, text: &str) -> Result<Step<M>> {
        loop {
            self.console.print(text)?;
            let Some(line) = self.console.read_line()? else {
                return Ok(Step::Exit);
            };

            match M::parse(&line) {
                Some(choice) => return Ok(Step::Next(choice)),
                None => self.console.println(INVALID_OPTION)?,
            }
        }
    }

    fn select_date(&mut self, today: NaiveDate) -> Result<Step<NaiveDate>> {
        let text = menu::date_menu(today);
        let choice = next!(self.choose::<DateChoice>(&text)?);

        Ok(match choice.date(today) {
            Some(date) => Step::Next(date),
            None => Step::Exit,
        })
    }

    async fn select_location(&mut self, date: NaiveDate) -> Result<Step<DailySummary>> {
        loop {
            let choice = next!(self.choose::<LocationChoice>(LOCATION_MENU)?);

            let place = match choice {
                LocationChoice::CityName => next!(self.read_city()?),
                LocationChoice::CurrentLocation => Some(self.detect_location().await?),
                LocationChoice::ManualCoordinates => next!(self.read_coordinates()?),
                LocationChoice::Exit => return Ok(Step::Exit),
            };

            let Some(place) = place else { continue };
            if let Some(summary) = self.fetch(place, date).await? {
                return Ok(Step::Next(summary));
            }
        }
    }

    fn read_city(&mut self) -> Result<Step<Option<Place>>> {
        self.console.print("\nEnter city name (e.g., Tokyo): ")?;
        let line = next!(self.read()?);

        let city = line.trim();
        if city.is_empty() {
            self.console.println("⚠️  City name cannot be empty.")?;
            return Ok(Step::Next(None));
        }
        Ok(Step::Next(Some(Place::City(city.to_string()))))
    }

    async fn detect_location(&mut self) -> Result<Place> {
        self.console.println("\n🔍 Detecting your location...")?;
        let coords = self.services.locator.locate().await;
        self.console.println(&format!("📍 Detected coordinates: {coords}"))?;
        Ok(Place::Coordinates(coords))
    }

    /// Read both values, then range-check them. Out of range skips the fetch.
    fn read_coordinates(&mut self) -> Result<Step<Option<Place>>> {
        self.console.print("\nEnter latitude (-90 to 90): ")?;
        let latitude = next!(self.read_number("latitude")?);

        self.console.print("Enter longitude (-180 to 180): ")?;
        let longitude = next!(self.read_number("longitude")?);

        match Coordinates::new(latitude, longitude) {
            Ok(coords) => Ok(Step::Next(Some(Place::Coordinates(coords)))),
            Err(err) => {
                tracing::debug!(error = %err, "rejected coordinates");
                self.console.println("❌  Invalid coordinates! Values out of range.")?;
                Ok(Step::Next(None))
            }
        }
    }

    /// Re-prompts inline until the line parses as a number.
    fn read_number(&mut self, what: &str) -> Result<Step<f64>> {
        loop {
            let line = next!(self.read()?);
            match line.trim().parse::<f64>() {
                Ok(value) => return Ok(Step::Next(value)),
                Err(_) => self
                    .console
                    .print(&format!("Invalid {what}! Please enter a valid number: "))?,
            }
        }
    }

    /// Fetch and print the summary. Failures are printed and yield `None`.
    async fn fetch(&mut self, place: Place, date: NaiveDate) -> Result<Option<DailySummary>> {
        let request = WeatherRequest { place, date };

        match self.services.forecast.daily_summary(&request).await {
            Ok(summary) => {
                self.console.println(&format!("\n{summary}"))?;
                Ok(Some(summary))
            }
            Err(err) => {
                tracing::info!(error = %err, ?request, "forecast fetch failed");
                self.console.println(&format!("⛈️  Failed to fetch data: {err}"))?;
                Ok(None)
            }
        }
    }

    async fn select_suggestion(&mut self, summary: &DailySummary) -> Result<Step<()>> {
        match next!(self.choose::<SuggestionChoice>(SUGGESTION_MENU)?) {
            SuggestionChoice::Yes => {
                self.console.println("\n🧙 Consulting the Weather Wizard...\n")?;
                let message = match self.services.suggestions.suggest(summary).await {
                    Ok(text) => text,
                    Err(err) => format!("Error generating fashion suggestion: {err}"),
                };
                self.console.println(&message)?;
            }
            SuggestionChoice::No => {}
        }
        Ok(Step::Next(()))
    }

    fn read(&mut self) -> Result<Step<String>> {
        Ok(match self.console.read_line()? {
            Some(line) => Step::Next(line),
            None => Step::Exit,
        })
    }
}
