//! Turns a parsed forecast into a single paragraph meant to be read aloud.

use crate::error::AppError;
use crate::models::{Block, DataPoint, Forecast, Period};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How the summary is worded.
///
/// `Spoken` always mentions the apparent temperature and reads negative
/// numbers as "minus". `Brief` only mentions the apparent temperature when it
/// differs from the measured one and says "until the" for time ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryStyle {
    #[default]
    Spoken,
    Brief,
}

impl SummaryStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStyle::Spoken => "spoken",
            SummaryStyle::Brief => "brief",
        }
    }

    /// Blocks requested to be left out when the caller did not choose any.
    pub fn default_exclude(&self) -> BTreeSet<Block> {
        match self {
            SummaryStyle::Spoken => BTreeSet::from([Block::Hourly]),
            SummaryStyle::Brief => BTreeSet::from([Block::Minutely, Block::Flags]),
        }
    }

    fn mentions_feels_like(&self, temperature: i64, apparent: i64) -> bool {
        match self {
            SummaryStyle::Spoken => true,
            SummaryStyle::Brief => temperature != apparent,
        }
    }

    /// Applies the style's fixed wording substitutions.
    pub fn substitute(&self, text: &str) -> String {
        let text = replace_degrees(text);
        match self {
            SummaryStyle::Spoken => replace_minus(&replace_precipitation(&text)),
            SummaryStyle::Brief => replace_precipitation(&replace_until(&text)),
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spoken" => Ok(SummaryStyle::Spoken),
            "brief" => Ok(SummaryStyle::Brief),
            other => Err(AppError::Config(format!("Unknown summary style: {}", other))),
        }
    }
}

/// Builds the summary for `period` and applies the style's substitutions.
pub fn compose(forecast: &Forecast, period: Period, style: SummaryStyle) -> Result<String, AppError> {
    let text = match period.normalized() {
        Period::Today => today(forecast, style)?,
        Period::Day(offset) => day(forecast, offset)?,
    };
    Ok(style.substitute(&text))
}

fn today(forecast: &Forecast, style: SummaryStyle) -> Result<String, AppError> {
    let currently = forecast
        .currently
        .as_ref()
        .ok_or_else(|| missing("currently"))?;
    let summary = currently
        .summary
        .as_deref()
        .ok_or_else(|| missing("currently.summary"))?;
    let temperature = whole(
        currently
            .temperature
            .ok_or_else(|| missing("currently.temperature"))?,
    );
    let outlook = forecast
        .hourly
        .as_ref()
        .and_then(|block| block.summary.as_deref())
        .or_else(|| forecast.daily.as_ref().and_then(|block| block.summary.as_deref()))
        .ok_or_else(|| missing("hourly.summary"))?;

    let mut text = String::new();
    for alert in forecast.alerts.iter().flatten() {
        text.push_str(&format!("Alert for {}. ", alert.title));
    }

    text.push_str(&format!("{} and {} degrees", summary, temperature));

    match currently.apparent_temperature.map(whole) {
        Some(apparent) if style.mentions_feels_like(temperature, apparent) => {
            text.push_str(&format!(" feeling like {}. ", apparent));
        }
        _ => text.push_str(". "),
    }

    text.push_str(&format!("Expect {}", outlook));
    Ok(text)
}

fn day(forecast: &Forecast, offset: u8) -> Result<String, AppError> {
    let point: &DataPoint = forecast
        .daily
        .as_ref()
        .and_then(|block| block.data.get(usize::from(offset)))
        .ok_or_else(|| missing(&format!("daily.data[{}]", offset)))?;

    let summary = point
        .summary
        .as_deref()
        .ok_or_else(|| missing(&format!("daily.data[{}].summary", offset)))?;
    let min = point
        .temperature_min
        .ok_or_else(|| missing(&format!("daily.data[{}].temperatureMin", offset)))?;
    let max = point
        .temperature_max
        .ok_or_else(|| missing(&format!("daily.data[{}].temperatureMax", offset)))?;

    Ok(format!(
        "{} With temperatures from {} to {} degrees",
        summary.trim_end(),
        whole(min),
        whole(max)
    ))
}

fn missing(field: &str) -> AppError {
    AppError::MissingField(field.to_string())
}

/// Temperatures are read out as whole numbers, truncated toward zero.
fn whole(value: f64) -> i64 {
    value.trunc() as i64
}

fn replace_degrees(text: &str) -> String {
    text.replace("°C", " degrees")
        .replace("°c", " degrees")
        .replace('\u{2103}', " degrees")
}

fn replace_precipitation(text: &str) -> String {
    const WORD: &str = "precipitation";

    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(WORD) {
        out.push_str(&text[last..start]);
        out.push_str(if text[start..].starts_with('P') { "Rain" } else { "rain" });
        last = start + WORD.len();
    }
    out.push_str(&text[last..]);
    out
}

fn replace_until(text: &str) -> String {
    const WORD: &str = "until";

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in text.match_indices(WORD) {
        let end = start + WORD.len();
        out.push_str(&text[last..end]);
        if !text[end..].starts_with(" the") {
            out.push_str(" the");
        }
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

/// A dash is a sign only in front of a digit and not right after one,
/// so ranges like "3-5" keep their dash.
fn replace_minus(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let after_digit = prev.is_some_and(|p| p.is_ascii_digit());
        if c == '-' && !after_digit && chars.peek().is_some_and(|next| next.is_ascii_digit()) {
            out.push_str("minus ");
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}
