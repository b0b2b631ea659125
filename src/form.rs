//! Parsing of the active-date form fields.

use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map_res},
    sequence::tuple,
    IResult,
};
use std::num::ParseIntError;

use crate::calendar::CalendarDate;
use crate::error::{Error, ErrorKind, Result};
use crate::surface::ClassName;
use crate::view::Classes;

pub const DATE_FORMAT_MESSAGE: &str = "Please, give the date as \"YYYY-MM-DD\"";

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn digits(n: usize) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input| take_while_m_n(n, n, |c: char| c.is_ascii_digit())(input)
}

fn iso_date(input: &str) -> IResult<&str, (i32, u32, u32)> {
    map_res(
        tuple((digits(4), char('-'), digits(2), char('-'), digits(2))),
        |(year, _, month, _, day)| -> std::result::Result<_, ParseIntError> {
            Ok((year.parse()?, month.parse()?, day.parse()?))
        },
    )(input)
}

/// Finds the first word-bounded `YYYY-MM-DD` literal in `text`.
///
/// Only the shape is checked here, `2023-13-01` is found as `(2023, 13, 1)`.
pub fn find_date_literal(text: &str) -> Option<(i32, u32, u32)> {
    let mut prev: Option<char> = None;

    for (idx, c) in text.char_indices() {
        let at_boundary = prev.map_or(true, |p| !is_word_char(p));
        prev = Some(c);

        if !at_boundary || !c.is_ascii_digit() {
            continue;
        }

        if let Ok((rest, ymd)) = iso_date(&text[idx..]) {
            if rest.chars().next().map_or(true, |n| !is_word_char(n)) {
                return Some(ymd);
            }
        }
    }

    None
}

/// Parses a string consisting of exactly one `YYYY-MM-DD` literal.
pub fn parse_exact_date(text: &str) -> Result<CalendarDate> {
    let (_, (year, month, day)) = all_consuming(iso_date)(text.trim())?;
    CalendarDate::from_ymd(year, month, day)
}

/// Extracts the date from the free text date field.
///
/// Literals that have the right shape but name no existing day (month 13,
/// February 30th, ...) are rejected instead of rolling over.
pub fn parse_date_field(text: &str) -> Result<CalendarDate> {
    let (year, month, day) = find_date_literal(text)
        .ok_or_else(|| Error::new(ErrorKind::MalformedInput, DATE_FORMAT_MESSAGE))?;

    CalendarDate::from_ymd(year, month, day)
        .map_err(|e| Error::new(ErrorKind::MalformedInput, &e.user_message()))
}

/// An empty class field falls back to the active class of `classes`.
///
/// The initial and adjacent markers are rejected, they belong to the view.
pub fn parse_class_field(text: &str, classes: &Classes) -> Result<ClassName> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(classes.active.clone());
    }

    let class = ClassName::new(text)?;
    if classes.is_reserved(&class) {
        return Err(Error::new(
            ErrorKind::MalformedInput,
            &format!("The class name '{}' is reserved by the calendar", class),
        ));
    }
    Ok(class)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDateForm {
    pub date: CalendarDate,
    pub class: ClassName,
}

impl ActiveDateForm {
    pub fn parse(date_text: &str, class_text: &str, classes: &Classes) -> Result<Self> {
        let date = parse_date_field(date_text)?;
        let class = parse_class_field(class_text, classes)?;
        Ok(ActiveDateForm { date, class })
    }
}
