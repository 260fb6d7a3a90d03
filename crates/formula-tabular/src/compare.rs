//! Per-type cell comparators.
//!
//! Every comparator is a plain function pointer: the registry is a `match` over
//! [`LogicalType`], so comparators can be shared freely between concurrent sort passes.

use crate::frame::{CellValue, LogicalType};
use std::cmp::Ordering;
use std::iter::Peekable;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A total-order comparator over two cells.
pub type Comparator = fn(&CellValue, &CellValue) -> Ordering;

/// Returns the comparator used to order cells of the given type.
///
/// - `Frame` cells order by their reduced `value` (missing values count as `0`).
/// - `Time`, `Number` and `Boolean` order numerically with nulls first.
/// - Everything else orders as case-insensitive natural text.
pub fn comparator_for(ty: LogicalType) -> Comparator {
    match ty {
        LogicalType::Frame => compare_frame_values,
        LogicalType::Time | LogicalType::Number | LogicalType::Boolean => compare_numeric,
        LogicalType::String | LogicalType::Enum | LogicalType::NestedFrames => compare_text,
    }
}

fn compare_frame_values(a: &CellValue, b: &CellValue) -> Ordering {
    fn reduced(cell: &CellValue) -> f64 {
        match cell {
            CellValue::Frame(frame) => frame.value.unwrap_or(0.0),
            _ => 0.0,
        }
    }
    cmp_numbers(reduced(a), reduced(b))
}

fn compare_numeric(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => cmp_numbers(a.to_number(), b.to_number()),
    }
}

fn compare_text(a: &CellValue, b: &CellValue) -> Ordering {
    compare_natural(&a.to_text(), &b.to_text())
}

/// Values that don't coerce to a number (`NaN`) sort after every number and tie with each
/// other, which keeps the order total for the sort.
fn cmp_numbers(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ord) => ord,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}

/// Compares two strings ignoring case and accents, with digit runs compared by numeric value.
///
/// `"row2"` sorts before `"row10"`, and `"Élan"` equals `"elan"`. Both sides are folded lazily
/// while comparing; no folded copy of either string is built.
pub fn compare_natural(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        return cmp_folded(
            a.chars().map(|c| c.to_ascii_lowercase()),
            b.chars().map(|c| c.to_ascii_lowercase()),
        );
    }
    cmp_folded(fold(a), fold(b))
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn cmp_folded<A, B>(a: A, b: B) -> Ordering
where
    A: Iterator<Item = char>,
    B: Iterator<Item = char>,
{
    let mut a = a.peekable();
    let mut b = b.peekable();
    loop {
        let (ac, bc) = match (a.peek().copied(), b.peek().copied()) {
            (Some(ac), Some(bc)) => (ac, bc),
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        };

        if ac.is_ascii_digit() && bc.is_ascii_digit() {
            match cmp_digit_runs(&mut a, &mut b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }

        match cmp_folded_char(ac, bc) {
            Ordering::Equal => {
                a.next();
                b.next();
            }
            ord => return ord,
        }
    }
}

/// Punctuation and whitespace sort before digits, digits before letters.
fn char_class(c: char) -> u8 {
    if c.is_ascii_digit() {
        1
    } else if c.is_alphabetic() {
        2
    } else {
        0
    }
}

fn cmp_folded_char(a: char, b: char) -> Ordering {
    char_class(a)
        .cmp(&char_class(b))
        .then_with(|| a.cmp(&b))
}

/// Consumes one digit run from each side and compares them by value. Leading zeros are ignored,
/// so a longer run (after zeros) is the larger number; equal lengths compare by first differing
/// digit.
fn cmp_digit_runs<A, B>(a: &mut Peekable<A>, b: &mut Peekable<B>) -> Ordering
where
    A: Iterator<Item = char>,
    B: Iterator<Item = char>,
{
    while a.next_if_eq(&'0').is_some() {}
    while b.next_if_eq(&'0').is_some() {}

    let mut first_diff = Ordering::Equal;
    loop {
        match (a.next_if(char::is_ascii_digit), b.next_if(char::is_ascii_digit)) {
            (Some(da), Some(db)) => {
                if first_diff == Ordering::Equal {
                    first_diff = da.cmp(&db);
                }
            }
            (None, None) => return first_diff,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}
