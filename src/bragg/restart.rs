/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Restart-file representation of reflection lists
//!
//! A list is written as a count line followed by each reflection in the
//! format of [`BraggReflection::serialise`]. Values are whitespace-delimited
//! and floats use shortest round-trip formatting.

use super::errors::{BraggError, Result};
use super::reflection::BraggReflection;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Read the next non-empty line, failing with `field` as context at end of data
pub(crate) fn next_line<R: BufRead>(reader: &mut R, field: &'static str) -> Result<String> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(BraggError::Deserialisation {
                field,
                reason: "unexpected end of data".to_string(),
            });
        }
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
}

/// Parse a single whitespace-delimited token
pub(crate) fn parse_field<T: FromStr>(token: Option<&str>, field: &'static str) -> Result<T> {
    let token = token.ok_or_else(|| BraggError::Deserialisation {
        field,
        reason: "missing value".to_string(),
    })?;
    token.parse().map_err(|_| BraggError::Deserialisation {
        field,
        reason: format!("could not parse '{}'", token),
    })
}

/// Write a reflection list
pub fn write_reflections<W: Write>(writer: &mut W, reflections: &[BraggReflection]) -> Result<()> {
    writeln!(writer, "{}", reflections.len())?;
    for reflection in reflections {
        reflection.serialise(writer)?;
    }
    Ok(())
}

/// Read a reflection list written by [`write_reflections`]
pub fn read_reflections<R: BufRead>(reader: &mut R) -> Result<Vec<BraggReflection>> {
    let count_line = next_line(reader, "reflection count")?;
    let count: usize = parse_field(count_line.split_whitespace().next(), "reflection count")?;

    (0..count)
        .map(|_| BraggReflection::deserialise(&mut *reader))
        .collect()
}

/// Write a reflection list to a file
pub fn save_reflections<P: AsRef<Path>>(path: P, reflections: &[BraggReflection]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_reflections(&mut writer, reflections)?;
    writer.flush()?;
    Ok(())
}

/// Read a reflection list from a file
pub fn load_reflections<P: AsRef<Path>>(path: P) -> Result<Vec<BraggReflection>> {
    let mut reader = BufReader::new(File::open(path)?);
    read_reflections(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_list_round_trip() {
        let mut first = BraggReflection::new(0.15, 0, 1);
        first.add_intensity(0, 0, 2.0).unwrap();
        let mut second = BraggReflection::new(0.35, 1, 1);
        second.add_kvectors(4);

        let mut buffer = Vec::new();
        write_reflections(&mut buffer, &[first.clone(), second.clone()]).unwrap();
        let restored = read_reflections(&mut Cursor::new(buffer)).unwrap();

        assert_eq!(restored, vec![first, second]);
    }

    #[test]
    fn test_count_larger_than_data() {
        let data = "2\n0 1.5e-1 0 1 0 0\n1\n0e0\n";
        assert!(read_reflections(&mut Cursor::new(data)).is_err());
    }

    #[test]
    fn test_parse_field_errors() {
        assert!(parse_field::<i32>(None, "x").is_err());
        assert!(parse_field::<i32>(Some("1.5"), "x").is_err());
        assert_eq!(parse_field::<i32>(Some("-3"), "x").unwrap(), -3);
    }
}
