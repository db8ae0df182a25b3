//! Locally issued angle commands
//!
//! A command is the decimal text of an angle, as written by a local client.
//! Accepted syntax is an optional `+`/`-` sign, at least one digit and at
//! most one trailing newline. Anything else is not an integer.

use crate::angle::Angle;

/// Longest command text accepted
pub const MAX_COMMAND_LEN: usize = 255;

/// Errors from command parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Command text exceeds [`MAX_COMMAND_LEN`]
    TooLong,
    /// Content is not a decimal integer
    NotAnInteger,
    /// Integer outside the servo range
    OutOfRange,
}

/// Parse command text into an angle
pub fn parse_command(input: &[u8]) -> Result<Angle, CommandError> {
    if input.len() > MAX_COMMAND_LEN {
        return Err(CommandError::TooLong);
    }

    let body = input.strip_suffix(b"\n").unwrap_or(input);
    let (negative, digits) = match body.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, body),
    };

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(CommandError::NotAnInteger);
    }

    let magnitude = digits
        .iter()
        .try_fold(0u32, |acc, &d| {
            acc.checked_mul(10)?.checked_add(u32::from(d - b'0'))
        })
        .filter(|&m| m <= i32::MAX as u32)
        .ok_or(CommandError::NotAnInteger)?;

    let value = if negative {
        -i64::from(magnitude)
    } else {
        i64::from(magnitude)
    };

    Angle::new(value).ok_or(CommandError::OutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values() {
        assert_eq!(parse_command(b"90"), Ok(Angle::new(90).unwrap()));
        assert_eq!(parse_command(b"0"), Ok(Angle::MIN));
        assert_eq!(parse_command(b"180"), Ok(Angle::MAX));
    }

    #[test]
    fn test_sign_and_newline() {
        assert_eq!(parse_command(b"90\n"), Ok(Angle::new(90).unwrap()));
        assert_eq!(parse_command(b"+90"), Ok(Angle::new(90).unwrap()));
        assert_eq!(parse_command(b"-0"), Ok(Angle::MIN));
        assert_eq!(parse_command(b"007"), Ok(Angle::new(7).unwrap()));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(parse_command(b"181"), Err(CommandError::OutOfRange));
        assert_eq!(parse_command(b"-5"), Err(CommandError::OutOfRange));
        assert_eq!(parse_command(b"-2147483647"), Err(CommandError::OutOfRange));
    }

    #[test]
    fn test_not_an_integer() {
        let inputs: [&[u8]; 12] = [
            b"",
            b"\n",
            b"-",
            b"+-1",
            b"9 0",
            b" 90",
            b"90\n\n",
            b"90\r\n",
            b"0x10",
            b"abc",
            b"4294967296",
            b"2147483648",
        ];
        for input in inputs {
            assert_eq!(parse_command(input), Err(CommandError::NotAnInteger), "{:?}", input);
        }
    }

    #[test]
    fn test_length_cap() {
        let mut long = [b'0'; MAX_COMMAND_LEN + 1];
        assert_eq!(parse_command(&long), Err(CommandError::TooLong));

        // Exactly at the cap is still parsed
        long[MAX_COMMAND_LEN - 1] = b'9';
        assert_eq!(parse_command(&long[..MAX_COMMAND_LEN]), Ok(Angle::new(9).unwrap()));
    }
}
