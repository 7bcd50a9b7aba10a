//! Leading-numeric-prefix price parsing.
//!
//! A token is numeric when it starts (after optional whitespace) with a
//! decimal literal. Anything after the literal is ignored, so `"950 AED"`
//! parses as 950 while `"AED 950"` does not parse at all.

/// Parses the leading decimal literal of `token`, or `None` when there is none.
pub fn parse_price(token: &str) -> Option<f64> {
    let trimmed = token.trim_start();
    let end = numeric_prefix_len(trimmed.as_bytes());
    if end == 0 {
        return None;
    }

    trimmed[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(&bytes[pos + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    // exponent only counts when at least one digit follows it
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp.min(bytes.len())..]);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }

    pos
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
