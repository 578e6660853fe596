/// Parse a slot label of the form `HH:MM-HH:MM`
///
/// Returns the start and end as minutes since midnight. Hours are 24-hour and
/// zero-padded, and the slot must end after it starts.
pub fn parse_slot_label(label: &str) -> Option<(u16, u16)> {
    let (start, end) = label.split_once('-')?;
    let start = parse_clock(start)?;
    let end = parse_clock(end)?;

    if start >= end {
        return None;
    }

    Some((start, end))
}

#[inline]
pub fn is_valid_slot_label(label: &str) -> bool {
    parse_slot_label(label).is_some()
}

/// Length of a slot in minutes, if the label is well formed
pub fn slot_duration_minutes(label: &str) -> Option<u16> {
    parse_slot_label(label).map(|(start, end)| end - start)
}

fn parse_clock(value: &str) -> Option<u16> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }

    let (hours, minutes) = (&value[..2], &value[3..]);
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_label() {
        assert_eq!(parse_slot_label("09:00-09:15"), Some((540, 555)));
        assert_eq!(parse_slot_label("00:00-23:59"), Some((0, 1439)));
        assert_eq!(slot_duration_minutes("13:30-14:00"), Some(30));
    }

    #[test]
    fn test_rejects_malformed_labels() {
        assert!(!is_valid_slot_label(""));
        assert!(!is_valid_slot_label("9:00-9:15"));
        assert!(!is_valid_slot_label("09:00"));
        assert!(!is_valid_slot_label("09:00-09:15-09:30"));
        assert!(!is_valid_slot_label("09h00-09h15"));
        assert!(!is_valid_slot_label("24:00-24:15"));
        assert!(!is_valid_slot_label("09:60-10:00"));
        assert!(!is_valid_slot_label("+9:00-09:15"));
    }

    #[test]
    fn test_rejects_empty_or_reversed_interval() {
        assert!(!is_valid_slot_label("10:00-10:00"));
        assert!(!is_valid_slot_label("10:15-10:00"));
    }
}
