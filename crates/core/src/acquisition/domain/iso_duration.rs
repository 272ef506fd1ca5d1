/// Parses the `PT#H#M#S` durations the catalog reports into whole seconds.
///
/// Missing components count as zero, so `PT5M` is 300 and `P0D` is 0.
/// Returns `None` for strings that don't start with `P` or contain
/// unexpected characters.
pub fn parse_iso_duration(text: &str) -> Option<u64> {
    let rest = text.trim().strip_prefix('P')?;
    let (date, time) = match rest.split_once('T') {
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let mut seconds = 0u64;
    seconds += sum_components(date, &[('W', 604_800), ('D', 86_400)])?;
    seconds += sum_components(time, &[('H', 3_600), ('M', 60), ('S', 1)])?;
    Some(seconds)
}

fn sum_components(part: &str, units: &[(char, u64)]) -> Option<u64> {
    let mut total = 0u64;
    let mut digits = String::new();
    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let (_, scale) = units.iter().find(|(unit, _)| *unit == c)?;
        let value: u64 = digits.parse().ok()?;
        total = total.checked_add(value.checked_mul(*scale)?)?;
        digits.clear();
    }
    if !digits.is_empty() {
        return None;
    }
    Some(total)
}
