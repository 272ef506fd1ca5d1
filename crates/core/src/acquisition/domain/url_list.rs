use std::path::Path;

/// Extracts URLs from a list file's text: one entry per line, everything
/// from the first `separator` on is a comment, blank lines are skipped.
pub fn parse_url_list(text: &str, separator: &str) -> Vec<String> {
    text.lines()
        .map(|line| match line.split_once(separator) {
            Some((url, _)) => url,
            None => line,
        })
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_url_list(path: &Path, separator: &str) -> std::io::Result<Vec<String>> {
    Ok(parse_url_list(&std::fs::read_to_string(path)?, separator))
}

/// Renders `url<separator>title` lines that [`parse_url_list`] reads back.
pub fn format_url_list<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    separator: &str,
) -> String {
    let mut out = String::new();
    for (url, title) in entries {
        out.push_str(url);
        out.push_str(separator);
        out.push_str(&title.replace(['\n', '\r'], " "));
        out.push('\n');
    }
    out
}
