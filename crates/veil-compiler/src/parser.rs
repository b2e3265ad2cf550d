use std::net::IpAddr;

use veil_core::Domain;

/// Parse a tracker corpus into normalized domains, in file order.
///
/// Accepted line shapes:
/// - `tracker.example` (anything after the first `/` is dropped)
/// - `||tracker.example^` and `||tracker.example/path` (EasyList host anchors)
/// - `0.0.0.0 tracker.example` (hosts files)
///
/// Blank lines, `#`/`!`/`[` comments, exception (`@@`) and cosmetic rules are
/// skipped, as is anything that does not normalize to a dotted domain.
pub fn parse_domain_list(text: &str) -> Vec<Domain> {
    let mut domains = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || is_comment_line(line) {
            continue;
        }

        if line.starts_with("@@") || line.contains("##") || line.contains("#@#") {
            continue;
        }

        let candidate = parse_host_anchor_rule(line)
            .or_else(|| parse_hosts_file_domain(line))
            .unwrap_or_else(|| parse_plain_entry(line));

        match normalize_entry(candidate) {
            Some(domain) => domains.push(domain),
            None => log::debug!("skipping corpus line {line:?}"),
        }
    }

    domains
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('[') || line.starts_with('#')
}

fn parse_host_anchor_rule(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("||")?;
    let end = rest
        .find(|c| c == '/' || c == '^' || c == '$')
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn parse_hosts_file_domain(line: &str) -> Option<&str> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let second = parts.next()?;

    if first.parse::<IpAddr>().is_ok() {
        return Some(second);
    }

    None
}

fn parse_plain_entry(line: &str) -> &str {
    line.split('/').next().unwrap_or(line)
}

fn normalize_entry(host: &str) -> Option<Domain> {
    let valid = host
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_');
    if !valid {
        return None;
    }
    Domain::parse(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<String> {
        parse_domain_list(text)
            .into_iter()
            .map(Domain::into_string)
            .collect()
    }

    #[test]
    fn parses_plain_domains() {
        let text = "doubleclick.net\n\n# comment\nGoogle-Analytics.COM\n";
        assert_eq!(parse(text), vec!["doubleclick.net", "google-analytics.com"]);
    }

    #[test]
    fn parses_easylist_host_anchors() {
        let text = "||hotjar.com^\n||segment.io/v1/track\n||ads.example.com^$third-party\n";
        assert_eq!(parse(text), vec!["hotjar.com", "segment.io", "ads.example.com"]);
    }

    #[test]
    fn strips_paths_from_plain_entries() {
        assert_eq!(parse("facebook.com/tr\n"), vec!["facebook.com"]);
    }

    #[test]
    fn parses_hosts_file_lines() {
        let text = "0.0.0.0 tracker.example\n127.0.0.1 localhost\n";
        assert_eq!(parse(text), vec!["tracker.example"]);
    }

    #[test]
    fn skips_non_domain_lines() {
        let text = "! Title: EasyPrivacy\n[Adblock Plus 2.0]\n@@||good.com^\nexample.com##.ad\nlocalhost\n/banner/*\n||*.wild.net^\n";
        assert!(parse(text).is_empty());
    }

    #[test]
    fn strips_leading_dot() {
        assert_eq!(parse(".tracker.io\n||.cdn.tracker.io^\n"), vec!["tracker.io", "cdn.tracker.io"]);
    }
}
