use url::Url;

/// Learning platforms recognized by domain, checked in order.
const PLATFORMS: &[(&str, &str)] = &[
    ("coursera", "Coursera Course"),
    ("udemy", "Udemy Course"),
    ("edx", "edX Course"),
    ("pluralsight", "Pluralsight Course"),
    ("freecodecamp", "freeCodeCamp Resource"),
    ("youtube", "YouTube Tutorial"),
    ("github", "GitHub Repository"),
];

/// Whether a resource string should be shown as a link.
pub fn is_url(resource: &str) -> bool {
    resource.starts_with("http")
}

/// Human-friendly label for a resource URL.
///
/// Known learning platforms get a fixed label; other hosts become
/// "<Domain> Resource". Strings that do not parse as a URL with a host are
/// returned unchanged.
pub fn display_name_from_url(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    let Some(host) = parsed.host_str() else {
        return raw.to_string();
    };

    let domain = host.replacen("www.", "", 1);

    if domain.contains("linkedin.com") && parsed.path().starts_with("/learning") {
        return "LinkedIn Learning".to_string();
    }

    for (needle, label) in PLATFORMS {
        if domain.contains(needle) {
            return (*label).to_string();
        }
    }

    format!("{} Resource", capitalize(&domain))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
