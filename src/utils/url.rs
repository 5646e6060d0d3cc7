/// Extract the display domain from a URL string: the host portion
/// without scheme, path, port, or a leading "www." prefix.
/// Example: "https://www.github.com/foo/bar" -> Some("github.com")
pub fn extract_domain(url: &str) -> Option<String> {
    // Handle common URL formats
    let url = url.trim();

    // Remove scheme if present
    let without_scheme = if let Some(idx) = url.find("://") {
        &url[idx + 3..]
    } else {
        url
    };

    // Extract host before path or query
    let host = without_scheme
        .split('/')
        .next()?
        .split('?')
        .next()?
        .split('#')
        .next()?;

    // Remove port if present
    let domain = host.split(':').next()?;
    let domain = domain.strip_prefix("www.").unwrap_or(domain);

    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Permalink to an item's discussion page on news.ycombinator.com.
pub fn item_url(id: u32) -> String {
    format!("https://news.ycombinator.com/item?id={}", id)
}

/// Permalink to a user's profile page.
pub fn user_url(username: &str) -> String {
    format!("https://news.ycombinator.com/user?id={}", username)
}
