use url::Url;

/// Network schemes a short URL may point at.
pub const ALLOWED_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "sftp", "ssh", "git", "irc", "ircs", "rtmp", "rtsp",
    "telnet",
];

/// Whether `candidate` is an absolute URL with an allowed scheme and a host.
///
/// Applied to submitted URLs before they are stored and again to stored
/// URLs before redirecting to them.
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => {
            ALLOWED_SCHEMES.contains(&url.scheme())
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
