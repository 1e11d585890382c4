//! URL helper functions

use anyhow::Result;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::Path;

/// Characters escaped in the path part of a `file://` URL
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Build a `file://` URL for an absolute path
///
/// # Examples
/// ```ignore
/// file_url(Path::new("/tmp/my site/a.html")) // -> "file:///tmp/my%20site/a.html"
/// ```
pub fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    let encoded = utf8_percent_encode(&raw, PATH_SEGMENT).to_string();

    if encoded.starts_with('/') {
        format!("file://{}", encoded)
    } else {
        // Windows drive paths need the extra slash
        format!("file:///{}", encoded)
    }
}

/// URL of the site index served by the preview server
pub fn server_index_url(ip: &str, port: u16) -> String {
    format!("http://{}:{}/index.html", ip, port)
}

/// Open a URL in the default browser
pub fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", "", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url() {
        assert_eq!(
            file_url(Path::new("/tmp/my site/temp_preview.html")),
            "file:///tmp/my%20site/temp_preview.html"
        );
        assert_eq!(file_url(Path::new("/a/b#c.html")), "file:///a/b%23c.html");
    }

    #[test]
    fn test_server_index_url() {
        assert_eq!(
            server_index_url("127.0.0.1", 8000),
            "http://127.0.0.1:8000/index.html"
        );
    }
}
