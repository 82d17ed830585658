use webroot::http::mime::{lookup, DEFAULT_CONTENT_TYPE};

#[test]
fn test_known_extensions() {
    assert_eq!(lookup("/srv/www/index.html"), "text/html");
    assert_eq!(lookup("style.css"), "text/css");
    assert_eq!(lookup("app.js"), "application/javascript");
    assert_eq!(lookup("data.json"), "application/json");
    assert_eq!(lookup("logo.png"), "image/png");
    assert_eq!(lookup("photo.jpg"), "image/jpeg");
    assert_eq!(lookup("photo.jpeg"), "image/jpeg");
    assert_eq!(lookup("anim.gif"), "image/gif");
    assert_eq!(lookup("notes.txt"), "text/plain");
}

#[test]
fn test_unknown_extension() {
    assert_eq!(lookup("archive.xyz"), "application/octet-stream");
    assert_eq!(DEFAULT_CONTENT_TYPE, "application/octet-stream");
}

#[test]
fn test_no_extension() {
    assert_eq!(lookup("/srv/www/README"), DEFAULT_CONTENT_TYPE);
    assert_eq!(lookup("Makefile."), DEFAULT_CONTENT_TYPE);
}

#[test]
fn test_only_last_extension_counts() {
    assert_eq!(lookup("bundle.min.js"), "application/javascript");
    assert_eq!(lookup("page.html.bak"), DEFAULT_CONTENT_TYPE);
}

#[test]
fn test_dot_in_directory_is_ignored() {
    assert_eq!(lookup("/srv/site.html/README"), DEFAULT_CONTENT_TYPE);
}

#[test]
fn test_extension_match_is_exact() {
    assert_eq!(lookup("INDEX.HTML"), DEFAULT_CONTENT_TYPE);
}
