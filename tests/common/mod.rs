#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use webroot::http::response::Response;
use webroot::http::writer::ResponseWriter;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory holding a `www` web root plus room for files outside it.
///
/// Removed on drop.
pub struct Scratch {
    base: PathBuf,
    root: PathBuf,
}

impl Scratch {
    pub fn new(label: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let base = std::env::temp_dir().join(format!(
            "webroot-{}-{}-{}",
            label,
            std::process::id(),
            id
        ));
        let root = base.join("www");
        std::fs::create_dir_all(&root).unwrap();
        Self { base, root }
    }

    /// The web root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory containing the web root.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Writes a file relative to the web root.
    pub fn write(&self, relative: &str, contents: &[u8]) -> PathBuf {
        write_file(&self.root.join(relative), contents)
    }

    /// Writes a file relative to the directory containing the web root.
    pub fn write_outside(&self, relative: &str, contents: &[u8]) -> PathBuf {
        write_file(&self.base.join(relative), contents)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base);
    }
}

fn write_file(path: &Path, contents: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// A response as it appears on the wire.
pub struct WireResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl WireResponse {
    pub fn parse(raw: &[u8]) -> Self {
        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response has no header terminator");

        let head = std::str::from_utf8(&raw[..split]).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (k, v) = line.split_once(": ").unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();

        Self {
            status_line,
            headers,
            body: raw[split + 4..].to_vec(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status_line
            .split(' ')
            .nth(1)
            .unwrap()
            .parse()
            .unwrap()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Serializes a response through the writer into memory.
pub async fn render(response: Response) -> WireResponse {
    let mut out = Vec::new();
    ResponseWriter::new(response)
        .write_to_stream(&mut out)
        .await
        .unwrap();
    WireResponse::parse(&out)
}
