//! Web root preparation run once before the server binds.

use std::path::Path;

use anyhow::Context;

pub const DEFAULT_DOCUMENT: &str = "index.html";

const WELCOME_PAGE: &str = "<html>\n\
<head><title>Welcome</title></head>\n\
<body>\n\
<h1>Welcome to Webroot</h1>\n\
<p>Server is running successfully!</p>\n\
</body>\n\
</html>";

/// Creates the web root if it is missing and seeds a placeholder `index.html`.
///
/// An existing `index.html` is never overwritten.
pub fn prepare_web_root(web_root: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(web_root)
        .with_context(|| format!("failed to create web root {}", web_root.display()))?;

    let index = web_root.join(DEFAULT_DOCUMENT);
    if !index.exists() {
        std::fs::write(&index, WELCOME_PAGE)
            .with_context(|| format!("failed to write {}", index.display()))?;
        tracing::info!(path = %index.display(), "Created default index page");
    }

    Ok(())
}
