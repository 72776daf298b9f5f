use std::{
    env,
    path::{Component, Path, PathBuf},
};

use anyhow::{Context, anyhow, bail};
use tokio::fs;

pub const ENTRY_FILE: &str = "index.html";
pub const STATIC_DIR_ENV: &str = "JARDESIGNER_STATIC_DIR";

/// The pre-built frontend assets shipped with the installed package.
///
/// Resolution is anchored to the binary's own install location, never
/// the current working directory, so the launcher behaves identically
/// no matter where it is invoked from.
#[derive(Debug, Clone)]
pub struct StaticBundle {
    root: PathBuf,
}

/// Outcome of mapping a request path onto the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing file inside the bundle.
    Asset(PathBuf),
    /// Serve the entry document and let the client-side router decide.
    EntryDocument,
    /// An asset-like path (has a file extension) that does not exist.
    NotFound,
}

impl StaticBundle {
    /// Locate the bundle, trying an explicit override first, then the
    /// environment, then the install-relative locations. A directory
    /// only qualifies if it contains the entry file; a bundle without
    /// `index.html` was never built and serving it would only produce
    /// confusing empty responses later.
    pub fn locate(override_dir: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(dir) = override_dir {
            return Self::open(dir).with_context(|| {
                format!("--static-dir {} does not hold a built bundle", dir.display())
            });
        }

        let mut tried = Vec::new();

        if let Ok(dir) = env::var(STATIC_DIR_ENV) {
            let dir = PathBuf::from(dir);
            match Self::open(&dir) {
                Ok(bundle) => return Ok(bundle),
                Err(_) => tried.push(dir),
            }
        }

        for candidate in install_candidates() {
            match Self::open(&candidate) {
                Ok(bundle) => return Ok(bundle),
                Err(_) => tried.push(candidate),
            }
        }

        let listing = tried
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n");
        Err(anyhow!(
            "could not find the JARDesigner frontend bundle (no {ENTRY_FILE} in any of):\n{listing}\n\
             Build the frontend first (`npm run build` in frontend/) or point \
             --static-dir / {STATIC_DIR_ENV} at a built bundle."
        ))
    }

    /// Accept `dir` as the bundle root only if the entry file is there.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let root = dir
            .canonicalize()
            .with_context(|| format!("{} is not readable", dir.display()))?;
        if !root.is_dir() {
            bail!("{} is not a directory", root.display());
        }
        if !root.join(ENTRY_FILE).is_file() {
            bail!("{} has no {ENTRY_FILE}", root.display());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_file(&self) -> PathBuf {
        self.root.join(ENTRY_FILE)
    }

    /// Map a request path onto the bundle.
    ///
    /// Existing files are served as-is. A missing path that looks like
    /// an asset (it has a file extension) is a genuine miss; anything
    /// else is assumed to be a client-side route and falls back to the
    /// entry document so the frontend router can handle it.
    pub async fn resolve(&self, request_path: &str) -> Resolution {
        let Ok(relative) = sanitize(request_path) else {
            return Resolution::NotFound;
        };

        let Some(relative) = relative else {
            return Resolution::EntryDocument;
        };

        let target = self.root.join(&relative);
        if let Ok(metadata) = fs::metadata(&target).await
            && metadata.is_file()
        {
            return Resolution::Asset(target);
        }

        if relative.extension().is_some() {
            Resolution::NotFound
        } else {
            Resolution::EntryDocument
        }
    }
}

/// Bundle locations relative to the installed binary, most specific
/// first, ending with the in-repo dev build.
fn install_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(exe) = env::current_exe()
        && let Some(exe_dir) = exe.parent()
    {
        candidates.push(exe_dir.join("static"));
        candidates.push(exe_dir.join("..").join("share").join("jardesigner").join("static"));
    }

    candidates.push(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("frontend")
            .join("dist"),
    );

    candidates
}

/// Strip the leading slash and reject anything that could escape the
/// bundle root. `Ok(None)` means the request is for the root document.
fn sanitize(request_path: &str) -> anyhow::Result<Option<PathBuf>> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => bail!("invalid path"),
        }
    }

    if relative.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn bundle_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("jardesigner_bundle_{tag}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("assets")).unwrap();
        fs::write(dir.join(ENTRY_FILE), "<html>entry</html>").unwrap();
        fs::write(dir.join("assets").join("app.js"), "console.log('app')").unwrap();
        dir
    }

    #[test]
    fn open_rejects_directory_without_entry_file() {
        let dir = env::temp_dir().join(format!("jardesigner_empty_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let _ = fs::remove_file(dir.join(ENTRY_FILE));

        let error = StaticBundle::open(&dir).unwrap_err();
        assert!(error.to_string().contains(ENTRY_FILE));
    }

    #[test]
    fn locate_with_unbuilt_override_names_the_problem() {
        let dir = env::temp_dir().join(format!("jardesigner_missing_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let _ = fs::remove_file(dir.join(ENTRY_FILE));

        let error = StaticBundle::locate(Some(&dir)).unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("--static-dir"));
        assert!(message.contains(ENTRY_FILE));
    }

    #[test]
    fn locate_without_any_bundle_gives_an_actionable_error() {
        // No override, no env var, and the test binary ships no
        // install-relative bundle, so every candidate misses.
        if env::var(STATIC_DIR_ENV).is_ok() {
            return;
        }
        let error = StaticBundle::locate(None).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("npm run build"));
        assert!(message.contains(STATIC_DIR_ENV));
    }

    #[tokio::test]
    async fn root_path_resolves_to_entry_document() {
        let bundle = StaticBundle::open(&bundle_dir("root")).unwrap();
        assert_eq!(bundle.resolve("").await, Resolution::EntryDocument);
        assert_eq!(bundle.resolve("/").await, Resolution::EntryDocument);
    }

    #[tokio::test]
    async fn existing_asset_resolves_to_its_file() {
        let bundle = StaticBundle::open(&bundle_dir("asset")).unwrap();
        match bundle.resolve("assets/app.js").await {
            Resolution::Asset(path) => assert!(path.ends_with("assets/app.js")),
            other => panic!("expected asset, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn extensionless_route_falls_back_to_entry_document() {
        let bundle = StaticBundle::open(&bundle_dir("route")).unwrap();
        assert_eq!(
            bundle.resolve("model/cell/42").await,
            Resolution::EntryDocument
        );
        assert_eq!(bundle.resolve("settings").await, Resolution::EntryDocument);
    }

    #[tokio::test]
    async fn missing_asset_like_path_is_not_found() {
        let bundle = StaticBundle::open(&bundle_dir("miss")).unwrap();
        assert_eq!(bundle.resolve("assets/gone.js").await, Resolution::NotFound);
        assert_eq!(bundle.resolve("favicon.ico").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn traversal_components_are_rejected() {
        let bundle = StaticBundle::open(&bundle_dir("traversal")).unwrap();
        assert_eq!(bundle.resolve("../secret.txt").await, Resolution::NotFound);
        assert_eq!(
            bundle.resolve("assets/../../secret.txt").await,
            Resolution::NotFound
        );
    }
}
