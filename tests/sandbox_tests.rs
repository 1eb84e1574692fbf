// Integration tests for path confinement
//
// Whatever a client sends, resolution either lands inside the root or is
// refused.

use anyhow::Result;
use audio_browser::{ApiError, PathSandbox};
use std::fs;
use tempfile::TempDir;

fn attempts() -> Vec<String> {
    let mut out = Vec::new();
    let pieces = ["..", ".", "a", "b", "", "/", "\\", "C:", "etc"];
    for x in pieces {
        for y in pieces {
            for z in pieces {
                out.push(format!("{x}/{y}/{z}"));
                out.push(format!("/{x}\\{y}//{z}/.."));
                out.push(format!("a/{x}/../{y}/../../{z}"));
            }
        }
    }
    out.extend(
        [
            "../../../../etc/passwd",
            "/etc/passwd",
            "\\\\server\\share",
            "a/b/../../../x",
            "....//....//",
        ]
        .map(String::from),
    );
    out
}

#[tokio::test]
async fn test_resolution_never_leaves_root() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::create_dir_all(temp_dir.path().join("a").join("b"))?;
    let sandbox = PathSandbox::new(temp_dir.path())?;

    for attempt in attempts() {
        match sandbox.resolve(&attempt).await {
            Ok(path) => assert!(
                path.starts_with(sandbox.root()),
                "{attempt:?} resolved outside root: {}",
                path.display()
            ),
            Err(ApiError::PathEscape) => {}
            Err(other) => panic!("{attempt:?} failed unexpectedly: {other}"),
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_sibling_with_shared_prefix_is_outside() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("data");
    fs::create_dir(&root)?;
    fs::create_dir(temp_dir.path().join("data2"))?;
    let sandbox = PathSandbox::new(&root)?;

    assert!(matches!(
        sandbox.resolve("../data2").await,
        Err(ApiError::PathEscape)
    ));

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("library");
    let outside = temp_dir.path().join("outside");
    fs::create_dir(&root)?;
    fs::create_dir(&outside)?;
    fs::write(outside.join("secret.flac"), b"x")?;
    std::os::unix::fs::symlink(&outside, root.join("escape"))?;
    fs::write(root.join("inside.flac"), b"x")?;

    let sandbox = PathSandbox::new(&root)?;

    assert!(matches!(
        sandbox.resolve("escape/secret.flac").await,
        Err(ApiError::PathEscape)
    ));
    assert_eq!(
        sandbox.resolve("inside.flac").await?,
        sandbox.root().join("inside.flac")
    );

    Ok(())
}

#[tokio::test]
async fn test_missing_target_resolves_for_later_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let sandbox = PathSandbox::new(temp_dir.path())?;

    assert_eq!(
        sandbox.resolve("not/there.flac").await?,
        sandbox.root().join("not").join("there.flac")
    );

    Ok(())
}

#[tokio::test]
async fn test_path_through_a_file_resolves_then_reads_as_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("take1.flac"), b"x")?;
    let sandbox = PathSandbox::new(temp_dir.path())?;

    let path = sandbox.resolve("take1.flac/x").await?;
    assert_eq!(path, sandbox.root().join("take1.flac").join("x"));

    let listing = audio_browser::catalog::list(&path, "take1.flac/x").await;
    assert!(matches!(listing, Err(ApiError::NotFound(_))));

    Ok(())
}

#[test]
fn test_root_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    assert!(PathSandbox::new(temp_dir.path().join("missing")).is_err());

    let file = temp_dir.path().join("file");
    fs::write(&file, b"").unwrap();
    assert!(PathSandbox::new(&file).is_err());
}
