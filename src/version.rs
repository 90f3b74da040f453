#![allow(clippy::doc_markdown)] // Generated file contains OPT_LEVEL without backticks

use std::sync::LazyLock;

include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// Version string logged at startup: `<package version>[-<git commit>][-dirty]`.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    let mut version = PKG_VERSION.to_string();
    if let Some(commit) = GIT_COMMIT_HASH {
        version.push('-');
        version.push_str(commit);
    }
    if GIT_DIRTY == Some(true) {
        version.push_str("-dirty");
    }
    version
});
