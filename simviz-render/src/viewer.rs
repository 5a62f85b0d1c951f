//! Hand a rendered image to the platform's default viewer.

use std::io;
use std::path::Path;
use std::process::Command;

/// Open `path` with the desktop's registered application. Returns once the
/// launcher has been started; the viewer itself is not awaited.
pub fn open_in_viewer(path: &Path) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    log::debug!("launching viewer: {command:?}");
    command.spawn().map(|_| ())
}
