//! Inventory tool: probes a library of candidate check executables and
//! symlinks the ones that work into a plugin directory.
//!
//! A candidate is adopted when invoking it with no arguments exits zero.
//! Existing plugin-directory entries are never clobbered: a regular file
//! there is left alone, and a symlink pointing somewhere else is left alone
//! too — both are logged as warnings, not repaired.

use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "pulsewatch-inventory")]
#[command(about = "Probe a library of check executables and symlink the working ones into the plugin directory")]
struct InventoryArgs {
    /// Directory of candidate executables to probe
    #[arg(short = 'l', long)]
    library_directory: PathBuf,

    /// Directory to symlink working executables into
    #[arg(short = 'p', long)]
    plugin_directory: PathBuf,
}

fn main() {
    let args = InventoryArgs::parse();

    if let Err(e) = std::fs::create_dir_all(&args.plugin_directory) {
        eprintln!(
            "pulsewatch-inventory: could not create {}: {e}",
            args.plugin_directory.display()
        );
        std::process::exit(1);
    }

    let candidates = match std::fs::read_dir(&args.library_directory) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!(
                "pulsewatch-inventory: could not read {}: {e}",
                args.library_directory.display()
            );
            std::process::exit(1);
        }
    };

    let mut adopted = 0;
    let mut skipped = 0;

    for entry in candidates.flatten() {
        let path = entry.path();
        if !is_executable(&path) {
            continue;
        }

        match std::process::Command::new(&path).output() {
            Ok(output) if output.status.success() => match adopt(&path, &args.plugin_directory) {
                Ok(true) => {
                    adopted += 1;
                    println!("adopted {}", path.display());
                }
                Ok(false) => skipped += 1,
                Err(e) => eprintln!("pulsewatch-inventory: could not link {}: {e}", path.display()),
            },
            Ok(output) => {
                tracing_like_eprintln(&path, output.status.code());
            }
            Err(e) => eprintln!("pulsewatch-inventory: could not run {}: {e}", path.display()),
        }
    }

    println!("adopted {adopted}, skipped {skipped}");
}

fn tracing_like_eprintln(path: &Path, code: Option<i32>) {
    eprintln!("{} exited nonzero ({code:?}), not adopting", path.display());
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.metadata().is_ok_and(|m| m.is_file())
}

/// Symlink `target` into `plugin_directory`, refusing to clobber an
/// unrelated existing entry. Returns `Ok(true)` if a new link was created,
/// `Ok(false)` if skipped because something already occupies the slot.
fn adopt(target: &Path, plugin_directory: &Path) -> std::io::Result<bool> {
    let Some(name) = target.file_name() else { return Ok(false) };
    let link_path = plugin_directory.join(name);

    match std::fs::symlink_metadata(&link_path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let existing_target = std::fs::read_link(&link_path)?;
            if existing_target == target {
                return Ok(false);
            }
            eprintln!(
                "pulsewatch-inventory: {} already links elsewhere ({}), not overwriting",
                link_path.display(),
                existing_target.display()
            );
            Ok(false)
        }
        Ok(_) => {
            eprintln!(
                "pulsewatch-inventory: {} already exists and is not a symlink, not overwriting",
                link_path.display()
            );
            Ok(false)
        }
        Err(_) => {
            #[cfg(unix)]
            std::os::unix::fs::symlink(target, &link_path)?;
            #[cfg(not(unix))]
            std::fs::copy(target, &link_path)?;
            Ok(true)
        }
    }
}
