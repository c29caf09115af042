//! Shared plumbing for the scripts in `src/`.

use std::path::PathBuf;

/// Create a directory and all its parents, panicking with the path on
/// failure.
///
/// Stands in for `whooie::mkdir!`.
#[macro_export]
macro_rules! mkdir {
    ( $path:expr ) => {
        {
            let path: &std::path::Path = $path.as_ref();
            if let Err(err) = std::fs::create_dir_all(path) {
                panic!("couldn't create directory {}: {}", path.display(), err);
            }
        }
    }
}

/// `print!` followed by a flush of stdout.
///
/// Stands in for `whooie::print_flush!`.
#[macro_export]
macro_rules! print_flush {
    ( $fmt:literal $(, $val:expr )* $(,)? ) => {
        {
            use std::io::Write;
            print!($fmt $(, $val )*);
            std::io::stdout().flush().ok();
        }
    }
}

/// Set up logging for a script, at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp(None)
    .init();
}

/// Default output directory for the scripts, created if missing.
pub fn outdir() -> PathBuf {
    let outdir = PathBuf::from("output");
    mkdir!(outdir);
    outdir
}
