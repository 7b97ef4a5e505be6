use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use log::LevelFilter;
use env_logger::{Builder, Target};
use chrono::Local;

/// Installs the process logger, appending timestamped lines to `log_path`.
/// Falls back to stderr when the file cannot be opened.
pub fn init<P: AsRef<Path>>(log_path: P) {
    let log_path = log_path.as_ref();
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info);

    let file = OpenOptions::new().create(true).append(true).open(log_path);
    let opened = file.is_ok();
    match file {
        Ok(f) => builder.target(Target::Pipe(Box::new(f))),
        Err(_) => builder.target(Target::Stderr),
    };
    builder.init();

    if opened {
        log::info!("Logger initialized ({:?}).", log_path);
    } else {
        log::warn!("Could not open log file {:?}; logging to stderr.", log_path);
    }
}
