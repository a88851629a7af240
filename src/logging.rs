use std::{io::Write as _, time::SystemTime};

use anstyle::AnsiColor;
use env_logger::Env;

pub fn init() {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    let subtle = AnsiColor::BrightBlack.on_default();
    builder.format(move |buf, record| {
        let level_style = match record.level() {
            log::Level::Error => AnsiColor::Red.on_default(),
            log::Level::Warn => AnsiColor::Yellow.on_default(),
            log::Level::Info => AnsiColor::Green.on_default(),
            log::Level::Debug => AnsiColor::Blue.on_default(),
            log::Level::Trace => AnsiColor::Cyan.on_default(),
        };
        write!(buf, "{subtle}[{subtle:#}").expect("logging buffer should be writable");
        if let Ok(now) = jiff::Timestamp::try_from(SystemTime::now()) {
            write!(buf, "{now:.0} ").expect("logging buffer should be writable");
        }
        write!(
            buf,
            "{level_style}{}{level_style:#} {}{subtle}]{subtle:#} ",
            record.level(),
            record.target(),
        )
        .expect("logging buffer should be writable");
        writeln!(buf, "{}", record.args())
    });
    builder.init();
}
