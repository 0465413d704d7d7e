use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use twacal_core::feedback::{Notice, NoticeLevel};

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

pub fn print_notice(notice: &Notice) {
    let message = notice.message.as_str();
    match notice.level {
        NoticeLevel::Success => println!("{}", message.green()),
        NoticeLevel::Error => println!("{}", message.red()),
        NoticeLevel::Warning => println!("{}", message.yellow()),
        NoticeLevel::Info => println!("{}", message.cyan()),
    }
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        print_notice(notice);
    }
}
