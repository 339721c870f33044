use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use packlaunch::ArchiveTask;

fn make_progress_spinner(prefix: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template("{prefix:.cyan.bold/blue.bold} 📦 {msg:.cyan/blue} {spinner}")
            .unwrap()
            .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷"),
    );
    pb.set_prefix(prefix);
    pb
}

fn complete_progress_bar(pb: ProgressBar, result: &Result<PathBuf, packlaunch::Error>) {
    let template = if result.is_ok() {
        "{prefix:.cyan.bold/blue.bold} {msg:.cyan/blue}"
    } else {
        "{prefix:.cyan.bold/blue.bold} {msg:.red.bold}"
    };
    pb.set_style(ProgressStyle::with_template(template).unwrap());
    let status = match result {
        Ok(package) => format!("😸 packaged {}", package.display()),
        Err(_) => "😿 archiver failed".to_string(),
    };
    pb.finish_with_message(status);
}

// Wait for the archiver, showing a spinner until it exits
pub fn wait_for_archiver(task: ArchiveTask) -> Result<PathBuf, packlaunch::Error> {
    let bar = make_progress_spinner(format!("[pid {}]", task.id()));
    bar.set_message(format!("{} ", task.destination().display()));
    let result = task.wait();
    complete_progress_bar(bar, &result);
    result
}
